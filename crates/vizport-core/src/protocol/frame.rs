//! Length-prefixed frames
//!
//! ```text
//! <TAG> <LEN>\n<LEN bytes of UTF-8 payload>
//! ```

use crate::error::{ScriptError, ScriptResult};
use std::fmt;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

/// Default upper bound on a single frame payload (256 MiB)
pub const DEFAULT_MAX_FRAME_BYTES: usize = 256 * 1024 * 1024;

/// Longest header line accepted, newline included
const MAX_HEADER_BYTES: u64 = 64;

/// Frame tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameTag {
    /// Client to application: a command
    Command,
    /// Application to client: the result fields
    Response,
}

impl FrameTag {
    /// Wire spelling of the tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Command => "CMD",
            Self::Response => "RES",
        }
    }
}

impl fmt::Display for FrameTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrameTag {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CMD" => Ok(Self::Command),
            "RES" => Ok(Self::Response),
            other => Err(ScriptError::protocol(format!(
                "unknown frame tag '{}'",
                other.escape_debug()
            ))),
        }
    }
}

/// One tagged frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame tag
    pub tag: FrameTag,
    /// Escaped, delimiter-joined payload
    pub payload: String,
}

impl Frame {
    /// Create a command frame
    pub fn command(payload: impl Into<String>) -> Self {
        Self {
            tag: FrameTag::Command,
            payload: payload.into(),
        }
    }

    /// Create a response frame
    pub fn response(payload: impl Into<String>) -> Self {
        Self {
            tag: FrameTag::Response,
            payload: payload.into(),
        }
    }

    /// Header line for this frame, newline included
    pub fn header(&self) -> String {
        format!("{} {}\n", self.tag, self.payload.len())
    }

    /// Write the frame and flush
    pub async fn write_to<W>(&self, writer: &mut W, max_frame_bytes: usize) -> ScriptResult<()>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        if self.payload.len() > max_frame_bytes {
            return Err(ScriptError::encoding(format!(
                "{} frame of {} bytes exceeds the {} byte limit",
                self.tag,
                self.payload.len(),
                max_frame_bytes
            )));
        }

        let header = self.header();
        trace!(tag = %self.tag, bytes = self.payload.len(), "writing frame");
        writer.write_all(header.as_bytes()).await?;
        writer.write_all(self.payload.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }

    /// Read one frame
    ///
    /// Returns `Ok(None)` when the stream ends cleanly before a header starts.
    /// An end of stream anywhere inside a frame is a protocol error.
    pub async fn read_from<R>(reader: &mut R, max_frame_bytes: usize) -> ScriptResult<Option<Self>>
    where
        R: AsyncBufRead + Unpin + ?Sized,
    {
        let mut header = Vec::with_capacity(16);
        let read = (&mut *reader)
            .take(MAX_HEADER_BYTES)
            .read_until(b'\n', &mut header)
            .await?;

        if read == 0 {
            return Ok(None);
        }
        if header.last() != Some(&b'\n') {
            return Err(if read as u64 >= MAX_HEADER_BYTES {
                ScriptError::protocol("frame header is too long")
            } else {
                ScriptError::protocol("channel closed inside a frame header")
            });
        }
        header.pop();

        let header = std::str::from_utf8(&header)
            .map_err(|_| ScriptError::protocol("frame header is not valid UTF-8"))?;
        let (tag, len) = header.split_once(' ').ok_or_else(|| {
            ScriptError::protocol(format!("malformed frame header '{}'", header.escape_debug()))
        })?;
        let tag: FrameTag = tag.parse()?;
        let len: usize = len.parse().map_err(|_| {
            ScriptError::protocol(format!("invalid frame length '{}'", len.escape_debug()))
        })?;

        if len > max_frame_bytes {
            return Err(ScriptError::protocol(format!(
                "{} frame announces {} bytes, above the {} byte limit",
                tag, len, max_frame_bytes
            )));
        }

        let mut payload = vec![0u8; len];
        reader.read_exact(&mut payload).await?;
        let payload = String::from_utf8(payload)
            .map_err(|_| ScriptError::protocol(format!("{} payload is not valid UTF-8", tag)))?;

        trace!(tag = %tag, bytes = len, "read frame");
        Ok(Some(Self { tag, payload }))
    }
}
