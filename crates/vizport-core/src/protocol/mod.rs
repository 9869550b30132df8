//! Tag-based command/response protocol
//!
//! A request is a command name plus named arguments; a response is an ordered
//! sequence of string fields. Both travel as length-prefixed text frames:
//!
//! ```text
//! CMD 31\n
//! setCustomLayout|ncols=3|nrows=2
//! ```
//!
//! Inside a payload, fields are joined by `|`. A literal `|` inside a field is
//! written `\|` and a literal `\` is written `\\`, so argument values may hold
//! arbitrary text (paths, descriptions, whole file contents).
//!
//! The protocol has no success/failure flag. A response of exactly one empty
//! field means "no items" for list commands and "done" for void commands;
//! interpreting that is left to the caller.

pub mod codec;
pub mod command;
pub mod frame;

pub use codec::{decode_fields, encode_fields, escape_field, unescape_field};
pub use command::{ArgValue, Command};
pub use frame::{Frame, FrameTag, DEFAULT_MAX_FRAME_BYTES};

/// Separator between payload fields
pub const FIELD_DELIMITER: char = '|';

/// Escape character used inside payload fields
pub const ESCAPE_CHAR: char = '\\';

/// Separator between an argument name and its value
pub const ARG_SEPARATOR: char = '=';
