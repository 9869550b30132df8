//! View handles
//!
//! The application identifies each view by an opaque string id. A [`View`]
//! pairs that id with the kind of view it is, so a command meant for a
//! colormap view can't be sent with a histogram id by accident.

use crate::error::{SdkError, SdkResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use vizport_core::{ArgValue, Command};

/// The kinds of view a layout can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Image,
    Colormap,
    Histogram,
    Animator,
    Statistics,
}

impl ViewKind {
    /// Every kind, in listing order
    pub const ALL: [ViewKind; 5] = [
        ViewKind::Image,
        ViewKind::Colormap,
        ViewKind::Histogram,
        ViewKind::Animator,
        ViewKind::Statistics,
    ];

    /// Command that lists the views of this kind
    pub fn list_command(&self) -> &'static str {
        match self {
            Self::Image => "getImageViews",
            Self::Colormap => "getColormapViews",
            Self::Histogram => "getHistogramViews",
            Self::Animator => "getAnimatorViews",
            Self::Statistics => "getStatisticsViews",
        }
    }

    /// Plugin that renders this kind of view
    pub fn plugin_name(&self) -> &'static str {
        match self {
            Self::Image => "CasaImageLoader",
            Self::Colormap => "Colormap",
            Self::Histogram => "Histogram",
            Self::Animator => "Animator",
            Self::Statistics => "Statistics",
        }
    }

    /// Argument that carries the view id in per-view commands
    pub fn id_arg(&self) -> &'static str {
        match self {
            Self::Image => "imageView",
            Self::Colormap => "colormapId",
            Self::Histogram => "histogramView",
            Self::Animator => "animatorView",
            Self::Statistics => "statisticsView",
        }
    }

    /// Commands the application accepts for a view of this kind
    pub fn commands(&self) -> &'static [&'static str] {
        match self {
            Self::Image => &[
                "loadFile",
                "loadLocalFile",
                "getLinkedColormaps",
                "getLinkedAnimators",
                "getLinkedHistograms",
                "getLinkedStatistics",
                "setClipValue",
                "centerOnPixel",
                "setZoomLevel",
                "getZoomLevel",
                "saveImage",
            ],
            Self::Colormap => &[
                "setColormap",
                "reverseColormap",
                "invertColormap",
                "setColorMix",
                "setGamma",
                "setDataTransform",
            ],
            Self::Histogram => &[
                "setClipRange",
                "setBinCount",
                "setBinWidth",
                "setPlaneMode",
                "setGraphStyle",
                "setLogCount",
                "setColored",
                "saveHistogram",
            ],
            Self::Animator => &[
                "setChannel",
                "setImage",
                "showImageAnimator",
                "getMaxImageCount",
                "getChannelIndex",
            ],
            Self::Statistics => &["getStatistics"],
        }
    }

    /// Whether `command` is valid for a view of this kind
    pub fn supports(&self, command: &str) -> bool {
        self.commands().contains(&command)
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Image => "image",
            Self::Colormap => "colormap",
            Self::Histogram => "histogram",
            Self::Animator => "animator",
            Self::Statistics => "statistics",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ViewKind {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                SdkError::invalid_argument(
                    "kind",
                    format!(
                        "unknown view kind '{}', expected one of image, colormap, histogram, animator, statistics",
                        s
                    ),
                )
            })
    }
}

/// A view in the application's current layout
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct View {
    kind: ViewKind,
    id: String,
}

impl View {
    /// Wrap an id returned by the application
    pub fn new(kind: ViewKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    /// Kind of view
    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    /// Opaque id, as the application reported it
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether `command` is valid for this view
    pub fn supports(&self, command: &str) -> bool {
        self.kind.supports(command)
    }

    /// Build a per-view command, with the view id already filled in
    ///
    /// Fails with [`SdkError::InvalidArgument`] for a command the view's kind
    /// doesn't accept.
    pub fn command(&self, name: &str) -> SdkResult<Command> {
        if !self.supports(name) {
            return Err(SdkError::invalid_argument(
                "command",
                format!("'{}' is not a {} view command", name, self.kind),
            ));
        }
        Ok(Command::new(name).arg(self.kind.id_arg(), ArgValue::from(self.id.as_str())))
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}
