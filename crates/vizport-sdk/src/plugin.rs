//! Plugin names for layout cells

use crate::error::{SdkError, SdkResult};
use crate::view::ViewKind;
use std::fmt;
use std::str::FromStr;

/// A plugin that can be placed in a layout cell
///
/// The known names are the ones the application ships with; anything else
/// goes through [`Plugin::Other`] unchecked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Plugin {
    CasaImageLoader,
    Animator,
    Statistics,
    Colormap,
    Histogram,
    /// Empty cell
    Hidden,
    Other(String),
}

impl Plugin {
    /// Name as the application spells it
    pub fn name(&self) -> &str {
        match self {
            Self::CasaImageLoader => "CasaImageLoader",
            Self::Animator => "Animator",
            Self::Statistics => "Statistics",
            Self::Colormap => "Colormap",
            Self::Histogram => "Histogram",
            Self::Hidden => "Hidden",
            Self::Other(name) => name,
        }
    }

    /// Kind of view this plugin produces, if it is a known one
    pub fn view_kind(&self) -> Option<ViewKind> {
        ViewKind::ALL
            .into_iter()
            .find(|kind| kind.plugin_name() == self.name())
    }

    fn validate(&self) -> SdkResult<()> {
        let name = self.name();
        if name.is_empty() {
            return Err(SdkError::invalid_argument("plugins", "plugin name is empty"));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(SdkError::invalid_argument(
                "plugins",
                format!("plugin name '{}' contains whitespace", name),
            ));
        }
        Ok(())
    }
}

impl From<ViewKind> for Plugin {
    fn from(kind: ViewKind) -> Self {
        match kind {
            ViewKind::Image => Self::CasaImageLoader,
            ViewKind::Colormap => Self::Colormap,
            ViewKind::Histogram => Self::Histogram,
            ViewKind::Animator => Self::Animator,
            ViewKind::Statistics => Self::Statistics,
        }
    }
}

impl FromStr for Plugin {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let plugin = match s {
            "CasaImageLoader" => Self::CasaImageLoader,
            "Animator" => Self::Animator,
            "Statistics" => Self::Statistics,
            "Colormap" => Self::Colormap,
            "Histogram" => Self::Histogram,
            "Hidden" => Self::Hidden,
            other => Self::Other(other.to_string()),
        };
        plugin.validate()?;
        Ok(plugin)
    }
}

impl fmt::Display for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Join plugin names into the space-separated `plugins` argument
pub fn join_plugins(plugins: &[Plugin]) -> SdkResult<String> {
    for plugin in plugins {
        plugin.validate()?;
    }
    Ok(plugins
        .iter()
        .map(Plugin::name)
        .collect::<Vec<_>>()
        .join(" "))
}
