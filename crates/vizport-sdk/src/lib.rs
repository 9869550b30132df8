//! Vizport SDK
//!
//! High-level control of the visualization application: launch it, list its
//! colormaps and views, arrange the layout, link views and manage snapshots.
//! Everything goes through one [`Session`], which owns the script connection
//! and, when it launched the application, the process too.
//!
//! # Example
//!
//! ```no_run
//! use vizport_sdk::{Plugin, Session, VizportConfig};
//!
//! # async fn example() -> vizport_sdk::SdkResult<()> {
//! let mut session = Session::launch(&VizportConfig::default()).await?;
//!
//! session.set_custom_layout(1, 2).await?;
//! session
//!     .set_plugins(&[Plugin::CasaImageLoader, Plugin::Histogram])
//!     .await?;
//!
//! let images = session.image_views().await?;
//! let histograms = session.histogram_views().await?;
//! if let (Some(image), Some(histogram)) = (images.first(), histograms.first()) {
//!     session.add_link(image, histogram).await?;
//! }
//!
//! session.terminate().await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod plugin;
pub mod response;
pub mod session;
pub mod snapshot;
pub mod view;

pub use error::{SdkError, SdkResult};
pub use plugin::Plugin;
pub use session::Session;
pub use snapshot::Snapshot;
pub use view::{View, ViewKind};

// Re-export commonly used types from core
pub use vizport_core::{
    ArgValue, Command, ConfigLoader, ConfigOverrides, ConnectOptions, Connector, ScriptError,
    ScriptResult, UnifiedError, VizportConfig,
};
