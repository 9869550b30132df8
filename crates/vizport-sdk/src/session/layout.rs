//! Layout, plugins and links between views

use super::Session;
use crate::error::SdkResult;
use crate::plugin::{Plugin, join_plugins};
use crate::view::View;
use tracing::instrument;
use vizport_core::Command;

impl Session {
    /// Switch to the predefined analysis layout
    pub async fn set_analysis_layout(&mut self) -> SdkResult<()> {
        self.execute_void(&Command::new("setAnalysisLayout")).await
    }

    /// Switch to the predefined single-image layout
    pub async fn set_image_layout(&mut self) -> SdkResult<()> {
        self.execute_void(&Command::new("setImageLayout")).await
    }

    /// Set the layout grid to `rows` x `cols`
    #[instrument(skip(self))]
    pub async fn set_custom_layout(&mut self, rows: u32, cols: u32) -> SdkResult<()> {
        let command = Command::new("setCustomLayout")
            .arg("nrows", rows)
            .arg("ncols", cols);
        self.execute_void(&command).await
    }

    /// Assign a plugin to each cell of the layout, in cell order
    #[instrument(skip(self), fields(count = plugins.len()))]
    pub async fn set_plugins(&mut self, plugins: &[Plugin]) -> SdkResult<()> {
        let joined = join_plugins(plugins)?;
        self.execute_void(&Command::new("setPlugins").arg("plugins", joined))
            .await
    }

    /// Link `source` to `dest`, e.g. an image view to a histogram view
    pub async fn add_link(&mut self, source: &View, dest: &View) -> SdkResult<()> {
        self.execute_void(&link_command("addLink", source, dest))
            .await
    }

    /// Remove the link from `source` to `dest`
    pub async fn remove_link(&mut self, source: &View, dest: &View) -> SdkResult<()> {
        self.execute_void(&link_command("removeLink", source, dest))
            .await
    }
}

fn link_command(name: &str, source: &View, dest: &View) -> Command {
    Command::new(name)
        .arg("sourceView", source.id())
        .arg("destView", dest.id())
}
