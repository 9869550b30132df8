//! Enumerating colormaps and views

use super::Session;
use crate::error::SdkResult;
use crate::response::expect_list;
use crate::view::{View, ViewKind};
use tracing::instrument;
use vizport_core::{ArgValue, Command};

impl Session {
    /// Names of the colormaps the application offers
    pub async fn colormaps(&mut self) -> SdkResult<Vec<String>> {
        self.execute_list(&Command::new("getColormaps")).await
    }

    /// Views of one kind in the current layout
    #[instrument(skip(self))]
    pub async fn views(&mut self, kind: ViewKind) -> SdkResult<Vec<View>> {
        let ids = self.execute_list(&Command::new(kind.list_command())).await?;
        Ok(ids.into_iter().map(|id| View::new(kind, id)).collect())
    }

    /// Image views; shorthand for `views(ViewKind::Image)`
    pub async fn image_views(&mut self) -> SdkResult<Vec<View>> {
        self.views(ViewKind::Image).await
    }

    /// Colormap views
    pub async fn colormap_views(&mut self) -> SdkResult<Vec<View>> {
        self.views(ViewKind::Colormap).await
    }

    /// Animator views
    pub async fn animator_views(&mut self) -> SdkResult<Vec<View>> {
        self.views(ViewKind::Animator).await
    }

    /// Histogram views
    pub async fn histogram_views(&mut self) -> SdkResult<Vec<View>> {
        self.views(ViewKind::Histogram).await
    }

    /// Statistics views
    pub async fn statistics_views(&mut self) -> SdkResult<Vec<View>> {
        self.views(ViewKind::Statistics).await
    }

    /// Run a per-view command and return its fields
    ///
    /// The view id is added under the argument name its kind uses. Commands
    /// the kind doesn't support are rejected without touching the wire.
    pub async fn view_command<I, K, V>(
        &mut self,
        view: &View,
        name: &str,
        args: I,
    ) -> SdkResult<Vec<String>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ArgValue>,
    {
        let mut command = view.command(name)?;
        for (k, v) in args {
            command.set_arg(k, v);
        }
        let fields = self.execute_command(&command).await?;
        Ok(expect_list(fields))
    }
}
