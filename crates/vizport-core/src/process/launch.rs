//! Launch arguments for the application

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// What to start and how
///
/// The application is started as
/// `<executable> --scriptPort <port> --html <html> <image> [extra args...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    executable: PathBuf,
    port: u16,
    html: PathBuf,
    image: PathBuf,
    extra_args: Vec<OsString>,
    working_dir: Option<PathBuf>,
}

impl LaunchSpec {
    /// Describe a launch with the required arguments
    pub fn new(
        executable: impl Into<PathBuf>,
        port: u16,
        html: impl Into<PathBuf>,
        image: impl Into<PathBuf>,
    ) -> Self {
        Self {
            executable: executable.into(),
            port,
            html: html.into(),
            image: image.into(),
            extra_args: Vec::new(),
            working_dir: None,
        }
    }

    /// Append extra arguments after the standard ones
    pub fn extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the application in `dir`
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Executable path
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Script port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Working directory, if set
    pub fn current_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    /// Command-line arguments, passed to the process verbatim
    pub fn args(&self) -> Vec<OsString> {
        let mut args = Vec::with_capacity(5 + self.extra_args.len());
        args.push(OsString::from("--scriptPort"));
        args.push(OsString::from(self.port.to_string()));
        args.push(OsString::from("--html"));
        args.push(self.html.clone().into_os_string());
        args.push(self.image.clone().into_os_string());
        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// Arguments rendered for logs and error messages
    pub fn display_args(&self) -> Vec<String> {
        self.args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_arguments() {
        let spec = LaunchSpec::new("/opt/viewer/viewer", 9999, "/opt/viewer/index.html", "m42.fits");
        assert_eq!(
            spec.display_args(),
            vec!["--scriptPort", "9999", "--html", "/opt/viewer/index.html", "m42.fits"]
        );
    }

    #[test]
    fn test_extra_arguments_follow_image() {
        let spec = LaunchSpec::new("viewer", 1234, "index.html", "a.fits")
            .extra_args(["--debug", "--noGui"])
            .working_dir("/tmp");
        let args = spec.display_args();
        assert_eq!(&args[4..], &["a.fits", "--debug", "--noGui"]);
        assert_eq!(spec.current_dir(), Some(Path::new("/tmp")));
    }

    #[test]
    fn test_paths_with_spaces_are_one_argument() {
        let spec = LaunchSpec::new("viewer", 1, "my pages/index.html", "deep field.fits");
        let args = spec.args();
        assert_eq!(args.len(), 5);
        assert_eq!(args[3], OsString::from("my pages/index.html"));
    }
}
