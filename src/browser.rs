use crate::error::LaunchError;

pub trait BrowserLauncher {
    fn open(&self, url: &str) -> Result<(), LaunchError>;
}

/// Opens URLs in the user's default browser.
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), LaunchError> {
        webbrowser::open(url).map_err(|source| LaunchError::Browser { source })
    }
}
