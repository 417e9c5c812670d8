use std::io::Write;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::LaunchError;

/// Copies text to the system clipboard.
/// - macOS: `pbcopy`
/// - Linux: `xclip`, falling back to `xsel`
/// - Windows: `clip`
pub fn copy(text: &str) -> Result<(), LaunchError> {
    #[cfg(target_os = "macos")]
    {
        pipe_to("pbcopy", &[], text)
    }

    #[cfg(target_os = "linux")]
    {
        pipe_to("xclip", &["-selection", "clipboard"], text).or_else(|e| {
            debug!("{}, trying xsel", e);
            pipe_to("xsel", &["--clipboard", "--input"], text)
        })
    }

    #[cfg(target_os = "windows")]
    {
        pipe_to("clip", &[], text)
    }

    #[cfg(not(any(
        target_os = "macos",
        target_os = "linux",
        target_os = "windows"
    )))]
    {
        let _ = text;
        Err(LaunchError::Unsupported {
            os: std::env::consts::OS,
        })
    }
}

#[allow(dead_code)]
fn pipe_to(
    program: &'static str,
    args: &[&str],
    text: &str,
) -> Result<(), LaunchError> {
    let spawn_err = |source| LaunchError::Spawn { program, source };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(spawn_err)?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes()).map_err(spawn_err)?;
    }

    let status = child.wait().map_err(spawn_err)?;
    if status.success() {
        debug!(program, "copied to clipboard");
        Ok(())
    } else {
        Err(LaunchError::Failed { program, status })
    }
}
