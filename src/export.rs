//! Getting generated HTML out of the editor: clipboard and file download.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use base64::Engine;

/// File name used for every download.
pub const DOWNLOAD_FILE_NAME: &str = "newsletter.html";
/// Content type of the downloaded document.
pub const DOWNLOAD_CONTENT_TYPE: &str = "text/html";

/// Destination for copied output.
pub trait Clipboard {
    /// Place `text` on the clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error when the clipboard cannot be written.
    fn set_text(&self, text: &str) -> io::Result<()>;
}

/// The terminal's clipboard: `pbcopy` on macOS, OSC 52 everywhere else.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn set_text(&self, text: &str) -> io::Result<()> {
        #[cfg(target_os = "macos")]
        {
            match copy_to_pbcopy(text) {
                Ok(()) => return Ok(()),
                Err(err) => tracing::debug!(%err, "pbcopy unavailable, using OSC 52"),
            }
        }
        copy_to_clipboard_osc52(text)
    }
}

#[cfg(target_os = "macos")]
fn copy_to_pbcopy(text: &str) -> io::Result<()> {
    use std::process::{Command, Stdio};

    let mut child = Command::new("pbcopy").stdin(Stdio::piped()).spawn()?;
    let written = child
        .stdin
        .take()
        .map_or(Ok(()), |mut stdin| stdin.write_all(text.as_bytes()));
    let status = child.wait()?;
    written?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other("pbcopy exited with an error"))
    }
}

fn copy_to_clipboard_osc52(text: &str) -> io::Result<()> {
    let mut out = io::stdout();
    out.write_all(osc52_sequence(text).as_bytes())?;
    out.flush()
}

/// Escape sequence asking the terminal to set the system clipboard.
pub fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}

/// Write `html` to `newsletter.html` inside `dir`, replacing any previous download.
///
/// # Errors
///
/// Returns an error if the directory is missing or the file cannot be written.
pub fn write_download(dir: &Path, html: &str) -> io::Result<PathBuf> {
    let path = dir.join(DOWNLOAD_FILE_NAME);
    std::fs::write(&path, html)?;
    tracing::debug!(path = %path.display(), bytes = html.len(), "download written");
    Ok(path)
}
