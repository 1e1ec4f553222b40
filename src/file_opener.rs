// Hands an image to the desktop's default viewer

use crate::error::{ApproveError, Result};
use std::io;
use std::path::Path;
use tracing::info;

/// Opens `path` with the system's default application for its type.
///
/// Blocks until the launcher (xdg-open, open, start) returns, which is usually
/// right after the viewer has been spawned.
pub fn open_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ApproveError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} not found", path.display()),
        )));
    }

    open::that(path)?;
    info!(path = %path.display(), "opened in external viewer");
    Ok(())
}
