//! Owner-only filesystem helpers shared by the file backend and the
//! key sources.
//!
//! Every helper opens, operates and drops its handle before returning,
//! so no file descriptor outlives a single call.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::errors::Result;

/// Create `dir` (and parents) and restrict it to the owner.
pub fn create_private_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    }

    Ok(())
}

/// Open a file for writing with owner-only permissions.
fn private_options() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.write(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options
}

fn write_and_sync(mut file: File, contents: &[u8]) -> Result<()> {
    file.write_all(contents)?;
    file.sync_all()?;
    Ok(())
}

/// Write `contents` to `path` **atomically** with owner-only permissions.
///
/// The bytes go to a uniquely named hidden temp file in the same
/// directory which is then renamed over the target, so readers see
/// either the old file or a complete new one and concurrent writers
/// never share a temp file.  The temp file is removed if anything fails.
pub fn write_private_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let prefix = format!(
        ".{}.",
        path.file_name().unwrap_or_default().to_string_lossy()
    );

    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix).suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o600));
    }

    let mut tmp = builder.tempfile_in(parent)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Create `path` with `contents` only if it does not exist yet.
///
/// Returns `Ok(false)` when another writer got there first, so callers
/// can read the winner's file instead of overwriting it.
pub fn create_private_new(path: &Path, contents: &[u8]) -> Result<bool> {
    match private_options().create_new(true).open(path) {
        Ok(file) => {
            write_and_sync(file, contents)?;
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e.into()),
    }
}
