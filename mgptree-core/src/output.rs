use crate::error::{MgpError, Result};
use std::fs;
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::NamedTempFile;

/// Directory a file at `path` lives in, `.` for bare file names.
pub(crate) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Create a temporary file next to `path`, hand it to `fill`, then rename it
/// over `path`. If `fill` fails the existing file at `path` is untouched.
pub fn replace_atomically<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut NamedTempFile) -> Result<()>,
{
    let mut builder = tempfile::Builder::new();
    builder.prefix(".mgptree-").suffix(".tmp");
    // Temp files default to owner-only; new outputs get the usual 0666 less umask.
    #[cfg(unix)]
    builder.permissions(fs::Permissions::from_mode(0o666));
    let mut temp = builder.tempfile_in(parent_dir(path))?;

    fill(&mut temp)?;
    // A replaced file keeps its previous mode.
    if let Ok(existing) = fs::metadata(path) {
        temp.as_file().set_permissions(existing.permissions())?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| MgpError::Io(e.error))?;
    Ok(())
}

pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    replace_atomically(path, |temp| {
        temp.write_all(contents)?;
        temp.flush()?;
        Ok(())
    })
}
