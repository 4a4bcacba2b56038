//! Template identifier resolution.
//!
//! Turns a caller-supplied template identifier into the absolute file path
//! that will be compiled. Resolution applies the engine's file-extension
//! convention and the `index.<ext>` directory convention:
//!
//! 1. An identifier that already carries the extension resolves directly
//!    against the view directory.
//! 2. Otherwise the extension is appended and that file is probed.
//! 3. If the probe misses but the extensionless path is a directory,
//!    `index.<ext>` inside that directory is used.
//! 4. Otherwise the extension-appended candidate is returned as-is and the
//!    downstream compile reports the miss.
//!
//! Absolute identifiers win over the view directory through `Path::join`
//! semantics. Symlinked directories are followed via `fs::metadata`.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ViewError;

/// Resolves a template identifier to an absolute file path.
///
/// `extension` is the engine's template extension without the leading dot.
///
/// # Errors
///
/// Returns [`ViewError::TemplateNotFound`] when neither the
/// extension-appended candidate nor the extensionless path exists, and
/// [`ViewError::Filesystem`] if a stat fails for another reason.
pub fn resolve_template(
    view_dir: &Path,
    template_id: &str,
    extension: &str,
) -> Result<PathBuf, ViewError> {
    let suffix = format!(".{extension}");
    let base = absolutize(view_dir.join(template_id))?;

    if template_id.ends_with(&suffix) {
        return Ok(base);
    }

    let candidate = append_extension(&base, extension);
    if candidate.exists() {
        return Ok(candidate);
    }

    // The candidate is missing; a directory at the bare path means the
    // identifier names a view folder with an index template.
    let meta = fs::metadata(&base).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => ViewError::TemplateNotFound {
            path: candidate.clone(),
        },
        _ => ViewError::filesystem(&base, err),
    })?;

    if meta.is_dir() {
        Ok(base.join(format!("index.{extension}")))
    } else {
        Ok(candidate)
    }
}

fn absolutize(path: PathBuf) -> Result<PathBuf, ViewError> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = env::current_dir().map_err(|err| ViewError::filesystem(&path, err))?;
    Ok(cwd.join(path))
}

fn append_extension(path: &Path, extension: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(format!(".{extension}"));
    PathBuf::from(os)
}
