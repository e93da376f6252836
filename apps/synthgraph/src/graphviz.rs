//! # Graphviz Output
//!
//! Writes the DOT rendering of a session to disk and, when asked, runs the
//! `dot` tool to turn it into a PNG. When a PNG is requested the `.dot` file
//! is an intermediate and is removed whether or not rendering succeeds.

use std::path::{Path, PathBuf};
use std::process::Command;
use synthgraph_core::{Session, SynthError, render_dot};

/// Where `visualize` puts its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualizeTarget {
    /// Directory for the `.dot` file.
    pub dot_dir: PathBuf,
    /// Directory for the `.png`; `None` keeps the `.dot` and skips Graphviz.
    pub png_dir: Option<PathBuf>,
    /// Graphviz executable.
    pub dot_program: PathBuf,
}

impl Default for VisualizeTarget {
    fn default() -> Self {
        Self {
            dot_dir: PathBuf::from("."),
            png_dir: Some(PathBuf::from("img")),
            dot_program: PathBuf::from("dot"),
        }
    }
}

/// Output base names become file names, so no separators or dots.
fn validate_name(name: &str) -> Result<(), SynthError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(SynthError::InvalidLabel(name.to_string()))
    }
}

/// Write `<dot_dir>/<name>.dot`.
pub fn write_dot(session: &Session, dir: &Path, name: &str) -> Result<PathBuf, SynthError> {
    validate_name(name)?;
    let path = dir.join(format!("{name}.dot"));
    std::fs::write(&path, render_dot(session))
        .map_err(|e| SynthError::IoError(format!("Write {}: {}", path.display(), e)))?;
    Ok(path)
}

/// Run `<program> -Tpng <dot> -o <png>`.
pub fn render_png(program: &Path, dot_path: &Path, png_path: &Path) -> Result<(), SynthError> {
    let status = Command::new(program)
        .arg("-Tpng")
        .arg(dot_path)
        .arg("-o")
        .arg(png_path)
        .status()
        .map_err(|e| {
            SynthError::IoError(format!("Failed to run {}: {}", program.display(), e))
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(SynthError::IoError(format!(
            "{} exited with {status}",
            program.display()
        )))
    }
}

/// Produce the requested files. Returns the path of the final artifact.
pub fn visualize(
    session: &Session,
    target: &VisualizeTarget,
    name: &str,
) -> Result<PathBuf, SynthError> {
    let dot_path = write_dot(session, &target.dot_dir, name)?;
    let Some(png_dir) = &target.png_dir else {
        return Ok(dot_path);
    };

    let png_path = png_dir.join(format!("{name}.png"));
    let rendered = std::fs::create_dir_all(png_dir)
        .map_err(|e| SynthError::IoError(format!("Create {}: {}", png_dir.display(), e)))
        .and_then(|()| render_png(&target.dot_program, &dot_path, &png_path));

    if let Err(e) = std::fs::remove_file(&dot_path) {
        tracing::warn!("Could not remove {}: {}", dot_path.display(), e);
    }
    rendered.map(|()| png_path)
}
