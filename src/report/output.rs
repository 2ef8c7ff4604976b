use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::info;

use crate::types::{OverviewError, Result, ResultExt};

/// Writes generated documents into one output directory.
pub struct OutputWriter {
    directory: PathBuf,
}

impl OutputWriter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Create the directory if needed and write `content` to `file_name`.
    ///
    /// `file_name` may contain subdirectories but must stay inside the output
    /// directory.
    pub fn write(&self, file_name: &str, content: &str) -> Result<PathBuf> {
        let relative = Path::new(file_name);
        if file_name.trim().is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(OverviewError::Output(format!(
                "Invalid output file name: '{}'",
                file_name
            )));
        }

        let path = self.directory.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(format!("Cannot create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(format!("Cannot write {}", path.display()))?;
        info!("Wrote {}", path.display());
        Ok(path)
    }
}
