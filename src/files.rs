use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::Result;

/// Derive the artifact path for an input file and suffix:
/// `{dir}/{basename}_{suffix}.md`, or `{dir}/{basename}.md` when the suffix
/// is empty. Prior runs are discovered through this exact scheme, so it is
/// a compatibility contract.
pub fn output_path(input: &Path, suffix: &str) -> PathBuf {
    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    let base = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    if suffix.is_empty() {
        dir.join(format!("{}.md", base))
    } else {
        dir.join(format!("{}_{}.md", base, suffix))
    }
}

/// True when `path` exists and is a regular file.
pub fn file_exists(path: &Path) -> bool {
    path.is_file()
}

/// Write `data` to `path`, creating parent directories as needed.
pub async fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, data).await?;
    Ok(())
}

pub async fn read_file(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path).await?)
}
