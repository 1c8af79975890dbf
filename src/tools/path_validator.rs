use anyhow::{Result, bail};
use std::path::Path;

/// 副檔名長度上限（含前導點，不含）
const MAX_EXTENSION_LEN: usize = 255;

pub fn validate_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("Path does not exist: {}", path.display());
    }
    if !path.is_dir() {
        bail!("Path is not a directory: {}", path.display());
    }
    Ok(())
}

/// 驗證副檔名：必須以 `.` 開頭，長度介於 (1, 255) 之間
pub fn validate_extension(extension: &str) -> Result<()> {
    if !extension.starts_with('.') {
        bail!("Extension must start with '.': {extension}");
    }
    let len = extension.chars().count();
    if len <= 1 || len >= MAX_EXTENSION_LEN {
        bail!("Extension length must be between 2 and 254 characters: {extension}");
    }
    if extension[1..].contains(['/', '\\', '.']) || extension.chars().any(char::is_whitespace) {
        bail!("Extension contains invalid characters: {extension}");
    }
    Ok(())
}
