use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 掃描單一資料夾（不遞迴）中符合副檔名的檔案，依檔名排序
///
/// 副檔名比對不分大小寫，`extension` 需含前導點
pub fn scan_media_files(directory: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let wanted = extension.trim_start_matches('.').to_lowercase();

    let mut files = Vec::new();
    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry =
            entry.with_context(|| format!("Failed to read directory: {}", directory.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.to_lowercase() == wanted);
        if matches {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
