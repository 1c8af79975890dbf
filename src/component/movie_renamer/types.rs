//! 比對流程的資料模型

use std::fmt;
use std::path::{Path, PathBuf};

/// 資料集中的一筆 (片名, 年份)；年份未知時為 `None`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    pub title: String,
    pub year: Option<u16>,
}

impl Record {
    pub fn new(title: impl Into<String>, year: Option<u16>) -> Self {
        Self {
            title: title.into(),
            year,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "{} ({year})", self.title),
            None => write!(f, "{} (unknown year)", self.title),
        }
    }
}

/// 掃描到的媒體檔案以及正規化後的片名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub original_file_name: String,
    /// 原始副檔名（含前導點，保留大小寫）
    pub extension: String,
    pub cleaned_title: String,
    /// 檔名中偵測到的年份
    pub year: Option<u16>,
}

impl FileEntry {
    #[must_use]
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// 已確定的比對結果，交給 rename planner 使用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedMatch {
    pub original_file_name: String,
    pub chosen_title: String,
    pub chosen_year: Option<u16>,
}

impl SelectedMatch {
    #[must_use]
    pub fn new(entry: &FileEntry, record: &Record) -> Self {
        Self {
            original_file_name: entry.original_file_name.clone(),
            chosen_title: record.title.clone(),
            chosen_year: record.year,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_display() {
        assert_eq!(Record::new("Heat", Some(1995)).to_string(), "Heat (1995)");
        assert_eq!(
            Record::new("Heat", None).to_string(),
            "Heat (unknown year)"
        );
    }

    #[test]
    fn test_file_entry_directory() {
        let entry = FileEntry {
            path: PathBuf::from("/movies/Heat.1995.mkv"),
            original_file_name: "Heat.1995.mkv".to_string(),
            extension: ".mkv".to_string(),
            cleaned_title: "Heat".to_string(),
            year: Some(1995),
        };
        assert_eq!(entry.directory(), Path::new("/movies"));
    }
}
