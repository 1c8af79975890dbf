use rust_i18n::t;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

/// 最近使用路徑的保留數量
pub const MAX_RECENT_PATHS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTypeTable {
    #[serde(rename = "VIDEO_FILE")]
    pub video_file: Vec<String>,
}

impl FileTypeTable {
    #[must_use]
    pub fn video_extensions_set(&self) -> HashSet<String> {
        self.video_file
            .iter()
            .map(|ext| ext.to_lowercase())
            .collect()
    }
}

/// 介面語言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Language {
    /// rust-i18n 使用的 locale 代碼
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ZhTw => "zh-TW",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnUs => write!(f, "English"),
            Self::ZhTw => write!(f, "繁體中文"),
        }
    }
}

/// 多筆候選時的年份處理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum YearPolicy {
    /// 檔名帶有年份且恰好一筆候選符合時自動選取，否則詢問使用者
    #[default]
    PreferFilenameYear,
    /// 只要有多筆候選就一律詢問使用者
    AlwaysAsk,
}

impl fmt::Display for YearPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreferFilenameYear => {
                write!(f, "{}", t!("settings.year_policy.prefer_filename_year"))
            }
            Self::AlwaysAsk => write!(f, "{}", t!("settings.year_policy.always_ask")),
        }
    }
}

/// 可視為上映年份的數值範圍
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub min: u16,
    pub max: u16,
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            min: 1888,
            max: 2100,
        }
    }
}

impl YearRange {
    #[must_use]
    pub const fn contains(&self, year: u16) -> bool {
        year >= self.min && year <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub language: Language,
    pub dataset_path: PathBuf,
    pub title_type: String,
    pub default_extension: String,
    pub year_policy: YearPolicy,
    pub year_range: YearRange,
    pub recent_paths: Vec<String>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            dataset_path: PathBuf::from("Imdb_Dataset").join("title.basics.tsv"),
            title_type: "movie".to_string(),
            default_extension: ".mkv".to_string(),
            year_policy: YearPolicy::default(),
            year_range: YearRange::default(),
            recent_paths: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub file_type_table: FileTypeTable,
    pub settings: UserSettings,
    /// 設定變更時寫回的檔案
    pub settings_path: PathBuf,
}
