//! 檔名正規化模組
//!
//! 從 release 風格的檔名中擷取片名片段與年份

use super::types::FileEntry;
use crate::config::YearRange;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// 正規化結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedName {
    pub title_fragment: String,
    pub year: Option<u16>,
}

/// 年份標記：分隔符號之後的四位數字，前面可帶一個短數字（版本/集數）
static REGEX_YEAR_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[._\s(\[]+(?:\d{1,2}[._\s]+)?(?P<year>\d{4})(?:[._\s)\]]|$)")
        .expect("Invalid regex")
});

/// 分隔符號與殘留的括號
static REGEX_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[._\s()\[\]]+").expect("Invalid regex"));

static REGEX_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

/// 檔名正規化器
pub struct FilenameNormalizer {
    year_range: YearRange,
    regex_year_marker: &'static Regex,
    regex_separators: &'static Regex,
}

impl Default for FilenameNormalizer {
    fn default() -> Self {
        Self::new(YearRange::default())
    }
}

impl FilenameNormalizer {
    pub fn new(year_range: YearRange) -> Self {
        Self {
            year_range,
            regex_year_marker: &REGEX_YEAR_MARKER,
            regex_separators: &REGEX_SEPARATORS,
        }
    }

    /// 正規化不含副檔名的檔名
    ///
    /// 取第一個落在年份範圍內的年份標記之前的文字作為片名；
    /// 找不到年份時整個檔名即為片名，`year` 為 `None`
    pub fn normalize(&self, raw_stem: &str) -> NormalizedName {
        let mut pos = 0;
        while let Some(caps) = self.regex_year_marker.captures_at(raw_stem, pos) {
            let (Some(marker), Some(year_match)) = (caps.get(0), caps.name("year")) else {
                break;
            };
            pos = year_match.end();

            let Ok(year) = year_match.as_str().parse::<u16>() else {
                continue;
            };
            if !self.year_range.contains(year) {
                continue;
            }

            let title_fragment = self.clean_fragment(&raw_stem[..marker.start()]);
            if title_fragment.is_empty() {
                continue;
            }
            return NormalizedName {
                title_fragment,
                year: Some(year),
            };
        }

        NormalizedName {
            title_fragment: self.clean_fragment(raw_stem),
            year: None,
        }
    }

    /// 由檔案路徑建立 `FileEntry`，路徑沒有檔名時回傳 `None`
    pub fn file_entry(&self, path: &Path) -> Option<FileEntry> {
        let file_name = path.file_name()?.to_string_lossy().to_string();
        let (stem, extension) = split_extension(&file_name);
        let normalized = self.normalize(stem);

        Some(FileEntry {
            path: path.to_path_buf(),
            extension: extension.to_string(),
            cleaned_title: normalized.title_fragment,
            year: normalized.year,
            original_file_name: file_name,
        })
    }

    /// 將 `.`、`_`、括號與連續空白轉為單一空白並去除頭尾空白
    fn clean_fragment(&self, fragment: &str) -> String {
        self.regex_separators
            .replace_all(fragment, " ")
            .trim()
            .to_string()
    }
}

/// 片名索引的查詢鍵：去除頭尾空白、合併連續空白、轉小寫
#[must_use]
pub fn title_key(title: &str) -> String {
    REGEX_WHITESPACE
        .replace_all(title.trim(), " ")
        .to_lowercase()
}

/// 將檔名拆成 (主檔名, 副檔名)，副檔名含前導點
#[must_use]
pub fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => file_name.split_at(idx),
        _ => (file_name, ""),
    }
}
