//! 資料集讀取模組
//!
//! 支援 IMDb `title.basics.tsv` 以及排序後的清單格式 `Title - (Year),`

use super::error::DatasetError;
use super::types::Record;
use log::{debug, info};
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

/// IMDb 表頭的第一個欄位
const IMDB_HEADER_PREFIX: &str = "tconst\t";

const IMDB_COL_TITLE_TYPE: usize = 1;
const IMDB_COL_PRIMARY_TITLE: usize = 2;
const IMDB_COL_START_YEAR: usize = 5;

static REGEX_LIST_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<title>.+?) - \((?P<year>[^()]*)\),?$").expect("Invalid regex")
});

/// 讀取資料集並回傳已篩選的紀錄
///
/// # Arguments
/// * `path` - 資料集路徑
/// * `title_type` - IMDb 格式時保留的 `titleType`（例如 `movie`）
pub fn load_records(path: &Path, title_type: &str) -> Result<Vec<Record>, DatasetError> {
    let unavailable = |source| DatasetError::DataUnavailable {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(unavailable)?;
    let records = parse_records(BufReader::new(file), title_type).map_err(unavailable)?;

    if records.is_empty() {
        return Err(DatasetError::Empty {
            path: path.to_path_buf(),
        });
    }

    info!(
        "Loaded {} records from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

/// 從任意讀取來源解析紀錄，依第一行判斷格式
pub fn parse_records<R: BufRead>(reader: R, title_type: &str) -> std::io::Result<Vec<Record>> {
    let mut lines = reader.lines();
    let mut records = Vec::new();

    let Some(first) = lines.next().transpose()? else {
        return Ok(records);
    };
    let first = first.trim_start_matches('\u{feff}');

    if first.starts_with(IMDB_HEADER_PREFIX) {
        for line in lines {
            if let Some(record) = parse_imdb_row(&line?, title_type) {
                records.push(record);
            }
        }
    } else {
        records.extend(parse_list_line(first));
        for line in lines {
            records.extend(parse_list_line(&line?));
        }
    }

    Ok(records)
}

fn parse_imdb_row(line: &str, title_type: &str) -> Option<Record> {
    let columns: Vec<&str> = line.split('\t').collect();
    if columns.len() <= IMDB_COL_START_YEAR {
        if !line.trim().is_empty() {
            debug!("Skipping short dataset row: {line}");
        }
        return None;
    }
    if columns[IMDB_COL_TITLE_TYPE] != title_type {
        return None;
    }

    let title = columns[IMDB_COL_PRIMARY_TITLE].trim();
    if title.is_empty() {
        return None;
    }
    Some(Record::new(title, parse_year(columns[IMDB_COL_START_YEAR])))
}

fn parse_list_line(line: &str) -> Option<Record> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(caps) = REGEX_LIST_LINE.captures(line) else {
        debug!("Skipping unrecognised dataset line: {line}");
        return None;
    };
    let title = caps.name("title")?.as_str().trim();
    let year = caps.name("year").and_then(|m| parse_year(m.as_str()));
    Some(Record::new(title, year))
}

/// 非數字的年份（如 `\N`）視為未知
fn parse_year(raw: &str) -> Option<u16> {
    raw.trim().parse().ok()
}
