//! 片名索引模組
//!
//! 依查詢鍵分組的唯讀 (片名, 年份) 集合，建立後不再修改

use super::filename_normalizer::title_key;
use super::types::Record;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct TitleIndex {
    entries: BTreeMap<String, Vec<Record>>,
    record_count: usize,
}

impl TitleIndex {
    /// 建立索引
    ///
    /// 同名紀錄依年份由小到大排序，未知年份排在最後；
    /// 使用穩定排序，年份相同者保留原始順序
    pub fn load(records: impl IntoIterator<Item = Record>) -> Self {
        let mut entries: BTreeMap<String, Vec<Record>> = BTreeMap::new();
        let mut record_count = 0;

        for record in records {
            let key = title_key(&record.title);
            if key.is_empty() {
                continue;
            }
            entries.entry(key).or_default().push(record);
            record_count += 1;
        }

        for group in entries.values_mut() {
            group.sort_by_key(|record| (record.year.is_none(), record.year));
        }

        Self {
            entries,
            record_count,
        }
    }

    /// 以片名精確查詢（經過 `title_key` 正規化），找不到時回傳空切片
    #[must_use]
    pub fn lookup(&self, title: &str) -> &[Record] {
        self.entries
            .get(&title_key(title))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    #[must_use]
    pub const fn record_count(&self) -> usize {
        self.record_count
    }

    #[must_use]
    pub fn title_count(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn years(records: &[Record]) -> Vec<Option<u16>> {
        records.iter().map(|r| r.year).collect()
    }

    #[test]
    fn test_lookup_sorted_by_year() {
        let index = TitleIndex::load([
            Record::new("Heat", Some(2017)),
            Record::new("Heat", Some(1995)),
            Record::new("Alien", Some(1979)),
        ]);
        assert_eq!(years(index.lookup("Heat")), vec![Some(1995), Some(2017)]);
        assert_eq!(index.record_count(), 3);
        assert_eq!(index.title_count(), 2);
    }

    #[test]
    fn test_unknown_years_sort_last_and_stay_stable() {
        let index = TitleIndex::load([
            Record::new("Dune", None),
            Record::new("Dune", Some(2021)),
            Record::new("dune", None),
            Record::new("Dune", Some(1984)),
        ]);
        let found = index.lookup("Dune");
        assert_eq!(years(found), vec![Some(1984), Some(2021), None, None]);
        assert_eq!(found[2].title, "Dune");
        assert_eq!(found[3].title, "dune");
    }

    #[test]
    fn test_equal_years_keep_input_order() {
        let index = TitleIndex::load([
            Record::new("Crash", Some(2004)),
            Record::new("Crash ", Some(1996)),
            Record::new("CRASH", Some(2004)),
        ]);
        let titles: Vec<_> = index.lookup("crash").iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Crash ", "Crash", "CRASH"]);
    }

    #[test]
    fn test_lookup_is_exact_not_partial() {
        let index = TitleIndex::load([Record::new("The Matrix", Some(1999))]);
        assert!(index.lookup("Matrix").is_empty());
        assert!(index.lookup("The Matrix Reloaded").is_empty());
        assert_eq!(index.lookup("the  matrix").len(), 1);
    }

    #[test]
    fn test_blank_titles_ignored() {
        let index = TitleIndex::load([Record::new("   ", Some(2000))]);
        assert!(index.is_empty());
        assert_eq!(index.record_count(), 0);
    }
}
