//! 比對解析模組
//!
//! 以片名查詢索引，遇到多筆候選時交由注入的 `ChoiceProvider` 決定

use super::title_index::TitleIndex;
use super::types::{FileEntry, Record, SelectedMatch};
use crate::config::YearPolicy;
use anyhow::Result;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};

/// 使用者對候選清單的回應
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// 選取候選清單中的索引（由 resolver 驗證範圍）
    Pick(usize),
    /// 略過此檔案
    Skip,
    /// 停止處理剩餘的檔案
    Abort,
}

/// 多筆候選時的選擇提供者
///
/// 候選依年份由小到大排列；重新詢問無效輸入是實作者的責任
pub trait ChoiceProvider {
    fn choose(&mut self, entry: &FileEntry, candidates: &[Record]) -> Result<Choice>;
}

/// 單一檔案的比對結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    NoMatch,
    /// 只有一筆候選，自動選取
    Unique(Record),
    /// 多筆候選，以檔名年份自動選取
    YearMatched(Record),
    /// 多筆候選，由使用者選取
    Chosen(Record),
    Skipped,
    InvalidSelection {
        index: usize,
        candidate_count: usize,
    },
    Aborted,
    /// 選擇提供者回傳錯誤（例如終端機讀取失敗）
    ChooserFailed {
        message: String,
    },
}

impl MatchOutcome {
    #[must_use]
    pub const fn record(&self) -> Option<&Record> {
        match self {
            Self::Unique(record) | Self::YearMatched(record) | Self::Chosen(record) => Some(record),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.record().is_some()
    }

    #[must_use]
    pub fn selected_match(&self, entry: &FileEntry) -> Option<SelectedMatch> {
        self.record().map(|record| SelectedMatch::new(entry, record))
    }
}

pub struct MatchResolver<'a> {
    index: &'a TitleIndex,
    year_policy: YearPolicy,
}

impl<'a> MatchResolver<'a> {
    pub const fn new(index: &'a TitleIndex, year_policy: YearPolicy) -> Self {
        Self { index, year_policy }
    }

    /// 解析單一檔案
    ///
    /// 只有在多筆候選且無法依策略自動決定時才會呼叫 `chooser`；
    /// `chooser` 回傳錯誤時只影響此檔案，結果為 `ChooserFailed`
    pub fn resolve(&self, entry: &FileEntry, chooser: &mut dyn ChoiceProvider) -> MatchOutcome {
        let candidates = self.index.lookup(&entry.cleaned_title);

        let outcome = match candidates {
            [] => MatchOutcome::NoMatch,
            [only] => MatchOutcome::Unique(only.clone()),
            _ => {
                if let Some(record) = self.match_by_filename_year(entry, candidates) {
                    MatchOutcome::YearMatched(record.clone())
                } else {
                    match chooser.choose(entry, candidates) {
                        Ok(Choice::Pick(index)) => candidates.get(index).map_or(
                            MatchOutcome::InvalidSelection {
                                index,
                                candidate_count: candidates.len(),
                            },
                            |record| MatchOutcome::Chosen(record.clone()),
                        ),
                        Ok(Choice::Skip) => MatchOutcome::Skipped,
                        Ok(Choice::Abort) => MatchOutcome::Aborted,
                        Err(e) => {
                            warn!(
                                "Choice prompt failed for '{}': {e:#}",
                                entry.original_file_name
                            );
                            MatchOutcome::ChooserFailed {
                                message: format!("{e:#}"),
                            }
                        }
                    }
                }
            }
        };

        debug!(
            "Resolved '{}' ({}) -> {:?}",
            entry.original_file_name, entry.cleaned_title, outcome
        );
        outcome
    }

    /// 依序解析所有檔案
    ///
    /// 使用者中止、選擇提供者失敗或收到中斷信號後，其餘檔案標記為 `Aborted`；
    /// 已取得的結果一律保留
    pub fn resolve_all(
        &self,
        entries: &[FileEntry],
        chooser: &mut dyn ChoiceProvider,
        shutdown_signal: &AtomicBool,
    ) -> Vec<MatchOutcome> {
        let mut outcomes = Vec::with_capacity(entries.len());
        let mut stopped = false;

        for entry in entries {
            if !stopped && shutdown_signal.load(Ordering::SeqCst) {
                info!("Shutdown requested, leaving remaining files unresolved");
                stopped = true;
            }
            if stopped {
                outcomes.push(MatchOutcome::Aborted);
                continue;
            }

            let outcome = self.resolve(entry, chooser);
            if matches!(
                outcome,
                MatchOutcome::Aborted | MatchOutcome::ChooserFailed { .. }
            ) {
                info!("Matching stopped at '{}'", entry.original_file_name);
                stopped = true;
            }
            outcomes.push(outcome);
        }

        outcomes
    }

    fn match_by_filename_year<'r>(
        &self,
        entry: &FileEntry,
        candidates: &'r [Record],
    ) -> Option<&'r Record> {
        if self.year_policy != YearPolicy::PreferFilenameYear {
            return None;
        }
        let year = entry.year?;
        let mut matching = candidates.iter().filter(|r| r.year == Some(year));
        match (matching.next(), matching.next()) {
            (Some(record), None) => Some(record),
            _ => None,
        }
    }
}
