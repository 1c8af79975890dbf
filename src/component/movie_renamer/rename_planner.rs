//! 重新命名規劃模組
//!
//! 將比對結果轉為 (來源 -> 目標) 操作並逐一套用，單一檔案失敗不影響其他檔案

use super::error::RenameError;
use super::match_resolver::MatchOutcome;
use super::types::{FileEntry, SelectedMatch};
use log::{debug, warn};
use regex::Regex;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static REGEX_ILLEGAL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1f]"#).expect("Invalid regex"));

static REGEX_MULTIPLE_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOp {
    pub from: PathBuf,
    pub to: PathBuf,
}

impl fmt::Display for RenameOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |p: &PathBuf| {
            p.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default()
        };
        write!(f, "{} -> {}", name(&self.from), name(&self.to))
    }
}

/// 未能產生操作的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    NoMatch,
    Skipped,
    InvalidSelection { index: usize, candidate_count: usize },
    Aborted,
    ChooserFailed { message: String },
    /// 片名清理後不含可用字元
    UnusableTitle,
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatch => write!(f, "no matching title"),
            Self::Skipped => write!(f, "skipped"),
            Self::InvalidSelection {
                index,
                candidate_count,
            } => write!(
                f,
                "invalid selection {index} (expected 0..{})",
                candidate_count.saturating_sub(1)
            ),
            Self::Aborted => write!(f, "aborted"),
            Self::ChooserFailed { message } => write!(f, "choice prompt failed: {message}"),
            Self::UnusableTitle => write!(f, "title has no usable characters"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    pub file_name: String,
    pub reason: UnresolvedReason,
}

#[derive(Debug, Default)]
pub struct RenamePlan {
    pub ops: Vec<RenameOp>,
    pub unresolved: Vec<Unresolved>,
    /// 已經是目標名稱的檔案
    pub unchanged: Vec<String>,
}

/// 單一操作的結果；`error` 為 `None` 表示成功
#[derive(Debug)]
pub struct RenameResult {
    pub op: RenameOp,
    pub error: Option<RenameError>,
}

impl RenameResult {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// 重新命名結果統計
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RenameSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub unresolved: usize,
    pub unchanged: usize,
}

impl RenameSummary {
    #[must_use]
    pub fn new(plan: &RenamePlan, results: &[RenameResult]) -> Self {
        let succeeded = results.iter().filter(|r| r.is_success()).count();
        Self {
            succeeded,
            failed: results.len() - succeeded,
            unresolved: plan.unresolved.len(),
            unchanged: plan.unchanged.len(),
        }
    }
}

/// 產生目標檔名 `<片名> (<年份>)<副檔名>`；年份未知時省略括號
///
/// 片名中的非法字元會被移除，清理後為空時回傳 `None`
#[must_use]
pub fn destination_name(selected: &SelectedMatch, extension: &str) -> Option<String> {
    let title = REGEX_ILLEGAL_CHARS.replace_all(&selected.chosen_title, " ");
    let title = REGEX_MULTIPLE_SPACES.replace_all(&title, " ");
    let title = title.trim().trim_end_matches('.').trim_end();
    if title.is_empty() {
        return None;
    }

    Some(match selected.chosen_year {
        Some(year) => format!("{title} ({year}){extension}"),
        None => format!("{title}{extension}"),
    })
}

/// 依比對結果產生重新命名計畫，`entries` 與 `outcomes` 以位置對應
#[must_use]
pub fn plan(entries: &[FileEntry], outcomes: &[MatchOutcome]) -> RenamePlan {
    debug_assert_eq!(
        entries.len(),
        outcomes.len(),
        "every file entry needs exactly one match outcome"
    );
    let mut result = RenamePlan::default();

    for (entry, outcome) in entries.iter().zip(outcomes) {
        let unresolved = |reason| Unresolved {
            file_name: entry.original_file_name.clone(),
            reason,
        };

        let Some(selected) = outcome.selected_match(entry) else {
            let reason = match outcome {
                MatchOutcome::Skipped => UnresolvedReason::Skipped,
                MatchOutcome::Aborted => UnresolvedReason::Aborted,
                MatchOutcome::ChooserFailed { message } => UnresolvedReason::ChooserFailed {
                    message: message.clone(),
                },
                MatchOutcome::InvalidSelection {
                    index,
                    candidate_count,
                } => UnresolvedReason::InvalidSelection {
                    index: *index,
                    candidate_count: *candidate_count,
                },
                _ => UnresolvedReason::NoMatch,
            };
            result.unresolved.push(unresolved(reason));
            continue;
        };

        let Some(new_name) = destination_name(&selected, &entry.extension) else {
            result
                .unresolved
                .push(unresolved(UnresolvedReason::UnusableTitle));
            continue;
        };

        if new_name == entry.original_file_name {
            result.unchanged.push(new_name);
            continue;
        }

        result.ops.push(RenameOp {
            from: entry.path.clone(),
            to: entry.directory().join(new_name),
        });
    }

    result
}

/// 兩個路徑是否指向同一個檔案（不分大小寫的檔案系統上只差大小寫時成立）
#[cfg(unix)]
fn is_same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(ma), Ok(mb)) => ma.dev() == mb.dev() && ma.ino() == mb.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(ca), Ok(cb)) => ca == cb,
        _ => false,
    }
}

/// 套用單一操作
///
/// 目標已存在且不是來源檔案本身時回報衝突，不會覆蓋
pub fn apply_op(op: &RenameOp) -> RenameResult {
    let error = if op.to.exists() && !is_same_file(&op.from, &op.to) {
        Some(RenameError::DestinationConflict {
            path: op.to.clone(),
        })
    } else {
        fs::rename(&op.from, &op.to).err().map(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => RenameError::DestinationConflict {
                path: op.to.clone(),
            },
            _ => RenameError::MoveFailed {
                from: op.from.clone(),
                to: op.to.clone(),
                source: e,
            },
        })
    };

    match &error {
        None => debug!("Renamed {op}"),
        Some(e) => warn!("Rename failed: {e}"),
    }

    RenameResult {
        op: op.clone(),
        error,
    }
}

/// 依序套用所有操作，任何一筆失敗都不會中斷其餘操作
#[must_use]
pub fn apply(ops: &[RenameOp]) -> Vec<RenameResult> {
    ops.iter().map(apply_op).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::movie_renamer::types::Record;
    use std::path::Path;
    use tempfile::TempDir;

    fn entry_in(dir: &Path, file_name: &str, title: &str) -> FileEntry {
        FileEntry {
            path: dir.join(file_name),
            original_file_name: file_name.to_string(),
            extension: Path::new(file_name)
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default(),
            cleaned_title: title.to_string(),
            year: None,
        }
    }

    fn selected(title: &str, year: Option<u16>) -> SelectedMatch {
        SelectedMatch {
            original_file_name: "x.mkv".to_string(),
            chosen_title: title.to_string(),
            chosen_year: year,
        }
    }

    #[test]
    fn test_destination_name() {
        assert_eq!(
            destination_name(&selected("Heat", Some(1995)), ".mkv").as_deref(),
            Some("Heat (1995).mkv")
        );
        assert_eq!(
            destination_name(&selected("Heat", None), ".MKV").as_deref(),
            Some("Heat.MKV")
        );
    }

    #[test]
    fn test_destination_name_sanitizes() {
        assert_eq!(
            destination_name(&selected("Mission: Impossible", Some(1996)), ".mkv").as_deref(),
            Some("Mission Impossible (1996).mkv")
        );
        assert_eq!(
            destination_name(&selected("AC/DC Live", Some(1992)), ".mp4").as_deref(),
            Some("AC DC Live (1992).mp4")
        );
        assert_eq!(destination_name(&selected("???", Some(2000)), ".mkv"), None);
    }

    #[test]
    fn test_plan_reports_unresolved_and_unchanged() {
        let dir = Path::new("/movies");
        let entries = [
            entry_in(dir, "Heat.1995.720p.mkv", "Heat"),
            entry_in(dir, "Unknown.Movie.Xyz.mkv", "Unknown Movie Xyz"),
            entry_in(dir, "Alien (1979).mkv", "Alien"),
            entry_in(dir, "Crash.mkv", "Crash"),
        ];
        let outcomes = [
            MatchOutcome::YearMatched(Record::new("Heat", Some(1995))),
            MatchOutcome::NoMatch,
            MatchOutcome::Unique(Record::new("Alien", Some(1979))),
            MatchOutcome::InvalidSelection {
                index: 5,
                candidate_count: 2,
            },
        ];

        let plan = plan(&entries, &outcomes);
        assert_eq!(
            plan.ops,
            vec![RenameOp {
                from: dir.join("Heat.1995.720p.mkv"),
                to: dir.join("Heat (1995).mkv"),
            }]
        );
        assert_eq!(plan.unchanged, vec!["Alien (1979).mkv"]);
        assert_eq!(
            plan.unresolved,
            vec![
                Unresolved {
                    file_name: "Unknown.Movie.Xyz.mkv".to_string(),
                    reason: UnresolvedReason::NoMatch,
                },
                Unresolved {
                    file_name: "Crash.mkv".to_string(),
                    reason: UnresolvedReason::InvalidSelection {
                        index: 5,
                        candidate_count: 2
                    },
                },
            ]
        );
    }

    #[test]
    fn test_plan_maps_aborted_and_chooser_failure() {
        let dir = Path::new("/movies");
        let entries = [
            entry_in(dir, "Heat.1995.mkv", "Heat"),
            entry_in(dir, "Alien.mkv", "Alien"),
        ];
        let outcomes = [
            MatchOutcome::ChooserFailed {
                message: "terminal read failed".to_string(),
            },
            MatchOutcome::Aborted,
        ];

        let plan = plan(&entries, &outcomes);
        assert!(plan.ops.is_empty());
        assert_eq!(
            plan.unresolved
                .iter()
                .map(|u| u.reason.to_string())
                .collect::<Vec<_>>(),
            vec!["choice prompt failed: terminal read failed", "aborted"]
        );
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "every file entry needs exactly one match outcome")]
    fn test_plan_rejects_mismatched_lengths() {
        let dir = Path::new("/movies");
        let entries = [
            entry_in(dir, "Heat.1995.mkv", "Heat"),
            entry_in(dir, "Alien.1979.mkv", "Alien"),
        ];
        let outcomes = [MatchOutcome::NoMatch];
        let _ = plan(&entries, &outcomes);
    }

    #[test]
    fn test_apply_renames_file() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("Heat.1995.720p.mkv");
        fs::write(&from, "video").unwrap();
        let to = temp_dir.path().join("Heat (1995).mkv");

        let results = apply(&[RenameOp {
            from: from.clone(),
            to: to.clone(),
        }]);

        assert!(results[0].is_success());
        assert!(!from.exists());
        assert_eq!(fs::read_to_string(&to).unwrap(), "video");
    }

    #[test]
    fn test_apply_conflict_does_not_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("a.mkv");
        let to = temp_dir.path().join("Heat (1995).mkv");
        fs::write(&from, "new").unwrap();
        fs::write(&to, "existing").unwrap();

        let results = apply(&[RenameOp {
            from: from.clone(),
            to: to.clone(),
        }]);

        assert!(matches!(
            results[0].error,
            Some(RenameError::DestinationConflict { .. })
        ));
        assert!(from.exists());
        assert_eq!(fs::read_to_string(&to).unwrap(), "existing");
    }

    #[test]
    fn test_apply_onto_same_file_is_not_a_conflict() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("heat (1995).mkv");
        fs::write(&path, "video").unwrap();

        let results = apply(&[RenameOp {
            from: path.clone(),
            to: path.clone(),
        }]);

        assert!(results[0].is_success());
        assert_eq!(fs::read_to_string(&path).unwrap(), "video");
    }

    #[test]
    fn test_is_same_file() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.mkv");
        let b = temp_dir.path().join("b.mkv");
        fs::write(&a, "a").unwrap();
        fs::write(&b, "b").unwrap();

        assert!(is_same_file(&a, &a));
        assert!(!is_same_file(&a, &b));
        assert!(!is_same_file(&a, &temp_dir.path().join("missing.mkv")));
    }

    #[cfg(unix)]
    #[test]
    fn test_hard_link_counts_as_same_file() {
        let temp_dir = TempDir::new().unwrap();
        let original = temp_dir.path().join("Heat.1995.mkv");
        let linked = temp_dir.path().join("HEAT.1995.mkv");
        fs::write(&original, "video").unwrap();
        fs::hard_link(&original, &linked).unwrap();

        assert!(is_same_file(&original, &linked));
        let results = apply(&[RenameOp {
            from: linked.clone(),
            to: original.clone(),
        }]);
        assert!(results[0].is_success());
        assert_eq!(fs::read_to_string(&original).unwrap(), "video");
    }

    #[test]
    fn test_apply_continues_after_failure() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::write(dir.join("one.mkv"), "1").unwrap();
        fs::write(dir.join("three.mkv"), "3").unwrap();

        let ops = [
            RenameOp {
                from: dir.join("one.mkv"),
                to: dir.join("One (2001).mkv"),
            },
            RenameOp {
                from: dir.join("vanished.mkv"),
                to: dir.join("Two (2002).mkv"),
            },
            RenameOp {
                from: dir.join("three.mkv"),
                to: dir.join("Three (2003).mkv"),
            },
        ];
        let results = apply(&ops);

        assert_eq!(results.len(), 3);
        assert!(results[0].is_success());
        assert!(matches!(
            results[1].error,
            Some(RenameError::MoveFailed { .. })
        ));
        assert!(results[2].is_success());
        assert!(dir.join("One (2001).mkv").exists());
        assert!(dir.join("Three (2003).mkv").exists());
    }

    #[test]
    fn test_duplicate_destination_in_batch() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::write(dir.join("Heat.1995.mkv"), "a").unwrap();
        fs::write(dir.join("Heat.1995.REPACK.mkv"), "b").unwrap();

        let target = dir.join("Heat (1995).mkv");
        let ops = [
            RenameOp {
                from: dir.join("Heat.1995.mkv"),
                to: target.clone(),
            },
            RenameOp {
                from: dir.join("Heat.1995.REPACK.mkv"),
                to: target.clone(),
            },
        ];
        let results = apply(&ops);
        let plan = RenamePlan {
            ops: ops.to_vec(),
            ..RenamePlan::default()
        };

        assert!(results[0].is_success());
        assert!(matches!(
            results[1].error,
            Some(RenameError::DestinationConflict { .. })
        ));
        assert_eq!(fs::read_to_string(&target).unwrap(), "a");
        assert_eq!(
            RenameSummary::new(&plan, &results),
            RenameSummary {
                succeeded: 1,
                failed: 1,
                unresolved: 0,
                unchanged: 0,
            }
        );
    }
}
