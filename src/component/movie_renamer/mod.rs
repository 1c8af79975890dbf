//! 電影檔名比對重新命名元件
//!
//! 將 release 風格的檔名比對到電影資料集，並重新命名為 `Title (Year)`

pub mod dataset_reader;
pub mod error;
pub mod filename_normalizer;
mod main;
pub mod match_resolver;
pub mod rename_planner;
pub mod title_index;
pub mod types;

pub use dataset_reader::load_records;
pub use error::{DatasetError, RenameError};
pub use filename_normalizer::{FilenameNormalizer, NormalizedName, title_key};
pub use main::{ConsoleChooser, MovieRenamer, load_title_index, scan_entries};
pub use match_resolver::{Choice, ChoiceProvider, MatchOutcome, MatchResolver};
pub use rename_planner::{
    RenameOp, RenamePlan, RenameResult, RenameSummary, Unresolved, UnresolvedReason, apply,
    apply_op, destination_name, plan,
};
pub use title_index::TitleIndex;
pub use types::{FileEntry, Record, SelectedMatch};
