pub mod load;
pub mod save;
pub mod types;

pub use types::{
    Config, FileTypeTable, Language, MAX_RECENT_PATHS, UserSettings, YearPolicy, YearRange,
};
