use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 建立片名索引時的錯誤，發生時整個比對流程中止
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset unavailable at {path}: {source}")]
    DataUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("dataset at {path} contains no usable records")]
    Empty { path: PathBuf },
}

/// 單一檔案套用重新命名時的錯誤，不影響其餘檔案
#[derive(Debug, Error)]
pub enum RenameError {
    #[error("destination already exists: {path}")]
    DestinationConflict { path: PathBuf },
    #[error("failed to move {from} -> {to}: {source}")]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}
