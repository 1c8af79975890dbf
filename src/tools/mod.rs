mod media_scanner;
mod path_validator;

pub use media_scanner::scan_media_files;
pub use path_validator::{validate_directory_exists, validate_extension};
