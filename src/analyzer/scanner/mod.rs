pub mod file_scanner;

pub use file_scanner::{WorkspaceScanner, is_excluded_path};
