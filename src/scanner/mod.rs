pub mod file_scanner;
pub mod metadata;

pub use file_scanner::FileScanner;
