//! Configuration module for Pocketbook
//!
//! - Data directory resolution
//! - User settings stored in the document's `config` object

pub mod paths;
pub mod settings;

pub use paths::PocketbookPaths;
pub use settings::Settings;
