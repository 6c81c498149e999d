// ABOUTME: Variable module for layered template variables
// ABOUTME: Exports variable file loading, format detection, and precedence merging

pub mod error;
pub mod loader;
pub mod set;

pub use error::{LoadError, Result};
pub use loader::{detect_format, load_file, load_files, VariableFormat, VariableSource};
pub use set::{merge, VariableSet};
