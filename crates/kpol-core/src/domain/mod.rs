pub mod errors;

pub use errors::{Categorized, ErrorCategory, KpolError, KpolResult, classify};
