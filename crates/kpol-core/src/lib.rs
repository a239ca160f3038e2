pub mod amplitude;
pub mod common;
pub mod dispersion;
pub mod domain;
pub mod numerics;
pub mod pipeline;

pub use domain::{ErrorCategory, KpolError, KpolResult};
pub use pipeline::DispersionPipeline;
