pub mod config;
pub mod error;
pub mod fetch;
pub mod grading;
pub mod identity;
pub mod infra;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod services;

pub use error::ActaError;
pub use pipeline::{ActaReport, run_acta};
