pub mod executor;
mod files;
pub mod reporter;

pub use executor::{convert_file, run_check, run_format, RunnerOptions, Target};
pub use files::resolve_patterns;
pub use reporter::{OutputFormat, RunOutput};
