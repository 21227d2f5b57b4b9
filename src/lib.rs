pub mod config;
pub mod elements;
pub mod factory;
pub mod parser;
pub mod runner;
pub mod source;

pub use config::Config;
pub use elements::{Attribute, Document, Element, ElementKind, NodeId};
pub use factory::ElementFactory;
pub use parser::{ElementError, Result};
pub use runner::{convert_file, run_check, run_format, OutputFormat, RunOutput, RunnerOptions, Target};
pub use source::{SourceAttribute, SourceNode};
