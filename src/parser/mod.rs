pub mod balance;
pub mod errors;
pub mod fragments;
pub mod lexer;

pub use errors::{ElementError, Result};
