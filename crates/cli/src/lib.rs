pub mod cli;
pub mod commands;
mod error;
pub mod terminal;

pub use error::Error;
