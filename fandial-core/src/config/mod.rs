//! Dial configuration
//!
//! Configuration is loaded from a small TOML file by the board support
//! code. Everything has a default so an empty file is valid.

mod parse;
mod types;

pub use parse::{parse_config, ParseError};
pub use types::*;
