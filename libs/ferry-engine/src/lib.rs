pub mod config;
pub mod dispatch;
pub mod error;
mod mapping;
mod parse;
pub mod resolve;
mod scalar;
mod sequence;

pub use config::ConvertConfig;
pub use dispatch::{Converter, convert};
pub use error::{ConfigError, ConvertError, ParseFailure};
pub use resolve::{Resolved, resolve_kind};
