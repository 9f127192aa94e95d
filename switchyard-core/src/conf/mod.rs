mod decode;
pub mod env;
mod error;
pub mod eval;
mod loader;
mod parse;
#[cfg(test)]
mod tests;
pub mod types;
pub mod units;

pub use env::HttpConfig;
pub use error::ConfigError;
pub use eval::EvalContext;
pub use loader::{load_config, load_config_str};
pub use types::GatewayConfig;
