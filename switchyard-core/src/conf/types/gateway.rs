use crate::conf::eval::EvalContext;
use crate::conf::types::{BackendBlock, BasicAuthConfig, JwtConfig, ServerConfig, Settings};
use std::path::PathBuf;

/// The parsed configuration document.
#[derive(Debug, Default)]
pub struct GatewayConfig {
    pub file: PathBuf,
    pub servers: Vec<ServerConfig>,
    pub definitions: Option<Definitions>,
    pub settings: Settings,
    /// Variables available to expressions while the document is compiled.
    pub context: EvalContext,
}

/// Named, reusable backends and access controls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Definitions {
    pub backends: Vec<BackendBlock>,
    pub jwt: Vec<JwtConfig>,
    pub basic_auth: Vec<BasicAuthConfig>,
}
