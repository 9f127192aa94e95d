use crate::conf::types::{AccessControlRefs, Origin};
use hcl::Body;
use std::path::PathBuf;

/// One virtual server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerConfig {
    pub origin: Origin,
    pub name: String,
    pub base_path: String,
    /// `host[:port]` patterns; empty means the implicit wildcard binding.
    pub hosts: Vec<String>,
    pub access_control: AccessControlRefs,
    pub api: Option<ApiConfig>,
    pub files: Option<FilesConfig>,
    pub spa: Option<SpaConfig>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiConfig {
    pub origin: Origin,
    pub base_path: String,
    /// `backend = "name"` reference.
    pub backend: Option<String>,
    /// Remaining content, including an inline `backend` block if any.
    pub inline: Body,
    pub cors: Option<CorsConfig>,
    pub access_control: AccessControlRefs,
    pub endpoints: Vec<EndpointConfig>,
}

/// An `endpoint` block. The owning server is passed alongside during
/// resolution; there is no back pointer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndpointConfig {
    pub origin: Origin,
    pub pattern: String,
    pub backend: Option<String>,
    pub inline: Body,
    pub access_control: AccessControlRefs,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorsConfig {
    pub origin: Origin,
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
    pub max_age: Option<String>,
    pub disable: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilesConfig {
    pub origin: Origin,
    pub base_path: String,
    pub document_root: PathBuf,
    pub access_control: AccessControlRefs,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpaConfig {
    pub origin: Origin,
    pub base_path: String,
    pub bootstrap_file: PathBuf,
    pub paths: Vec<String>,
    pub access_control: AccessControlRefs,
}
