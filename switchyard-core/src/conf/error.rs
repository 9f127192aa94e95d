use crate::conf::types::Origin;
use crate::conf::units::ParseUnitError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    //-------------------------------------------------------------------------
    // IO
    //-------------------------------------------------------------------------
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read key file {path} of jwt '{name}': {source}")]
    ReadKeyFile {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read htpasswd file {path} of basic_auth '{name}': {source}")]
    ReadCredentialsFile {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to determine working directory: {source}")]
    WorkingDir {
        #[source]
        source: std::io::Error,
    },

    //-------------------------------------------------------------------------
    // Parsing
    //-------------------------------------------------------------------------
    #[error("invalid configuration file: {path}\n\n{source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: hcl::Error,
    },

    #[error("{origin}: {message}")]
    Decode { origin: Origin, message: String },

    #[error("invalid value '{value}' for environment variable {var}")]
    InvalidEnv { var: String, value: String },

    //-------------------------------------------------------------------------
    // Identity conflicts
    //-------------------------------------------------------------------------
    #[error("backend name must be unique: '{name}'")]
    DuplicateBackend { name: String },

    #[error("backend name not allowed, reserved keyword: '{name}'")]
    ReservedBackendName { name: String },

    #[error("access control: {kind} name must be unique: '{name}'")]
    DuplicateAccessControl { kind: &'static str, name: String },

    #[error("access control: {kind} label required ({origin})")]
    MissingAccessControlLabel { kind: &'static str, origin: Origin },

    #[error("duplicate endpoint: '{pattern}'")]
    DuplicateEndpoint { pattern: String },

    #[error("conflict: host '{host}' on port {port} is already bound by another server ({origin})")]
    DuplicateHostPort {
        host: String,
        port: u16,
        origin: Origin,
    },

    #[error("duplicate route found on port {port}: '{path}'")]
    DuplicateRoute { port: u16, path: String },

    //-------------------------------------------------------------------------
    // Unresolved references
    //-------------------------------------------------------------------------
    #[error("backend '{name}' is not defined")]
    BackendNotDefined { name: String },

    #[error("override backend '{name}' is not defined")]
    OverrideBackendNotDefined { name: String },

    #[error("access control '{name}' not found")]
    AccessControlNotFound { name: String },

    //-------------------------------------------------------------------------
    // Malformed values
    //-------------------------------------------------------------------------
    #[error("backend '{backend}': invalid {field} '{value}': {source}")]
    InvalidDuration {
        backend: String,
        field: &'static str,
        value: String,
        #[source]
        source: ParseUnitError,
    },

    #[error("backend '{backend}': invalid request_body_limit '{value}': {source}")]
    InvalidSize {
        backend: String,
        value: String,
        #[source]
        source: ParseUnitError,
    },

    #[error("invalid cors max_age '{value}': {source}")]
    InvalidCorsMaxAge {
        value: String,
        #[source]
        source: ParseUnitError,
    },

    #[error("{origin}: invalid backend origin '{value}': {reason}")]
    InvalidOrigin {
        value: String,
        reason: String,
        origin: Origin,
    },

    #[error("invalid port given: '{port}' ({host})")]
    InvalidPort { host: String, port: String },

    #[error("invalid host '{host}': {reason}")]
    InvalidHost { host: String, reason: String },

    #[error("jwt '{name}': malformed claims: {reason}")]
    MalformedClaims { name: String, reason: String },

    #[error("loading jwt '{name}' definition failed: {reason}")]
    InvalidJwt { name: String, reason: String },

    #[error("loading basic_auth '{name}' definition failed: {reason}")]
    InvalidBasicAuth { name: String, reason: String },

    #[error("{origin}: {reason}")]
    InvalidScheme { origin: Origin, reason: String },

    //-------------------------------------------------------------------------
    // Structural absence
    //-------------------------------------------------------------------------
    #[error("missing server definitions")]
    MissingServer,

    #[error("hosts are mandatory for multiple servers ({origin})")]
    HostsMandatory { origin: Origin },

    #[error("no backend attribute reference or block for endpoint '{pattern}'")]
    MissingBackend { pattern: String },

    #[error("inline backend requires an origin attribute: '{pattern}' ({origin})")]
    RequiresOrigin { pattern: String, origin: Origin },

    #[error("{origin}: missing origin for backend '{name}'")]
    MissingOrigin { name: String, origin: Origin },

    #[error("{origin}: document root is not a directory: {path}")]
    InvalidDocumentRoot { path: PathBuf, origin: Origin },

    #[error("{origin}: spa bootstrap file is not a file: {path}")]
    InvalidBootstrapFile { path: PathBuf, origin: Origin },
}

impl ConfigError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: hcl::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    pub fn decode(origin: &Origin, message: impl Into<String>) -> Self {
        Self::Decode {
            origin: origin.clone(),
            message: message.into(),
        }
    }
}
