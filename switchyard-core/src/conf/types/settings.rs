use crate::conf::types::{BackendConfig, Origin};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CONNECT_TIMEOUT: &str = "10s";
pub const DEFAULT_TIMEOUT: &str = "300s";
pub const DEFAULT_TTFB_TIMEOUT: &str = "60s";
pub const DEFAULT_REQUEST_BODY_LIMIT: &str = "64MiB";

/// The `settings` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub origin: Origin,
    pub default_port: u16,

    /// Honor the `X-Forwarded-Host` request header.
    pub xfh: bool,

    // Values of the system wide default backend layer.
    pub connect_timeout: String,
    pub timeout: String,
    pub ttfb_timeout: String,
    pub request_body_limit: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            origin: Origin::default(),
            default_port: DEFAULT_PORT,
            xfh: false,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT.to_string(),
            timeout: DEFAULT_TIMEOUT.to_string(),
            ttfb_timeout: DEFAULT_TTFB_TIMEOUT.to_string(),
            request_body_limit: DEFAULT_REQUEST_BODY_LIMIT.to_string(),
        }
    }
}

impl Settings {
    /// The backend layer merged underneath every configured backend.
    pub fn default_backend(&self) -> BackendConfig {
        BackendConfig {
            connect_timeout: self.connect_timeout.clone(),
            timeout: self.timeout.clone(),
            ttfb_timeout: self.ttfb_timeout.clone(),
            request_body_limit: self.request_body_limit.clone(),
            ..Default::default()
        }
    }
}
