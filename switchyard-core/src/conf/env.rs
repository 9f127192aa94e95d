use crate::conf::error::ConfigError;
use crate::conf::types::Settings;

pub const ENV_PORT: &str = "SWITCHYARD_PORT";
pub const ENV_XFH: &str = "SWITCHYARD_XFH";

/// Listener level options outside of the configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpConfig {
    pub listen_port: u16,
    pub use_xfh: bool,
}

impl HttpConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            listen_port: settings.default_port,
            use_xfh: settings.xfh,
        }
    }

    /// Applies a port given on the command line.
    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.listen_port = port;
        }
        self
    }

    /// Applies the `SWITCHYARD_*` variables found through `lookup`. Values
    /// from the environment take precedence over the command line.
    pub fn update_by_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Set but empty counts as unset.
        if let Some(value) = lookup(ENV_PORT).filter(|v| !v.trim().is_empty()) {
            self.listen_port = value
                .trim()
                .parse::<u16>()
                .ok()
                .filter(|port| *port > 0)
                .ok_or_else(|| ConfigError::InvalidEnv {
                    var: ENV_PORT.to_string(),
                    value: value.clone(),
                })?;
        }

        // Anything but a boolean leaves the flag untouched.
        if let Some(xfh) = lookup(ENV_XFH).and_then(|v| v.trim().parse::<bool>().ok()) {
            self.use_xfh = xfh;
        }

        Ok(self)
    }

    pub fn update_by_process_env(self) -> Result<Self, ConfigError> {
        self.update_by_env(|name| std::env::var(name).ok())
    }
}
