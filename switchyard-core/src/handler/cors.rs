use crate::conf::ConfigError;
use crate::conf::types::CorsConfig;
use crate::conf::units::parse_duration;
use std::time::Duration;

const WILDCARD: &str = "*";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorsOptions {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
    pub max_age: Option<Duration>,
    pub disable: bool,
}

impl CorsOptions {
    /// Options of an API `cors` block. No block yields empty options.
    pub fn new(conf: Option<&CorsConfig>) -> Result<Self, ConfigError> {
        let Some(conf) = conf else {
            return Ok(Self::default());
        };

        let max_age = conf
            .max_age
            .as_deref()
            .map(|value| {
                parse_duration(value).map_err(|source| ConfigError::InvalidCorsMaxAge {
                    value: value.to_string(),
                    source,
                })
            })
            .transpose()?;

        Ok(Self {
            allowed_origins: conf.allowed_origins.clone(),
            allow_credentials: conf.allow_credentials,
            max_age,
            disable: conf.disable,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.allowed_origins.is_empty()
    }

    pub fn allows_origin(&self, origin: &str) -> bool {
        if self.disable {
            return false;
        }

        self.allowed_origins
            .iter()
            .any(|allowed| allowed == WILDCARD || allowed.eq_ignore_ascii_case(origin))
    }
}
