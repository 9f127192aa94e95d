use crate::conf::ConfigError;
use crate::conf::EvalContext;
use crate::conf::types::BackendConfig;
use crate::conf::units::{parse_duration, parse_size};
use crate::handler::CorsOptions;
use hcl::Body;
use std::time::Duration;

/// Everything the proxying side needs to forward requests to one backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProxyOptions {
    pub backend_name: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub ttfb_timeout: Duration,
    pub request_body_limit: u64,
    pub origin: String,
    pub hostname: String,
    pub path: String,
    pub openapi_file: String,
    pub validate_request: bool,
    pub validate_response: bool,
    pub cors: CorsOptions,
    /// Remaining bodies, least specific first. Evaluated per request.
    pub context: Vec<Body>,
}

impl ProxyOptions {
    pub fn new(
        conf: &BackendConfig,
        cors: CorsOptions,
        context: Vec<Body>,
    ) -> Result<Self, ConfigError> {
        let duration = |field: &'static str, value: &str| {
            parse_duration(value).map_err(|source| ConfigError::InvalidDuration {
                backend: conf.name.clone(),
                field,
                value: value.to_string(),
                source,
            })
        };

        let request_body_limit =
            parse_size(&conf.request_body_limit).map_err(|source| ConfigError::InvalidSize {
                backend: conf.name.clone(),
                value: conf.request_body_limit.clone(),
                source,
            })?;

        Ok(Self {
            backend_name: conf.name.clone(),
            connect_timeout: duration("connect_timeout", &conf.connect_timeout)?,
            timeout: duration("timeout", &conf.timeout)?,
            ttfb_timeout: duration("ttfb_timeout", &conf.ttfb_timeout)?,
            request_body_limit,
            origin: conf.origin.clone(),
            hostname: conf.hostname.clone(),
            path: conf.path.clone(),
            openapi_file: conf.openapi_file.clone(),
            validate_request: conf.validate_request,
            validate_response: conf.validate_response,
            cors,
            context,
        })
    }

    /// Overlays the set values of `other`. Context bodies are appended and
    /// non-empty CORS options replace the current ones.
    pub fn merge(mut self, other: &ProxyOptions) -> Self {
        if !other.connect_timeout.is_zero() {
            self.connect_timeout = other.connect_timeout;
        }
        if !other.timeout.is_zero() {
            self.timeout = other.timeout;
        }
        if !other.ttfb_timeout.is_zero() {
            self.ttfb_timeout = other.ttfb_timeout;
        }
        if other.request_body_limit > 0 {
            self.request_body_limit = other.request_body_limit;
        }

        for (target, value) in [
            (&mut self.origin, &other.origin),
            (&mut self.hostname, &other.hostname),
            (&mut self.path, &other.path),
            (&mut self.openapi_file, &other.openapi_file),
        ] {
            if !value.is_empty() {
                target.clone_from(value);
            }
        }

        self.validate_request |= other.validate_request;
        self.validate_response |= other.validate_response;

        if !other.cors.is_empty() {
            self.cors = other.cors.clone();
        }

        self.context.extend(other.context.iter().cloned());
        self
    }

    /// Evaluates attribute `name` of the most specific context body
    /// declaring it.
    pub fn dynamic_attribute(&self, name: &str, ctx: &EvalContext) -> Option<String> {
        self.context
            .iter()
            .rev()
            .find_map(|body| ctx.body_attribute(body, name))
    }
}
