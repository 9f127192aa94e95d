use crate::conf::decode;
use crate::conf::error::ConfigError;
use crate::conf::eval::EvalContext;
use crate::conf::types::Origin;
use hcl::{Body, Structure};

/// Reserved handler kind keywords. Backend names must not shadow them.
pub const RESERVED_KEYWORDS: &[&str] = &["proxy"];

pub fn is_keyword(name: &str) -> bool {
    RESERVED_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(name))
}

/// A `backend` block as written in the document, decoded later against the
/// startup evaluation context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendBlock {
    pub origin: Origin,
    pub name: String,
    pub body: Body,
}

/// One layer of backend configuration.
///
/// Scalar values are kept in their textual form until `ProxyOptions` are
/// built, so an empty string always means "not set by this layer".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendConfig {
    pub name: String,
    pub origin: String,
    pub hostname: String,
    pub path: String,
    pub connect_timeout: String,
    pub timeout: String,
    pub ttfb_timeout: String,
    pub request_body_limit: String,
    pub openapi_file: String,
    pub validate_request: bool,
    pub validate_response: bool,

    /// Attributes and blocks this layer does not understand.
    pub remain: Option<Body>,
}

impl BackendConfig {
    /// Applies `other` on top of `self` and returns the resulting layer.
    ///
    /// Empty values of `other` never clear a value of `self`. The remaining
    /// bodies of both layers are returned base first; the remaining body of
    /// `other` becomes the remaining body of the result.
    pub fn merge(&self, other: &BackendConfig) -> (BackendConfig, Vec<Body>) {
        let mut result = self.clone();
        let mut bodies = Vec::new();

        override_string(&mut result.name, &other.name);
        override_string(&mut result.origin, &other.origin);
        override_string(&mut result.hostname, &other.hostname);
        override_string(&mut result.path, &other.path);
        override_string(&mut result.connect_timeout, &other.connect_timeout);
        override_string(&mut result.timeout, &other.timeout);
        override_string(&mut result.ttfb_timeout, &other.ttfb_timeout);
        override_string(&mut result.request_body_limit, &other.request_body_limit);
        override_string(&mut result.openapi_file, &other.openapi_file);

        result.validate_request |= other.validate_request;
        result.validate_response |= other.validate_response;

        if let Some(body) = &result.remain {
            bodies.push(body.clone());
        }

        if let Some(body) = &other.remain {
            bodies.push(body.clone());
            result.remain = Some(body.clone());
        }

        (result, bodies)
    }

    /// Decodes the known attributes of a backend block. The remaining body
    /// keeps every attribute, known ones included, so expressions can be
    /// evaluated again per request.
    pub fn decode(
        name: &str,
        body: &Body,
        ctx: &EvalContext,
        origin: &Origin,
    ) -> Result<BackendConfig, ConfigError> {
        let mut conf = BackendConfig {
            name: name.to_string(),
            ..Default::default()
        };
        let mut remain = Vec::new();

        for structure in body.iter() {
            remain.push(structure.clone());
            let Structure::Attribute(attr) = structure else {
                continue;
            };

            match attr.key() {
                "origin" => conf.origin = ctx.attribute_string(attr.expr()),
                "hostname" => conf.hostname = ctx.attribute_string(attr.expr()),
                "path" => conf.path = ctx.attribute_string(attr.expr()),
                "connect_timeout" => conf.connect_timeout = ctx.attribute_string(attr.expr()),
                "timeout" => conf.timeout = ctx.attribute_string(attr.expr()),
                "ttfb_timeout" => conf.ttfb_timeout = ctx.attribute_string(attr.expr()),
                "request_body_limit" => {
                    conf.request_body_limit = ctx.attribute_string(attr.expr())
                }
                "openapi_file" => conf.openapi_file = ctx.attribute_string(attr.expr()),
                "validate_request" => conf.validate_request = decode::bool(ctx, attr, origin)?,
                "validate_response" => {
                    conf.validate_response = decode::bool(ctx, attr, origin)?
                }
                _ => {}
            }
        }

        conf.remain = Some(remain.into_iter().collect());
        Ok(conf)
    }
}

/// Merges two optional layers. Absent on either side yields no result.
pub fn merge_layers(
    base: Option<&BackendConfig>,
    other: Option<&BackendConfig>,
) -> Option<(BackendConfig, Vec<Body>)> {
    base.zip(other).map(|(base, other)| base.merge(other))
}

fn override_string(target: &mut String, value: &str) {
    if !value.is_empty() {
        *target = value.to_string();
    }
}
