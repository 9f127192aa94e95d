use crate::conf::types::{BackendConfig, Definitions, Origin, Settings, is_keyword};
use crate::conf::{ConfigError, EvalContext};
use crate::handler::{CorsOptions, ProxyOptions};
use hcl::{Block, Body};
use std::collections::BTreeMap;
use url::Url;

/// A definitions backend: its resolved layer and its proxy options.
#[derive(Debug, Clone)]
pub struct BackendDefinition {
    pub conf: BackendConfig,
    pub proxy: ProxyOptions,
    /// Where the `backend` block was declared.
    pub origin: Origin,
}

/// Definitions backends by name.
#[derive(Debug, Clone, Default)]
pub struct Backends {
    entries: BTreeMap<String, BackendDefinition>,
}

impl Backends {
    pub fn get(&self, name: &str) -> Option<&BackendDefinition> {
        self.entries.get(name)
    }

    /// Like `get`, but an unknown name is an error.
    pub fn lookup(&self, name: &str) -> Result<&BackendDefinition, ConfigError> {
        self.get(name).ok_or_else(|| ConfigError::BackendNotDefined {
            name: name.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds the named backends of the definitions block. Each one has the
/// system default layer merged underneath and must declare a valid origin.
pub fn new_backends_from_definitions(
    definitions: Option<&Definitions>,
    settings: &Settings,
    ctx: &EvalContext,
) -> Result<Backends, ConfigError> {
    let mut backends = Backends::default();

    let Some(definitions) = definitions else {
        return Ok(backends);
    };

    let defaults = settings.default_backend();

    for block in &definitions.backends {
        if backends.entries.contains_key(&block.name) {
            return Err(ConfigError::DuplicateBackend {
                name: block.name.clone(),
            });
        }
        if is_keyword(&block.name) {
            return Err(ConfigError::ReservedBackendName {
                name: block.name.clone(),
            });
        }

        let conf = BackendConfig::decode(&block.name, &block.body, ctx, &block.origin)?;
        if conf.origin.is_empty() {
            return Err(ConfigError::MissingOrigin {
                name: block.name.clone(),
                origin: block.origin.clone(),
            });
        }
        validate_origin(&conf.origin, &block.origin)?;

        let (conf, bodies) = defaults.merge(&conf);
        let proxy = ProxyOptions::new(&conf, CorsOptions::default(), bodies)?;

        tracing::debug!(
            backend = %conf.name,
            origin = %conf.origin,
            "backend defined"
        );

        backends.entries.insert(
            conf.name.clone(),
            BackendDefinition {
                conf,
                proxy,
                origin: block.origin.clone(),
            },
        );
    }

    Ok(backends)
}

/// An origin has to be an absolute http(s) URL with a host.
pub fn validate_origin(value: &str, origin: &Origin) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidOrigin {
        value: value.to_string(),
        reason,
        origin: origin.clone(),
    };

    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }

    Ok(())
}

/// Checks the structure of an inline definition: at most one `backend`
/// block carrying at most one label.
pub fn validate_inline_scheme(inline: &Body, origin: &Origin) -> Result<(), ConfigError> {
    let blocks = backend_blocks(inline);

    let invalid = |reason: &str| ConfigError::InvalidScheme {
        origin: origin.clone(),
        reason: reason.to_string(),
    };

    if blocks.len() > 1 {
        return Err(invalid("only one backend block is allowed"));
    }
    if blocks.first().is_some_and(|block| block.labels().len() > 1) {
        return Err(invalid("a backend block accepts at most one label"));
    }

    Ok(())
}

/// Builds the backend declared by an inline `backend` block. Returns `None`
/// if there is no such block.
///
/// Layers from least to most specific: system defaults, the definitions
/// backend named by the block label, the inline block.
pub fn new_inline_backend(
    inline: &Body,
    backends: &Backends,
    defaults: &BackendConfig,
    cors: &CorsOptions,
    ctx: &EvalContext,
    origin: &Origin,
) -> Result<Option<ProxyOptions>, ConfigError> {
    let Some(block) = backend_blocks(inline).into_iter().next() else {
        return Ok(None);
    };
    validate_inline_scheme(inline, origin)?;

    let label = block.labels().first().map(|l| l.as_str()).unwrap_or_default();
    let conf = BackendConfig::decode(label, block.body(), ctx, origin)?;

    let (conf, bodies) = if label.is_empty() {
        defaults.merge(&conf)
    } else {
        let named = backends
            .get(label)
            .ok_or_else(|| ConfigError::OverrideBackendNotDefined {
                name: label.to_string(),
            })?;
        named.conf.merge(&conf)
    };

    ProxyOptions::new(&conf, cors.clone(), bodies).map(Some)
}

fn backend_blocks(body: &Body) -> Vec<&Block> {
    body.blocks()
        .filter(|block| block.identifier() == "backend")
        .collect()
}
