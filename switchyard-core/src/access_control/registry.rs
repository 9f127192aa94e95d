use crate::access_control::{AccessControl, BasicAuth, Jwt, Source};
use crate::conf::types::{BasicAuthConfig, Definitions, JwtConfig, Origin};
use crate::conf::{ConfigError, EvalContext};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Access controls by name. Read only once built.
#[derive(Debug, Clone, Default)]
pub struct AccessControlMap {
    entries: BTreeMap<String, Arc<AccessControl>>,
}

impl AccessControlMap {
    pub fn get(&self, name: &str) -> Result<Arc<AccessControl>, ConfigError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::AccessControlNotFound {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn register(&mut self, kind: &'static str, control: AccessControl) {
        tracing::debug!(kind, name = control.name(), "access control registered");
        self.entries
            .insert(control.name().to_string(), Arc::new(control));
    }

    fn validate_name(
        &self,
        kind: &'static str,
        name: &str,
        origin: &Origin,
    ) -> Result<(), ConfigError> {
        if name.is_empty() {
            return Err(ConfigError::MissingAccessControlLabel {
                kind,
                origin: origin.clone(),
            });
        }
        if self.contains(name) {
            return Err(ConfigError::DuplicateAccessControl {
                kind,
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

/// Builds every access control of the definitions. Basic auth entries are
/// registered before jwt entries. Files are read relative to `cwd`.
pub fn configure_access_controls(
    definitions: Option<&Definitions>,
    ctx: &EvalContext,
    cwd: &Path,
) -> Result<AccessControlMap, ConfigError> {
    let mut map = AccessControlMap::default();

    let Some(definitions) = definitions else {
        return Ok(map);
    };

    for conf in &definitions.basic_auth {
        map.validate_name("basic_auth", &conf.name, &conf.origin)?;
        let basic_auth = new_basic_auth(conf, cwd)?;
        map.register("basic_auth", AccessControl::BasicAuth(basic_auth));
    }

    for conf in &definitions.jwt {
        map.validate_name("jwt", &conf.name, &conf.origin)?;
        let jwt = new_jwt(conf, ctx, cwd)?;
        map.register("jwt", AccessControl::Jwt(jwt));
    }

    Ok(map)
}

fn new_basic_auth(conf: &BasicAuthConfig, cwd: &Path) -> Result<BasicAuth, ConfigError> {
    let htpasswd = match &conf.htpasswd_file {
        Some(file) => {
            let path = cwd.join(file);
            let content =
                fs::read_to_string(&path).map_err(|source| ConfigError::ReadCredentialsFile {
                    name: conf.name.clone(),
                    path,
                    source,
                })?;
            Some(content)
        }
        None => None,
    };

    BasicAuth::new(
        &conf.name,
        &conf.user,
        &conf.password,
        htpasswd.as_deref(),
        &conf.realm,
    )
}

fn new_jwt(conf: &JwtConfig, ctx: &EvalContext, cwd: &Path) -> Result<Jwt, ConfigError> {
    let source = Source::select(&conf.cookie, &conf.header);

    let key = match &conf.key_file {
        Some(file) => {
            let path = cwd.join(file);
            fs::read(&path).map_err(|source| ConfigError::ReadKeyFile {
                name: conf.name.clone(),
                path,
                source,
            })?
        }
        None => conf.key.as_bytes().to_vec(),
    };

    let claims = match &conf.claims {
        Some(expr) => evaluate_claims(&conf.name, expr, ctx)?,
        None => Map::new(),
    };

    Jwt::new(
        &conf.name,
        &conf.signature_algorithm,
        source,
        &key,
        claims,
        conf.required_claims.clone(),
    )
}

fn evaluate_claims(
    name: &str,
    expr: &hcl::Expression,
    ctx: &EvalContext,
) -> Result<Map<String, Value>, ConfigError> {
    let malformed = |reason: String| ConfigError::MalformedClaims {
        name: name.to_string(),
        reason,
    };

    let value = ctx.evaluate(expr).map_err(|e| malformed(e.to_string()))?;
    match serde_json::to_value(&value).map_err(|e| malformed(e.to_string()))? {
        Value::Object(claims) => Ok(claims),
        other => Err(malformed(format!("expected an object, got {other}"))),
    }
}
