use crate::conf::ConfigError;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_TOKEN_HEADER: &str = "Authorization";

/// Where the token is taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Header(String),
    Cookie(String),
}

impl Source {
    /// A cookie wins over a header. Neither falls back to the
    /// `Authorization` header.
    pub fn select(cookie: &str, header: &str) -> Self {
        if !cookie.is_empty() {
            Source::Cookie(cookie.to_string())
        } else if !header.is_empty() {
            Source::Header(header.to_string())
        } else {
            Source::Header(DEFAULT_TOKEN_HEADER.to_string())
        }
    }
}

#[derive(Clone)]
pub struct Jwt {
    name: String,
    algorithm: Algorithm,
    source: Source,
    key: DecodingKey,
    claims: Map<String, Value>,
    required_claims: Vec<String>,
}

impl Jwt {
    pub fn new(
        name: &str,
        signature_algorithm: &str,
        source: Source,
        key: &[u8],
        claims: Map<String, Value>,
        required_claims: Vec<String>,
    ) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidJwt {
            name: name.to_string(),
            reason,
        };

        let algorithm = Algorithm::from_str(signature_algorithm).map_err(|_| {
            invalid(format!(
                "algorithm is not supported: '{signature_algorithm}'"
            ))
        })?;

        if key.is_empty() {
            return Err(invalid("key required".to_string()));
        }

        let key = decoding_key(algorithm, key).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            name: name.to_string(),
            algorithm,
            source,
            key,
            claims,
            required_claims,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn key(&self) -> &DecodingKey {
        &self.key
    }

    /// Expected claim values.
    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    pub fn required_claims(&self) -> &[String] {
        &self.required_claims
    }

    /// Token validation rules for the enforcing side.
    pub fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_aud = false;
        validation.set_required_spec_claims(&self.required_claims);

        if let Some(Value::String(iss)) = self.claims.get("iss") {
            validation.set_issuer(&[iss]);
        }

        validation
    }
}

impl fmt::Debug for Jwt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Jwt")
            .field("name", &self.name)
            .field("algorithm", &self.algorithm)
            .field("source", &self.source)
            .field("claims", &self.claims)
            .field("required_claims", &self.required_claims)
            .finish_non_exhaustive()
    }
}

fn decoding_key(algorithm: Algorithm, key: &[u8]) -> jsonwebtoken::errors::Result<DecodingKey> {
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(DecodingKey::from_secret(key)),
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => DecodingKey::from_rsa_pem(key),
        Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(key),
        Algorithm::EdDSA => DecodingKey::from_ed_pem(key),
    }
}
