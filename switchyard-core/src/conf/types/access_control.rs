use crate::conf::types::Origin;
use hcl::Expression;
use std::path::PathBuf;

/// `access_control` / `disable_access_control` references of one level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessControlRefs {
    enable: Vec<String>,
    disable: Vec<String>,
}

impl AccessControlRefs {
    pub fn new(enable: Vec<String>, disable: Vec<String>) -> Self {
        Self { enable, disable }
    }

    /// Adds the references of a more specific level. Nothing is replaced.
    pub fn merge(&self, other: &AccessControlRefs) -> AccessControlRefs {
        let mut merged = self.clone();
        merged.enable.extend(other.enable.iter().cloned());
        merged.disable.extend(other.disable.iter().cloned());
        merged
    }

    /// Effective names in declaration order, without duplicates or disabled ones.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.enable.len());
        for name in &self.enable {
            if self.disable.contains(name) || names.contains(&name.as_str()) {
                continue;
            }
            names.push(name);
        }
        names
    }

    pub fn is_empty(&self) -> bool {
        self.enable.is_empty()
    }
}

/// A `jwt` block of the definitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JwtConfig {
    pub origin: Origin,
    pub name: String,
    pub signature_algorithm: String,
    pub header: String,
    pub cookie: String,
    pub key: String,
    pub key_file: Option<PathBuf>,
    /// Evaluated once while the registry is built.
    pub claims: Option<Expression>,
    pub required_claims: Vec<String>,
}

/// A `basic_auth` block of the definitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BasicAuthConfig {
    pub origin: Origin,
    pub name: String,
    pub user: String,
    pub password: String,
    pub htpasswd_file: Option<PathBuf>,
    pub realm: String,
}
