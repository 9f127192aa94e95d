use crate::conf::ConfigError;
use std::collections::BTreeMap;

/// Basic authentication credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    name: String,
    user: String,
    password: String,
    realm: String,
    /// User name to password hash, from an htpasswd file.
    htpasswd: BTreeMap<String, String>,
}

impl BasicAuth {
    pub fn new(
        name: &str,
        user: &str,
        password: &str,
        htpasswd: Option<&str>,
        realm: &str,
    ) -> Result<Self, ConfigError> {
        let htpasswd = match htpasswd {
            Some(content) => parse_htpasswd(name, content)?,
            None => BTreeMap::new(),
        };

        Ok(Self {
            name: name.to_string(),
            user: user.to_string(),
            password: password.to_string(),
            realm: realm.to_string(),
            htpasswd,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    pub fn htpasswd(&self) -> &BTreeMap<String, String> {
        &self.htpasswd
    }
}

fn parse_htpasswd(name: &str, content: &str) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut entries = BTreeMap::new();

    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line.split_once(':') {
            Some((user, hash)) if !user.is_empty() && !hash.is_empty() => {
                if entries.insert(user.to_string(), hash.to_string()).is_some() {
                    return Err(ConfigError::InvalidBasicAuth {
                        name: name.to_string(),
                        reason: format!("duplicate user '{user}' in htpasswd file"),
                    });
                }
            }
            _ => {
                return Err(ConfigError::InvalidBasicAuth {
                    name: name.to_string(),
                    reason: format!("malformed htpasswd line {}", i + 1),
                });
            }
        }
    }

    Ok(entries)
}
