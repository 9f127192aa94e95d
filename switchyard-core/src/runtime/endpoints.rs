use crate::conf::ConfigError;
use std::collections::HashSet;

/// Replaces every `{name}` parameter with `{}`.
pub fn normalize_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        out.push_str("{}");
        rest = &rest[start + len + 1..];
    }

    out.push_str(rest);
    out
}

/// Endpoint patterns seen within one server.
#[derive(Debug, Default)]
pub struct EndpointPatterns {
    seen: HashSet<String>,
}

impl EndpointPatterns {
    /// Records `pattern` and returns its normalized form. A pattern equal
    /// to an earlier one after normalization is rejected.
    pub fn register(&mut self, pattern: &str) -> Result<String, ConfigError> {
        let normalized = normalize_pattern(pattern);
        if !self.seen.insert(normalized.clone()) {
            return Err(ConfigError::DuplicateEndpoint {
                pattern: pattern.to_string(),
            });
        }
        Ok(normalized)
    }
}
