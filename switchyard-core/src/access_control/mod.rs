//! Named access controls shared by every handler that references them.

mod basic_auth;
mod jwt;
mod registry;
#[cfg(test)]
mod tests;

pub use basic_auth::BasicAuth;
pub use jwt::{Jwt, Source};
pub use registry::{AccessControlMap, configure_access_controls};

#[derive(Debug, Clone)]
pub enum AccessControl {
    Jwt(Jwt),
    BasicAuth(BasicAuth),
}

impl AccessControl {
    pub fn name(&self) -> &str {
        match self {
            AccessControl::Jwt(jwt) => jwt.name(),
            AccessControl::BasicAuth(ba) => ba.name(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AccessControl::Jwt(_) => "jwt",
            AccessControl::BasicAuth(_) => "basic_auth",
        }
    }
}
