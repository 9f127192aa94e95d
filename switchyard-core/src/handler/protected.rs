use crate::access_control::AccessControl;
use crate::handler::{Handler, ProxyOptions};
use std::sync::Arc;

/// A handler and the access controls every request has to pass first,
/// in order.
#[derive(Debug, Clone)]
pub struct ProtectedHandler {
    access_controls: Vec<Arc<AccessControl>>,
    inner: Handler,
}

impl ProtectedHandler {
    pub fn new(access_controls: Vec<Arc<AccessControl>>, inner: Handler) -> Self {
        Self {
            access_controls,
            inner,
        }
    }

    pub fn access_controls(&self) -> &[Arc<AccessControl>] {
        &self.access_controls
    }

    pub fn access_control_names(&self) -> Vec<&str> {
        self.access_controls.iter().map(|ac| ac.name()).collect()
    }

    pub fn is_protected(&self) -> bool {
        !self.access_controls.is_empty()
    }

    pub fn inner(&self) -> &Handler {
        &self.inner
    }

    pub fn proxy(&self) -> Option<&ProxyOptions> {
        match &self.inner {
            Handler::Proxy(options) => Some(options),
            Handler::Files(_) | Handler::Spa(_) => None,
        }
    }
}
