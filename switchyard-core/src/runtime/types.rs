use crate::conf::HttpConfig;
use crate::handler::ProtectedHandler;
use crate::runtime::hosts::WILDCARD_HOST;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Port(pub u16);

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerKind {
    Api,
    Files,
    Spa,
}

impl HandlerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerKind::Api => "api",
            HandlerKind::Files => "files",
            HandlerKind::Spa => "spa",
        }
    }
}

/// Route key to handler. Keys are a plain path for wildcard hosts and
/// `host:port/path` otherwise.
pub type Routes = BTreeMap<String, Arc<ProtectedHandler>>;

/// Route tables and recognized hosts of one listening port.
#[derive(Debug, Clone, Default)]
pub struct MuxOptions {
    endpoint_routes: Routes,
    file_routes: Routes,
    spa_routes: Routes,
    hosts: BTreeSet<String>,
}

impl MuxOptions {
    pub(crate) fn new(hosts: BTreeSet<String>) -> Self {
        Self {
            hosts,
            ..Default::default()
        }
    }

    pub fn routes(&self, kind: HandlerKind) -> &Routes {
        match kind {
            HandlerKind::Api => &self.endpoint_routes,
            HandlerKind::Files => &self.file_routes,
            HandlerKind::Spa => &self.spa_routes,
        }
    }

    pub(crate) fn routes_mut(&mut self, kind: HandlerKind) -> &mut Routes {
        match kind {
            HandlerKind::Api => &mut self.endpoint_routes,
            HandlerKind::Files => &mut self.file_routes,
            HandlerKind::Spa => &mut self.spa_routes,
        }
    }

    pub fn endpoint_routes(&self) -> &Routes {
        &self.endpoint_routes
    }

    pub fn file_routes(&self) -> &Routes {
        &self.file_routes
    }

    pub fn spa_routes(&self) -> &Routes {
        &self.spa_routes
    }

    pub fn hosts(&self) -> &BTreeSet<String> {
        &self.hosts
    }

    /// Whether requests for `host` are served on this port. A wildcard
    /// binding accepts every host.
    pub fn recognizes_host(&self, host: &str) -> bool {
        self.hosts.contains(WILDCARD_HOST)
            || self.hosts.contains(&host.to_ascii_lowercase())
    }

    pub fn route_count(&self) -> usize {
        self.endpoint_routes.len() + self.file_routes.len() + self.spa_routes.len()
    }
}

/// The compiled routing table. Immutable once built.
#[derive(Debug, Clone)]
pub struct ServerConfiguration {
    pub(crate) port_options: BTreeMap<Port, MuxOptions>,
    pub(crate) http: HttpConfig,
}

impl ServerConfiguration {
    pub fn port_options(&self) -> &BTreeMap<Port, MuxOptions> {
        &self.port_options
    }

    pub fn get(&self, port: Port) -> Option<&MuxOptions> {
        self.port_options.get(&port)
    }

    pub fn ports(&self) -> impl Iterator<Item = Port> + '_ {
        self.port_options.keys().copied()
    }

    pub fn http(&self) -> &HttpConfig {
        &self.http
    }

    pub fn default_port(&self) -> Port {
        Port(self.http.listen_port)
    }

    pub fn route_count(&self) -> usize {
        self.port_options.values().map(MuxOptions::route_count).sum()
    }
}
