use crate::handler::{Handler, ProtectedHandler};
use crate::runtime::{HandlerKind, MuxOptions, Port, ServerConfiguration};
use serde::Serialize;

/// Serializable view of a compiled configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationSummary {
    pub listen_port: Port,
    pub use_xfh: bool,
    pub ports: Vec<PortSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortSummary {
    pub port: Port,
    pub hosts: Vec<String>,
    pub routes: Vec<RouteSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSummary {
    pub kind: HandlerKind,
    pub route: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    /// Backend origin, document root or bootstrap file.
    pub target: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub access_control: Vec<String>,
}

impl From<&ServerConfiguration> for ConfigurationSummary {
    fn from(conf: &ServerConfiguration) -> Self {
        Self {
            listen_port: conf.default_port(),
            use_xfh: conf.http().use_xfh,
            ports: conf
                .port_options()
                .iter()
                .map(|(port, mux)| port_summary(*port, mux))
                .collect(),
        }
    }
}

fn port_summary(port: Port, mux: &MuxOptions) -> PortSummary {
    let routes = [HandlerKind::Api, HandlerKind::Files, HandlerKind::Spa]
        .into_iter()
        .flat_map(|kind| {
            mux.routes(kind)
                .iter()
                .map(move |(route, handler)| route_summary(kind, route, handler))
        })
        .collect();

    PortSummary {
        port,
        hosts: mux.hosts().iter().cloned().collect(),
        routes,
    }
}

fn route_summary(kind: HandlerKind, route: &str, handler: &ProtectedHandler) -> RouteSummary {
    let (backend, target) = match handler.inner() {
        Handler::Proxy(proxy) => (
            Some(proxy.backend_name.clone()).filter(|name| !name.is_empty()),
            proxy.origin.clone(),
        ),
        Handler::Files(files) => (None, files.document_root().display().to_string()),
        Handler::Spa(spa) => (None, spa.bootstrap_file().display().to_string()),
    };

    RouteSummary {
        kind,
        route: route.to_string(),
        backend,
        target,
        access_control: handler
            .access_control_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}
