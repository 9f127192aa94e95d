mod backends;
mod endpoints;
mod hosts;
mod path;
mod resolver;
mod server;
mod server_options;
mod summary;
#[cfg(test)]
mod tests;
mod types;

pub use backends::{
    BackendDefinition, Backends, new_backends_from_definitions, new_inline_backend,
    validate_inline_scheme, validate_origin,
};
pub use endpoints::{EndpointPatterns, normalize_pattern};
pub use hosts::{PortHosts, WILDCARD_HOST, split_wildcard_host_port, validate_port_hosts};
pub use path::join_path;
pub use resolver::{Resolver, configure_protected_handler};
pub use server::{new_server_configuration, new_server_configuration_in};
pub use server_options::ServerOptions;
pub use summary::{ConfigurationSummary, PortSummary, RouteSummary};
pub use types::{HandlerKind, MuxOptions, Port, Routes, ServerConfiguration};
