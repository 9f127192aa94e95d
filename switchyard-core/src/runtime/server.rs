use crate::access_control::configure_access_controls;
use crate::conf::types::{ApiConfig, ServerConfig};
use crate::conf::{ConfigError, GatewayConfig, HttpConfig};
use crate::handler::{CorsOptions, FileHandler, Handler, ProtectedHandler, SpaHandler};
use crate::runtime::backends::{new_backends_from_definitions, validate_inline_scheme};
use crate::runtime::endpoints::EndpointPatterns;
use crate::runtime::hosts::{WILDCARD_HOST, effective_hosts, split_wildcard_host_port, validate_port_hosts};
use crate::runtime::path::join_path;
use crate::runtime::resolver::Resolver;
use crate::runtime::server_options::ServerOptions;
use crate::runtime::{HandlerKind, MuxOptions, Port, ServerConfiguration};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;

/// Compiles the configuration into the routing table. Files referenced by
/// the configuration are resolved against the working directory.
pub fn new_server_configuration(
    conf: &GatewayConfig,
    http: &HttpConfig,
) -> Result<ServerConfiguration, ConfigError> {
    let cwd = std::env::current_dir().map_err(|source| ConfigError::WorkingDir { source })?;
    new_server_configuration_in(conf, http, &cwd)
}

/// Like [`new_server_configuration`], resolving files against `cwd`.
pub fn new_server_configuration_in(
    conf: &GatewayConfig,
    http: &HttpConfig,
    cwd: &Path,
) -> Result<ServerConfiguration, ConfigError> {
    if conf.servers.is_empty() {
        return Err(ConfigError::MissingServer);
    }

    // Flag and environment win over the document.
    let default_port = http.listen_port;

    //--------------------------------------------------------------------------
    // Startup context with a placeholder exchange
    //--------------------------------------------------------------------------
    let ctx = conf.context.with_placeholder_exchange();

    //--------------------------------------------------------------------------
    // Bindings, backends and access controls
    //--------------------------------------------------------------------------
    let port_hosts = validate_port_hosts(&conf.servers, default_port)?;
    let backends = new_backends_from_definitions(conf.definitions.as_ref(), &conf.settings, &ctx)?;
    let access_controls = configure_access_controls(conf.definitions.as_ref(), &ctx, cwd)?;

    let mut builder = Builder::new(default_port);
    for (port, hosts) in port_hosts {
        builder.port_options.insert(port, MuxOptions::new(hosts));
    }

    let defaults = conf.settings.default_backend();
    let resolver = Resolver {
        ctx: &ctx,
        backends: &backends,
        access_controls: &access_controls,
        defaults: &defaults,
    };

    //--------------------------------------------------------------------------
    // Routes per server
    //--------------------------------------------------------------------------
    for server in &conf.servers {
        let options = ServerOptions::new(server);

        if let Some(spa) = &server.spa {
            let handler = SpaHandler::new(&cwd.join(&spa.bootstrap_file), &spa.origin)?;
            let handler = Arc::new(resolver.protect(
                &server.access_control,
                &spa.access_control,
                Handler::Spa(handler),
            )?);

            for spa_path in &spa.paths {
                let path = join_path(&[&options.spa_base_path, spa_path.trim_end_matches('/')]);
                builder.set_routes_from_hosts(&server.hosts, &path, &handler, HandlerKind::Spa)?;
            }
        }

        if let Some(files) = &server.files {
            let handler = FileHandler::new(
                &options.file_base_path,
                &cwd.join(&files.document_root),
                &files.origin,
            )?;
            let handler = Arc::new(resolver.protect(
                &server.access_control,
                &files.access_control,
                Handler::Files(handler),
            )?);

            builder.set_routes_from_hosts(
                &server.hosts,
                &options.file_base_path,
                &handler,
                HandlerKind::Files,
            )?;
        }

        if let Some(api) = &server.api {
            build_api(&mut builder, &resolver, server, api, &options)?;
        }
    }

    let configuration = builder.build(*http);

    tracing::info!(
        ports = configuration.port_options().len(),
        routes = configuration.route_count(),
        backends = backends.len(),
        access_controls = access_controls.len(),
        "server configuration built"
    );

    Ok(configuration)
}

fn build_api(
    builder: &mut Builder,
    resolver: &Resolver<'_>,
    server: &ServerConfig,
    api: &ApiConfig,
    options: &ServerOptions,
) -> Result<(), ConfigError> {
    let cors = CorsOptions::new(api.cors.as_ref())?;
    let mut patterns = EndpointPatterns::default();

    for endpoint in &api.endpoints {
        let pattern = join_path(&["/", &options.api_base_path, &endpoint.pattern]);
        patterns.register(&pattern)?;
        validate_inline_scheme(&endpoint.inline, &endpoint.origin)?;

        let handler = resolver.resolve_endpoint(server, api, endpoint, &pattern, &cors)?;
        builder.set_routes_from_hosts(&server.hosts, &pattern, &Arc::new(handler), HandlerKind::Api)?;
    }

    Ok(())
}

/// Mutable only while the configuration is compiled.
struct Builder {
    default_port: u16,
    port_options: BTreeMap<Port, MuxOptions>,
}

impl Builder {
    fn new(default_port: u16) -> Self {
        let mut port_options = BTreeMap::new();
        port_options.insert(Port(default_port), MuxOptions::default());
        Self {
            default_port,
            port_options,
        }
    }

    /// Registers `handler` at `path` for every host of a server.
    fn set_routes_from_hosts(
        &mut self,
        hosts: &[String],
        path: &str,
        handler: &Arc<ProtectedHandler>,
        kind: HandlerKind,
    ) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();

        for host in effective_hosts(hosts) {
            let (host, port) = split_wildcard_host_port(host, self.default_port)?;
            if !seen.insert((host.clone(), port)) {
                continue;
            }

            let key = if host == WILDCARD_HOST {
                join_path(&["/", path])
            } else {
                join_path(&[&host_port(&host, port), "/", path])
            };

            let routes = self.port_options.entry(port).or_default().routes_mut(kind);
            if routes.contains_key(&key) {
                return Err(ConfigError::DuplicateRoute {
                    port: port.0,
                    path: path.to_string(),
                });
            }

            tracing::debug!(port = %port, route = %key, kind = kind.as_str(), "route registered");
            routes.insert(key, Arc::clone(handler));
        }

        Ok(())
    }

    fn build(self, http: HttpConfig) -> ServerConfiguration {
        ServerConfiguration {
            port_options: self.port_options,
            http,
        }
    }
}

fn host_port(host: &str, port: Port) -> String {
    if host.contains(':') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}
