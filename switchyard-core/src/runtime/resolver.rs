use crate::access_control::AccessControlMap;
use crate::conf::types::{
    AccessControlRefs, ApiConfig, BackendConfig, EndpointConfig, Origin, ServerConfig,
};
use crate::conf::{ConfigError, EvalContext};
use crate::handler::{CorsOptions, Handler, ProtectedHandler, ProxyOptions};
use crate::runtime::backends::{Backends, new_inline_backend, validate_origin};

/// Everything endpoint resolution reads. Nothing here is mutated.
pub struct Resolver<'a> {
    pub ctx: &'a EvalContext,
    pub backends: &'a Backends,
    pub access_controls: &'a AccessControlMap,
    pub defaults: &'a BackendConfig,
}

impl Resolver<'_> {
    /// Resolves the backend of `endpoint` and wraps it with the access
    /// controls of server, api and endpoint.
    ///
    /// The first match wins: a backend reference of the endpoint, an inline
    /// backend block of the endpoint, then the same two on the api block.
    pub fn resolve_endpoint(
        &self,
        server: &ServerConfig,
        api: &ApiConfig,
        endpoint: &EndpointConfig,
        pattern: &str,
        cors: &CorsOptions,
    ) -> Result<ProtectedHandler, ConfigError> {
        let (proxy, origin) = self.endpoint_backend(api, endpoint, pattern, cors)?;

        if proxy.origin.is_empty() {
            return Err(ConfigError::RequiresOrigin {
                pattern: pattern.to_string(),
                origin: origin.clone(),
            });
        }
        validate_origin(&proxy.origin, origin)?;

        tracing::debug!(
            server = %server.name,
            endpoint = %pattern,
            backend = %proxy.backend_name,
            origin = %proxy.origin,
            "endpoint resolved"
        );

        let parent = server.access_control.merge(&api.access_control);
        self.protect(&parent, &endpoint.access_control, Handler::Proxy(proxy))
    }

    /// Returns the resolved options and the origin of the block that
    /// supplied the backend.
    fn endpoint_backend<'b>(
        &'b self,
        api: &'b ApiConfig,
        endpoint: &'b EndpointConfig,
        pattern: &str,
        cors: &CorsOptions,
    ) -> Result<(ProxyOptions, &'b Origin), ConfigError> {
        if let Some(name) = &endpoint.backend {
            let backend = self.backends.lookup(name)?;
            let overlay = BackendConfig {
                remain: Some(endpoint.inline.clone()),
                ..Default::default()
            };
            let (conf, bodies) = backend.conf.merge(&overlay);
            let proxy = ProxyOptions::new(&conf, cors.clone(), bodies)?;
            return Ok((proxy, &backend.origin));
        }

        if let Some(proxy) = self.inline_backend(&endpoint.inline, cors, &endpoint.origin)? {
            return Ok((proxy, &endpoint.origin));
        }

        if let Some(name) = &api.backend {
            let backend = self.backends.lookup(name)?;
            let overlay = ProxyOptions {
                cors: cors.clone(),
                context: vec![endpoint.inline.clone()],
                ..Default::default()
            };
            return Ok((backend.proxy.clone().merge(&overlay), &backend.origin));
        }

        if let Some(proxy) = self.inline_backend(&api.inline, cors, &api.origin)? {
            return Ok((proxy, &api.origin));
        }

        Err(ConfigError::MissingBackend {
            pattern: pattern.to_string(),
        })
    }

    fn inline_backend(
        &self,
        inline: &hcl::Body,
        cors: &CorsOptions,
        origin: &Origin,
    ) -> Result<Option<ProxyOptions>, ConfigError> {
        new_inline_backend(
            inline,
            self.backends,
            self.defaults,
            cors,
            self.ctx,
            origin,
        )
    }

    /// Wraps `handler` with the access controls of `parent` followed by the
    /// ones of `own`. Every referenced name must exist.
    pub fn protect(
        &self,
        parent: &AccessControlRefs,
        own: &AccessControlRefs,
        handler: Handler,
    ) -> Result<ProtectedHandler, ConfigError> {
        configure_protected_handler(self.access_controls, parent, own, handler)
    }
}

pub fn configure_protected_handler(
    access_controls: &AccessControlMap,
    parent: &AccessControlRefs,
    own: &AccessControlRefs,
    handler: Handler,
) -> Result<ProtectedHandler, ConfigError> {
    let chain = parent
        .merge(own)
        .list()
        .into_iter()
        .map(|name| access_controls.get(name))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ProtectedHandler::new(chain, handler))
}
