mod cors;
mod files;
mod protected;
mod proxy_options;

pub use cors::CorsOptions;
pub use files::{FileHandler, SpaHandler};
pub use protected::ProtectedHandler;
pub use proxy_options::ProxyOptions;

/// What a route resolves to.
#[derive(Debug, Clone)]
pub enum Handler {
    Proxy(ProxyOptions),
    Files(FileHandler),
    Spa(SpaHandler),
}
