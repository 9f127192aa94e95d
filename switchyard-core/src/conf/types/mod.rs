mod access_control;
mod backend;
mod gateway;
mod origin;
mod server;
mod settings;

pub use access_control::{AccessControlRefs, BasicAuthConfig, JwtConfig};
pub use backend::{BackendBlock, BackendConfig, RESERVED_KEYWORDS, is_keyword, merge_layers};
pub use gateway::{Definitions, GatewayConfig};
pub use origin::Origin;
pub use server::{ApiConfig, CorsConfig, EndpointConfig, FilesConfig, ServerConfig, SpaConfig};
pub use settings::*;
