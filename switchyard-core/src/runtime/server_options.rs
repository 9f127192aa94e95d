use crate::conf::types::ServerConfig;
use crate::runtime::path::join_path;

/// Base paths of one server's blocks, each rooted below the server base path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOptions {
    pub server_name: String,
    pub api_base_path: String,
    pub file_base_path: String,
    pub spa_base_path: String,
}

impl ServerOptions {
    pub fn new(server: &ServerConfig) -> Self {
        let base = |block: Option<&str>| join_path(&["/", &server.base_path, block.unwrap_or("")]);

        Self {
            server_name: server.name.clone(),
            api_base_path: base(server.api.as_ref().map(|api| api.base_path.as_str())),
            file_base_path: base(server.files.as_ref().map(|files| files.base_path.as_str())),
            spa_base_path: base(server.spa.as_ref().map(|spa| spa.base_path.as_str())),
        }
    }
}
