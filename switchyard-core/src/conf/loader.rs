use crate::conf::error::ConfigError;
use crate::conf::eval::EvalContext;
use crate::conf::parse::parse_gateway;
use crate::conf::types::GatewayConfig;
use std::fs;
use std::path::Path;

/// Reads and decodes the configuration file at `path`.
///
/// Expressions may reference the process environment through `env`.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    //--------------------------------------------------------------------------
    // Hard fail: IO
    //--------------------------------------------------------------------------
    let src = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;

    load_config_str(&src, path, EvalContext::from_env())
}

/// Decodes configuration source text. `path` is only used for origins and
/// error messages.
pub fn load_config_str(
    src: &str,
    path: &Path,
    context: EvalContext,
) -> Result<GatewayConfig, ConfigError> {
    //--------------------------------------------------------------------------
    // Hard fail: syntax
    //--------------------------------------------------------------------------
    let body = hcl::parse(src).map_err(|e| ConfigError::parse(path, e))?;

    //--------------------------------------------------------------------------
    // Hard fail: structure
    //--------------------------------------------------------------------------
    let (servers, definitions, settings) = parse_gateway(&body, path, &context)?;

    tracing::debug!(
        file = %path.display(),
        servers = servers.len(),
        "configuration loaded"
    );

    Ok(GatewayConfig {
        file: path.to_path_buf(),
        servers,
        definitions,
        settings,
        context,
    })
}
