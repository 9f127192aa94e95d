use crate::conf::decode;
use crate::conf::error::ConfigError;
use crate::conf::eval::EvalContext;
use crate::conf::types::{
    AccessControlRefs, ApiConfig, BackendBlock, BasicAuthConfig, CorsConfig, Definitions,
    EndpointConfig, FilesConfig, JwtConfig, Origin, ServerConfig, Settings, SpaConfig,
};
use hcl::{Attribute, Block, Body, Structure};
use std::path::Path;

pub type ParsedDocument = (Vec<ServerConfig>, Option<Definitions>, Settings);

/// Decodes the document body into the configuration model.
///
/// Only the structure is decoded here. Backend blocks stay raw until the
/// compile pass evaluates them against the startup context.
pub fn parse_gateway(
    body: &Body,
    file: &Path,
    ctx: &EvalContext,
) -> Result<ParsedDocument, ConfigError> {
    let root = Origin::new(file, "gateway", None);

    let mut servers = Vec::new();
    let mut definitions = None;
    let mut settings = None;

    for structure in body.iter() {
        match structure {
            Structure::Attribute(attr) => return Err(decode::unsupported_attribute(attr, &root)),
            Structure::Block(block) => match block.identifier() {
                "server" => {
                    let origin = Origin::new(file, "server", Some(servers.len()));
                    servers.push(parse_server(block, origin, ctx)?);
                }
                "definitions" => {
                    if definitions.is_some() {
                        return Err(decode::duplicate_block(block, &root));
                    }
                    let origin = Origin::new(file, "definitions", None);
                    definitions = Some(parse_definitions(block, origin, ctx)?);
                }
                "settings" => {
                    if settings.is_some() {
                        return Err(decode::duplicate_block(block, &root));
                    }
                    let origin = Origin::new(file, "settings", None);
                    settings = Some(parse_settings(block, origin, ctx)?);
                }
                _ => return Err(decode::unsupported_block(block, &root)),
            },
        }
    }

    Ok((servers, definitions, settings.unwrap_or_default()))
}

//-----------------------------------------------------------------------------
// Server
//-----------------------------------------------------------------------------

fn parse_server(
    block: &Block,
    origin: Origin,
    ctx: &EvalContext,
) -> Result<ServerConfig, ConfigError> {
    let mut server = ServerConfig {
        name: decode::label(block).unwrap_or_default(),
        ..Default::default()
    };
    let mut acl = AclAttributes::default();

    for structure in block.body().iter() {
        match structure {
            Structure::Attribute(attr) => match attr.key() {
                "hosts" => server.hosts = decode::string_list(ctx, attr, &origin)?,
                "base_path" => server.base_path = decode::string(ctx, attr, &origin)?,
                _ if acl.accept(attr, ctx, &origin)? => {}
                _ => return Err(decode::unsupported_attribute(attr, &origin)),
            },
            Structure::Block(child) => match child.identifier() {
                "api" => {
                    if server.api.is_some() {
                        return Err(decode::duplicate_block(child, &origin));
                    }
                    server.api = Some(parse_api(child, origin.child("api", None), ctx)?);
                }
                "files" => {
                    if server.files.is_some() {
                        return Err(decode::duplicate_block(child, &origin));
                    }
                    server.files = Some(parse_files(child, origin.child("files", None), ctx)?);
                }
                "spa" => {
                    if server.spa.is_some() {
                        return Err(decode::duplicate_block(child, &origin));
                    }
                    server.spa = Some(parse_spa(child, origin.child("spa", None), ctx)?);
                }
                _ => return Err(decode::unsupported_block(child, &origin)),
            },
        }
    }

    server.access_control = acl.into_refs();
    server.origin = origin;
    Ok(server)
}

fn parse_api(block: &Block, origin: Origin, ctx: &EvalContext) -> Result<ApiConfig, ConfigError> {
    let mut api = ApiConfig::default();
    let mut acl = AclAttributes::default();
    let mut inline = Vec::new();

    for structure in block.body().iter() {
        match structure {
            Structure::Attribute(attr) => match attr.key() {
                "base_path" => api.base_path = decode::string(ctx, attr, &origin)?,
                "backend" => api.backend = Some(decode::string(ctx, attr, &origin)?),
                _ if acl.accept(attr, ctx, &origin)? => {}
                _ => inline.push(structure.clone()),
            },
            Structure::Block(child) => match child.identifier() {
                "cors" => {
                    if api.cors.is_some() {
                        return Err(decode::duplicate_block(child, &origin));
                    }
                    api.cors = Some(parse_cors(child, origin.child("cors", None), ctx)?);
                }
                "endpoint" => {
                    let index = api.endpoints.len();
                    let endpoint_origin = origin.child("endpoint", Some(index));
                    api.endpoints
                        .push(parse_endpoint(child, endpoint_origin, ctx)?);
                }
                _ => inline.push(structure.clone()),
            },
        }
    }

    api.access_control = acl.into_refs();
    api.inline = inline.into_iter().collect();
    api.origin = origin;
    Ok(api)
}

fn parse_endpoint(
    block: &Block,
    origin: Origin,
    ctx: &EvalContext,
) -> Result<EndpointConfig, ConfigError> {
    let pattern = decode::label(block)
        .ok_or_else(|| ConfigError::decode(&origin, "endpoint requires a pattern label"))?;

    let mut endpoint = EndpointConfig {
        pattern,
        ..Default::default()
    };
    let mut acl = AclAttributes::default();
    let mut inline = Vec::new();

    for structure in block.body().iter() {
        match structure {
            Structure::Attribute(attr) => match attr.key() {
                "backend" => endpoint.backend = Some(decode::string(ctx, attr, &origin)?),
                _ if acl.accept(attr, ctx, &origin)? => {}
                _ => inline.push(structure.clone()),
            },
            Structure::Block(_) => inline.push(structure.clone()),
        }
    }

    endpoint.access_control = acl.into_refs();
    endpoint.inline = inline.into_iter().collect();
    endpoint.origin = origin;
    Ok(endpoint)
}

fn parse_cors(block: &Block, origin: Origin, ctx: &EvalContext) -> Result<CorsConfig, ConfigError> {
    let mut cors = CorsConfig::default();

    for attr in strict_attributes(block, &origin)? {
        match attr.key() {
            "allowed_origins" => cors.allowed_origins = decode::string_list(ctx, attr, &origin)?,
            "allow_credentials" => cors.allow_credentials = decode::bool(ctx, attr, &origin)?,
            "max_age" => cors.max_age = Some(decode::string(ctx, attr, &origin)?),
            "disable" => cors.disable = decode::bool(ctx, attr, &origin)?,
            _ => return Err(decode::unsupported_attribute(attr, &origin)),
        }
    }

    cors.origin = origin;
    Ok(cors)
}

fn parse_files(
    block: &Block,
    origin: Origin,
    ctx: &EvalContext,
) -> Result<FilesConfig, ConfigError> {
    let mut files = FilesConfig::default();
    let mut acl = AclAttributes::default();
    let mut document_root = None;

    for attr in strict_attributes(block, &origin)? {
        match attr.key() {
            "base_path" => files.base_path = decode::string(ctx, attr, &origin)?,
            "document_root" => document_root = Some(decode::path(ctx, attr, &origin)?),
            _ if acl.accept(attr, ctx, &origin)? => {}
            _ => return Err(decode::unsupported_attribute(attr, &origin)),
        }
    }

    files.document_root =
        document_root.ok_or_else(|| decode::missing_attribute("document_root", &origin))?;
    files.access_control = acl.into_refs();
    files.origin = origin;
    Ok(files)
}

fn parse_spa(block: &Block, origin: Origin, ctx: &EvalContext) -> Result<SpaConfig, ConfigError> {
    let mut spa = SpaConfig::default();
    let mut acl = AclAttributes::default();
    let mut bootstrap_file = None;
    let mut paths = None;

    for attr in strict_attributes(block, &origin)? {
        match attr.key() {
            "base_path" => spa.base_path = decode::string(ctx, attr, &origin)?,
            "bootstrap_file" => bootstrap_file = Some(decode::path(ctx, attr, &origin)?),
            "paths" => paths = Some(decode::string_list(ctx, attr, &origin)?),
            _ if acl.accept(attr, ctx, &origin)? => {}
            _ => return Err(decode::unsupported_attribute(attr, &origin)),
        }
    }

    spa.bootstrap_file =
        bootstrap_file.ok_or_else(|| decode::missing_attribute("bootstrap_file", &origin))?;
    spa.paths = paths.ok_or_else(|| decode::missing_attribute("paths", &origin))?;
    spa.access_control = acl.into_refs();
    spa.origin = origin;
    Ok(spa)
}

//-----------------------------------------------------------------------------
// Definitions
//-----------------------------------------------------------------------------

fn parse_definitions(
    block: &Block,
    origin: Origin,
    ctx: &EvalContext,
) -> Result<Definitions, ConfigError> {
    let mut definitions = Definitions::default();

    for structure in block.body().iter() {
        let child = match structure {
            Structure::Attribute(attr) => return Err(decode::unsupported_attribute(attr, &origin)),
            Structure::Block(child) => child,
        };

        match child.identifier() {
            "backend" => {
                let backend_origin = origin.child("backend", Some(definitions.backends.len()));
                let name = decode::label(child).ok_or_else(|| {
                    ConfigError::decode(&backend_origin, "backend requires a name label")
                })?;
                definitions.backends.push(BackendBlock {
                    origin: backend_origin,
                    name,
                    body: child.body().clone(),
                });
            }
            "jwt" => {
                let jwt_origin = origin.child("jwt", Some(definitions.jwt.len()));
                definitions.jwt.push(parse_jwt(child, jwt_origin, ctx)?);
            }
            "basic_auth" => {
                let ba_origin = origin.child("basic_auth", Some(definitions.basic_auth.len()));
                definitions
                    .basic_auth
                    .push(parse_basic_auth(child, ba_origin, ctx)?);
            }
            _ => return Err(decode::unsupported_block(child, &origin)),
        }
    }

    Ok(definitions)
}

fn parse_jwt(block: &Block, origin: Origin, ctx: &EvalContext) -> Result<JwtConfig, ConfigError> {
    let mut jwt = JwtConfig {
        name: decode::label(block).unwrap_or_default(),
        ..Default::default()
    };

    for attr in strict_attributes(block, &origin)? {
        match attr.key() {
            "signature_algorithm" => {
                jwt.signature_algorithm = decode::string(ctx, attr, &origin)?
            }
            "header" => jwt.header = decode::string(ctx, attr, &origin)?,
            "cookie" => jwt.cookie = decode::string(ctx, attr, &origin)?,
            "key" => jwt.key = decode::string(ctx, attr, &origin)?,
            "key_file" => jwt.key_file = Some(decode::path(ctx, attr, &origin)?),
            "claims" => jwt.claims = Some(attr.expr().clone()),
            "required_claims" => jwt.required_claims = decode::string_list(ctx, attr, &origin)?,
            _ => return Err(decode::unsupported_attribute(attr, &origin)),
        }
    }

    jwt.origin = origin;
    Ok(jwt)
}

fn parse_basic_auth(
    block: &Block,
    origin: Origin,
    ctx: &EvalContext,
) -> Result<BasicAuthConfig, ConfigError> {
    let mut basic_auth = BasicAuthConfig {
        name: decode::label(block).unwrap_or_default(),
        ..Default::default()
    };

    for attr in strict_attributes(block, &origin)? {
        match attr.key() {
            "user" => basic_auth.user = decode::string(ctx, attr, &origin)?,
            "password" => basic_auth.password = decode::string(ctx, attr, &origin)?,
            "htpasswd_file" => basic_auth.htpasswd_file = Some(decode::path(ctx, attr, &origin)?),
            "realm" => basic_auth.realm = decode::string(ctx, attr, &origin)?,
            _ => return Err(decode::unsupported_attribute(attr, &origin)),
        }
    }

    basic_auth.origin = origin;
    Ok(basic_auth)
}

//-----------------------------------------------------------------------------
// Settings
//-----------------------------------------------------------------------------

fn parse_settings(
    block: &Block,
    origin: Origin,
    ctx: &EvalContext,
) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();

    for attr in strict_attributes(block, &origin)? {
        match attr.key() {
            "default_port" => settings.default_port = decode::port(ctx, attr, &origin)?,
            "xfh" => settings.xfh = decode::bool(ctx, attr, &origin)?,
            "connect_timeout" => settings.connect_timeout = decode::string(ctx, attr, &origin)?,
            "timeout" => settings.timeout = decode::string(ctx, attr, &origin)?,
            "ttfb_timeout" => settings.ttfb_timeout = decode::string(ctx, attr, &origin)?,
            "request_body_limit" => {
                settings.request_body_limit = decode::string(ctx, attr, &origin)?
            }
            _ => return Err(decode::unsupported_attribute(attr, &origin)),
        }
    }

    settings.origin = origin;
    Ok(settings)
}

//-----------------------------------------------------------------------------
// Helpers
//-----------------------------------------------------------------------------

/// Attributes of a block which must not contain nested blocks.
fn strict_attributes<'a>(
    block: &'a Block,
    origin: &Origin,
) -> Result<Vec<&'a Attribute>, ConfigError> {
    if let Some(nested) = block.body().blocks().next() {
        return Err(decode::unsupported_block(nested, origin));
    }
    Ok(block.body().attributes().collect())
}

#[derive(Default)]
struct AclAttributes {
    enable: Vec<String>,
    disable: Vec<String>,
}

impl AclAttributes {
    /// Consumes `access_control` and `disable_access_control`.
    fn accept(
        &mut self,
        attr: &Attribute,
        ctx: &EvalContext,
        origin: &Origin,
    ) -> Result<bool, ConfigError> {
        match attr.key() {
            "access_control" => self.enable = decode::string_list(ctx, attr, origin)?,
            "disable_access_control" => self.disable = decode::string_list(ctx, attr, origin)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn into_refs(self) -> AccessControlRefs {
        AccessControlRefs::new(self.enable, self.disable)
    }
}
