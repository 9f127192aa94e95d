use crate::cli::conf::compile;
use crate::conf::ConfigError;
use crate::runtime::{MuxOptions, ServerConfiguration};
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub fn check(path: PathBuf, port: Option<u16>, plain: bool) -> anyhow::Result<()> {
    match compile(&path, port) {
        Ok(conf) => {
            print_summary(&conf);
            Ok(())
        }
        Err(err) => {
            print_config_error(&err, plain);
            std::process::exit(1);
        }
    }
}

fn print_summary(conf: &ServerConfiguration) {
    let routes = |select: fn(&MuxOptions) -> usize| {
        conf.port_options().values().map(select).sum::<usize>()
    };

    println!("✔ Config compiled successfully");
    println!("✔ {} ports", conf.port_options().len());
    println!("✔ {} endpoints", routes(|m| m.endpoint_routes().len()));
    println!("✔ {} file routes", routes(|m| m.file_routes().len()));
    println!("✔ {} spa routes", routes(|m| m.spa_routes().len()));
}

fn print_config_error(err: &ConfigError, plain: bool) {
    if plain {
        eprintln!("{err}");
    } else {
        eprintln!();
        eprintln!("{}: {}", "error".red().bold(), err);
    }
    if let Some(hint) = config_error_hint(err) {
        eprintln!();
        eprintln!("{hint}");
    }
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        //---------------------------------------------------------------------
        // Server structure
        //---------------------------------------------------------------------
        ConfigError::MissingServer => Some(
            "At least one server block is required.\n\
             \n\
             Example:\n\
             \n\
             server \"api\" {\n\
             \x20 api {\n\
             \x20   endpoint \"/users\" {\n\
             \x20     backend = \"users\"\n\
             \x20   }\n\
             \x20 }\n\
             }",
        ),

        ConfigError::HostsMandatory { .. } => Some(
            "With more than one server block every server has to declare its hosts.\n\
             \n\
             Example:\n\
             \n\
             hosts = [\"api.example.com\", \"*:9090\"]",
        ),

        ConfigError::DuplicateHostPort { .. } => Some(
            "Two servers bind the same host on the same port.\n\
             \n\
             Use distinct hosts or ports per server.",
        ),

        //---------------------------------------------------------------------
        // Endpoint / backend resolution
        //---------------------------------------------------------------------
        ConfigError::MissingBackend { .. } => Some(
            "Endpoints need a backend: a `backend = \"name\"` reference, an inline\n\
             `backend { ... }` block, or one of both on the surrounding api block.",
        ),

        ConfigError::RequiresOrigin { .. } | ConfigError::MissingOrigin { .. } => Some(
            "Backends must declare where requests are forwarded to.\n\
             \n\
             Example:\n\
             \n\
             backend {\n\
             \x20 origin = \"http://127.0.0.1:8080\"\n\
             }",
        ),

        ConfigError::ReservedBackendName { .. } => {
            Some("Rename the backend; `proxy` is a reserved keyword.")
        }

        ConfigError::DuplicateEndpoint { .. } => Some(
            "Path parameter names do not make endpoints distinct:\n\
             `/users/{id}` and `/users/{name}` are the same endpoint.",
        ),

        //---------------------------------------------------------------------
        // Access control
        //---------------------------------------------------------------------
        ConfigError::AccessControlNotFound { .. } => Some(
            "Access controls must be declared in the definitions block.\n\
             \n\
             Example:\n\
             \n\
             definitions {\n\
             \x20 basic_auth \"ba\" {\n\
             \x20   user     = \"admin\"\n\
             \x20   password = env.ADMIN_PASSWORD\n\
             \x20 }\n\
             }",
        ),

        ConfigError::MissingAccessControlLabel { .. } => {
            Some("Access control blocks need a name label, e.g. `jwt \"token\" { ... }`.")
        }

        //---------------------------------------------------------------------
        // Environment
        //---------------------------------------------------------------------
        ConfigError::InvalidEnv { .. } => {
            Some("SWITCHYARD_PORT must be a port number between 1 and 65535.")
        }

        //---------------------------------------------------------------------
        // Everything else: no hint
        //---------------------------------------------------------------------
        _ => None,
    }
}
