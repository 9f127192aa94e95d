use crate::access_control::AccessControl;
use crate::conf::types::Settings;
use crate::conf::{ConfigError, EvalContext, GatewayConfig, HttpConfig, load_config_str};
use crate::handler::Handler;
use crate::runtime::{
    ConfigurationSummary, HandlerKind, Port, ServerConfiguration, new_server_configuration_in,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn load(src: &str) -> GatewayConfig {
    load_config_str(src, Path::new("/test/gateway.hcl"), EvalContext::default()).unwrap()
}

fn build(src: &str) -> Result<ServerConfiguration, ConfigError> {
    build_in(src, Path::new("/"))
}

fn build_in(src: &str, cwd: &Path) -> Result<ServerConfiguration, ConfigError> {
    let conf = load(src);
    let http = HttpConfig::from_settings(&conf.settings);
    new_server_configuration_in(&conf, &http, cwd)
}

#[test]
fn configuration_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ServerConfiguration>();
}

#[test]
fn no_servers_is_rejected() {
    // Act
    let err = build("").unwrap_err();

    // Assert
    assert!(matches!(err, ConfigError::MissingServer));
}

#[test]
fn named_backend_reference_creates_one_route() {
    // Arrange
    let src = r#"
server "api" {
  api {
    endpoint "/users" {
      backend = "users"
    }
  }
}

definitions {
  backend "users" {
    origin = "http://users:8080"
  }
}
"#;

    // Act
    let conf = build(src).unwrap();

    // Assert
    let mux = conf.get(Port(8080)).unwrap();
    assert_eq!(conf.route_count(), 1);
    let handler = &mux.endpoint_routes()["/users"];
    let proxy = handler.proxy().unwrap();
    assert_eq!(proxy.origin, "http://users:8080");
    assert_eq!(proxy.backend_name, "users");
}

#[test]
fn inline_backend_without_origin_is_rejected() {
    // Arrange
    let src = r#"
server "api" {
  api {
    endpoint "/x" {
      backend {
        path = "/y"
      }
    }
  }
}
"#;

    // Act
    let err = build(src).unwrap_err();

    // Assert
    assert!(err.to_string().contains("requires an origin attribute"));
    assert!(matches!(err, ConfigError::RequiresOrigin { ref pattern, .. } if pattern == "/x"));
}

#[test]
fn origin_errors_point_at_the_block_declaring_the_backend() {
    // Arrange
    let missing = r#"
server "api" {
  api {
    backend {
      path = "/y"
    }
    endpoint "/x" {}
  }
}
"#;
    let invalid = r#"
server "api" {
  api {
    backend {
      origin = "ftp://files"
    }
    endpoint "/x" {}
  }
}
"#;

    // Act
    let missing = build(missing).unwrap_err();
    let invalid = build(invalid).unwrap_err();

    // Assert
    let ConfigError::RequiresOrigin { origin, .. } = missing else {
        panic!("expected missing origin, got {missing:?}");
    };
    assert_eq!(origin.section(), "server[0].api");

    let ConfigError::InvalidOrigin { origin, .. } = invalid else {
        panic!("expected invalid origin, got {invalid:?}");
    };
    assert_eq!(origin.section(), "server[0].api");
}

#[test]
fn undefined_backend_reference_is_rejected() {
    // Arrange
    let src = r#"
server "api" {
  api {
    endpoint "/x" {
      backend = "ghost"
    }
  }
}
"#;

    // Act
    let err = build(src).unwrap_err();

    // Assert
    assert_eq!(err.to_string(), "backend 'ghost' is not defined");
}

#[test]
fn endpoint_without_any_backend_is_missing_backend() {
    // Arrange
    let src = r#"
server "api" {
  api {
    endpoint "/x" {}
  }
}
"#;

    // Act
    let err = build(src).unwrap_err();

    // Assert
    assert!(matches!(err, ConfigError::MissingBackend { ref pattern } if pattern == "/x"));
}

#[test]
fn endpoints_inherit_api_backends() {
    // Arrange
    let src = r#"
server "api" {
  hosts = ["*"]

  api {
    base_path = "/v1"

    backend {
      origin = "http://inline:9000"
    }

    endpoint "/a" {}
  }
}

server "ref" {
  hosts = ["ref.example.com"]

  api {
    backend = "shared"

    endpoint "/b" {
      set_request_headers = {
        x-endpoint = "b"
      }
    }
  }
}

definitions {
  backend "shared" {
    origin = "http://shared:8080"
  }
}
"#;

    // Act
    let conf = build(src).unwrap();

    // Assert
    let mux = conf.get(Port(8080)).unwrap();
    let a = mux.endpoint_routes()["/v1/a"].proxy().unwrap();
    assert_eq!(a.origin, "http://inline:9000");

    let b = mux.endpoint_routes()["ref.example.com:8080/b"].proxy().unwrap();
    assert_eq!(b.origin, "http://shared:8080");
    assert_eq!(b.context.len(), 2);
    assert_eq!(
        b.dynamic_attribute("origin", &EvalContext::default()).as_deref(),
        Some("http://shared:8080")
    );
}

#[test]
fn endpoint_reference_wins_over_api_backend() {
    // Arrange
    let src = r#"
server "api" {
  api {
    backend = "fallback"

    endpoint "/a" {
      backend = "primary"
      path = "/rewritten"
    }
  }
}

definitions {
  backend "primary" {
    origin = "http://primary"
  }
  backend "fallback" {
    origin = "http://fallback"
  }
}
"#;

    // Act
    let conf = build(src).unwrap();

    // Assert
    let proxy = conf.get(Port(8080)).unwrap().endpoint_routes()["/a"]
        .proxy()
        .unwrap()
        .clone();
    assert_eq!(proxy.origin, "http://primary");
    assert_eq!(
        proxy.dynamic_attribute("path", &EvalContext::default()).as_deref(),
        Some("/rewritten")
    );
}

#[test]
fn duplicate_endpoint_after_normalization_is_rejected() {
    // Arrange
    let src = r#"
server "api" {
  api {
    backend {
      origin = "http://a"
    }
    endpoint "/x/{a}" {}
    endpoint "/x/{b}" {}
  }
}
"#;

    // Act
    let err = build(src).unwrap_err();

    // Assert
    assert!(matches!(err, ConfigError::DuplicateEndpoint { ref pattern } if pattern == "/x/{b}"));
}

#[test]
fn access_control_chain_is_ordered_and_disabled_names_are_dropped() {
    // Arrange
    let src = r#"
server "api" {
  access_control = ["ba", "token"]

  api {
    disable_access_control = ["ba"]

    endpoint "/a" {
      access_control = ["token", "other"]
      backend {
        origin = "http://a"
      }
    }
  }
}

definitions {
  basic_auth "ba" {
    user = "u"
    password = "p"
  }
  basic_auth "other" {
    user = "o"
  }
  jwt "token" {
    signature_algorithm = "HS256"
    key = "secret"
  }
}
"#;

    // Act
    let conf = build(src).unwrap();

    // Assert
    let handler = &conf.get(Port(8080)).unwrap().endpoint_routes()["/a"];
    assert_eq!(handler.access_control_names(), vec!["token", "other"]);
    assert!(matches!(
        handler.access_controls()[0].as_ref(),
        AccessControl::Jwt(_)
    ));
}

#[test]
fn unknown_access_control_is_rejected() {
    // Arrange
    let src = r#"
server "api" {
  api {
    endpoint "/a" {
      access_control = ["nope"]
      backend {
        origin = "http://a"
      }
    }
  }
}
"#;

    // Act
    let err = build(src).unwrap_err();

    // Assert
    assert!(matches!(err, ConfigError::AccessControlNotFound { ref name } if name == "nope"));
}

#[test]
fn cors_options_are_attached_to_api_endpoints() {
    // Arrange
    let src = r#"
server "api" {
  api {
    cors {
      allowed_origins = ["https://app.example.com"]
      max_age = "10m"
    }
    endpoint "/a" {
      backend {
        origin = "http://a"
      }
    }
  }
}
"#;

    // Act
    let conf = build(src).unwrap();

    // Assert
    let proxy = conf.get(Port(8080)).unwrap().endpoint_routes()["/a"]
        .proxy()
        .unwrap()
        .clone();
    assert!(proxy.cors.allows_origin("https://app.example.com"));
    assert!(!proxy.cors.allows_origin("https://evil.example.com"));
}

#[test]
fn files_and_spa_routes_are_registered() {
    // Arrange
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("public")).unwrap();
    fs::write(dir.path().join("public/index.html"), "<html></html>").unwrap();
    let src = r#"
server "web" {
  base_path = "/web"

  files {
    base_path = "/static"
    document_root = "public"
  }

  spa {
    bootstrap_file = "public/index.html"
    paths = ["/app/**", "/"]
  }
}
"#;

    // Act
    let conf = build_in(src, dir.path()).unwrap();

    // Assert
    let mux = conf.get(Port(8080)).unwrap();
    assert_eq!(
        mux.file_routes().keys().collect::<Vec<_>>(),
        vec!["/web/static"]
    );
    assert_eq!(
        mux.spa_routes().keys().collect::<Vec<_>>(),
        vec!["/web", "/web/app/**"]
    );
    assert!(matches!(
        mux.routes(HandlerKind::Files)["/web/static"].inner(),
        Handler::Files(_)
    ));
}

#[test]
fn missing_document_root_is_rejected() {
    // Arrange
    let dir = tempdir().unwrap();
    let src = r#"
server "web" {
  files {
    document_root = "missing"
  }
}
"#;

    // Act
    let err = build_in(src, dir.path()).unwrap_err();

    // Assert
    assert!(matches!(err, ConfigError::InvalidDocumentRoot { .. }));
}

#[test]
fn spa_bootstrap_must_be_a_file() {
    // Arrange
    let dir = tempdir().unwrap();
    let src = r#"
server "web" {
  spa {
    bootstrap_file = "."
    paths = ["/"]
  }
}
"#;

    // Act
    let err = build_in(src, dir.path()).unwrap_err();

    // Assert
    assert!(matches!(err, ConfigError::InvalidBootstrapFile { .. }));
}

#[test]
fn explicit_hosts_register_host_prefixed_routes_per_port() {
    // Arrange
    let src = r#"
server "a" {
  hosts = ["*", "api.example.com:9090"]
  api {
    endpoint "/a" {
      backend {
        origin = "http://a"
      }
    }
  }
}

server "b" {
  hosts = ["other.example.com:9090"]
  api {
    endpoint "/a" {
      backend {
        origin = "http://b"
      }
    }
  }
}
"#;

    // Act
    let conf = build(src).unwrap();

    // Assert
    assert_eq!(conf.ports().collect::<Vec<_>>(), vec![Port(8080), Port(9090)]);
    let default = conf.get(Port(8080)).unwrap();
    assert!(default.endpoint_routes().contains_key("/a"));
    assert!(default.recognizes_host("anything.example.com"));

    let other = conf.get(Port(9090)).unwrap();
    assert_eq!(
        other.endpoint_routes().keys().collect::<Vec<_>>(),
        vec!["api.example.com:9090/a", "other.example.com:9090/a"]
    );
    assert!(other.recognizes_host("API.example.com"));
    assert!(!other.recognizes_host("unknown.example.com"));
}

#[test]
fn flag_port_replaces_document_default_port() {
    // Arrange
    let conf = load(
        r#"
server "a" {
  api {
    endpoint "/a" {
      backend {
        origin = "http://a"
      }
    }
  }
}
"#,
    );
    let http = HttpConfig::from_settings(&Settings::default()).with_port(Some(9999));

    // Act
    let built = new_server_configuration_in(&conf, &http, Path::new("/")).unwrap();

    // Assert
    assert_eq!(built.default_port(), Port(9999));
    assert!(built.get(Port(9999)).unwrap().endpoint_routes().contains_key("/a"));
    assert!(built.get(Port(8080)).is_none());
}

#[test]
fn summary_lists_routes_by_port() {
    // Arrange
    let src = r#"
server "api" {
  api {
    endpoint "/users" {
      backend = "users"
    }
  }
}

definitions {
  backend "users" {
    origin = "http://users:8080"
  }
}
"#;
    let conf = build(src).unwrap();

    // Act
    let summary = ConfigurationSummary::from(&conf);

    // Assert
    assert_eq!(summary.listen_port, Port(8080));
    assert_eq!(summary.ports.len(), 1);
    let route = &summary.ports[0].routes[0];
    assert_eq!(route.kind, HandlerKind::Api);
    assert_eq!(route.route, "/users");
    assert_eq!(route.backend.as_deref(), Some("users"));
    assert_eq!(route.target, "http://users:8080");
}
