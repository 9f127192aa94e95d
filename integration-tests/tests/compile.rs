use integration_tests::harness::TestWorkspace;
use pretty_assertions::assert_eq;
use std::time::Duration;
use switchyard_core::conf::ConfigError;
use switchyard_core::handler::Handler;
use switchyard_core::runtime::{HandlerKind, Port};

#[test]
fn fixture_compiles_into_routes_per_port() {
    // Arrange
    let ws = TestWorkspace::from_fixture("gateway.hcl");

    // Act
    let conf = ws.compile().unwrap();

    // Assert
    let ports: Vec<Port> = conf.ports().collect();
    assert_eq!(ports, vec![Port(8080), Port(9090)]);

    let main = conf.get(Port(8080)).unwrap();
    let api: Vec<&str> = main.endpoint_routes().keys().map(String::as_str).collect();
    assert_eq!(
        api,
        vec![
            "/api/v1/health",
            "/api/v1/users",
            "/api/v1/users/{id}",
            "admin.example.com:8080/admin/users",
        ]
    );
    assert!(main.recognizes_host("admin.example.com"));

    let api_host = conf.get(Port(9090)).unwrap();
    assert!(
        api_host
            .endpoint_routes()
            .contains_key("api.example.com:9090/api/v1/users")
    );
}

#[test]
fn named_backend_reference_uses_definition_and_settings() {
    // Arrange
    let ws = TestWorkspace::from_fixture("gateway.hcl");

    // Act
    let conf = ws.compile().unwrap();

    // Assert
    let route = &conf.get(Port(8080)).unwrap().endpoint_routes()["/api/v1/users"];
    let proxy = route.proxy().unwrap();
    assert_eq!(proxy.backend_name, "users");
    assert_eq!(proxy.origin, "http://users:8080");
    assert_eq!(proxy.connect_timeout, Duration::from_secs(5));
    assert_eq!(proxy.ttfb_timeout, Duration::from_secs(30));
    assert!(proxy.cors.allows_origin("https://app.example.com"));
    assert_eq!(route.access_control_names(), vec!["token"]);
}

#[test]
fn labeled_inline_backend_refines_the_definition() {
    // Arrange
    let ws = TestWorkspace::from_fixture("gateway.hcl");

    // Act
    let conf = ws.compile().unwrap();

    // Assert
    let route = &conf.get(Port(8080)).unwrap().endpoint_routes()["/api/v1/users/{id}"];
    let proxy = route.proxy().unwrap();
    assert_eq!(proxy.origin, "http://users:8080");
    assert_eq!(proxy.path, "/internal/users/{id}");
    assert_eq!(proxy.connect_timeout, Duration::from_secs(5));
}

#[test]
fn endpoint_can_disable_inherited_access_control() {
    // Arrange
    let ws = TestWorkspace::from_fixture("gateway.hcl");

    // Act
    let conf = ws.compile().unwrap();

    // Assert
    let route = &conf.get(Port(8080)).unwrap().endpoint_routes()["/api/v1/health"];
    assert!(!route.is_protected());
    let proxy = route.proxy().unwrap();
    assert_eq!(proxy.origin, "http://health:8081");
    assert_eq!(proxy.timeout, Duration::from_secs(2));
}

#[test]
fn api_backend_applies_to_endpoints_without_their_own() {
    // Arrange
    let ws = TestWorkspace::from_fixture("gateway.hcl");

    // Act
    let conf = ws.compile().unwrap();

    // Assert
    let route = &conf.get(Port(8080)).unwrap().endpoint_routes()["admin.example.com:8080/admin/users"];
    assert_eq!(route.proxy().unwrap().origin, "http://users:8080");
    assert_eq!(route.access_control_names(), vec!["ba"]);
}

#[test]
fn files_and_spa_routes_resolve_against_workspace() {
    // Arrange
    let ws = TestWorkspace::from_fixture("gateway.hcl");

    // Act
    let conf = ws.compile().unwrap();

    // Assert
    let main = conf.get(Port(8080)).unwrap();

    let files = &main.file_routes()["/static"];
    let Handler::Files(files) = files.inner() else {
        panic!("expected files handler");
    };
    assert_eq!(files.document_root(), ws.path().join("public"));

    let spa: Vec<&str> = main.spa_routes().keys().map(String::as_str).collect();
    assert_eq!(spa, vec!["/app", "/app/**"]);
}

#[test]
fn inline_backend_without_origin_is_rejected() {
    // Arrange
    let ws = TestWorkspace::new();
    let src = r#"
server "s" {
  api {
    endpoint "/x" {
      backend {
        timeout = "1s"
      }
    }
  }
}
"#;

    // Act
    let err = ws.compile_str(src).unwrap_err();

    // Assert
    assert!(matches!(err, ConfigError::RequiresOrigin { .. }));
    assert!(err.to_string().contains("requires an origin attribute"));
}

#[test]
fn endpoint_without_backend_is_rejected() {
    // Arrange
    let ws = TestWorkspace::new();
    let src = r#"
server "s" {
  api {
    endpoint "/x" {}
  }
}
"#;

    // Act
    let err = ws.compile_str(src).unwrap_err();

    // Assert
    assert!(matches!(err, ConfigError::MissingBackend { .. }));
}

#[test]
fn servers_sharing_a_host_and_port_conflict() {
    // Arrange
    let ws = TestWorkspace::new();
    let src = r#"
server "a" {
  hosts = ["example.com:8080"]
}

server "b" {
  hosts = ["example.com"]
}
"#;

    // Act
    let err = ws.compile_str(src).unwrap_err();

    // Assert
    assert!(matches!(err, ConfigError::DuplicateHostPort { port: 8080, .. }));
}

#[test]
fn missing_document_root_is_rejected() {
    // Arrange
    let ws = TestWorkspace::new();
    let src = r#"
server "s" {
  files {
    document_root = "missing"
  }
}
"#;

    // Act
    let err = ws.compile_str(src).unwrap_err();

    // Assert
    assert!(matches!(err, ConfigError::InvalidDocumentRoot { .. }));
}

#[test]
fn environment_port_overrides_document_and_flag() {
    // Arrange
    let ws = TestWorkspace::from_fixture("gateway.hcl").with_env("SWITCHYARD_PORT", "7070");

    // Act
    let conf = ws.compile_with_port(Some(6060)).unwrap();

    // Assert
    assert_eq!(conf.default_port(), Port(7070));
    assert!(conf.get(Port(7070)).unwrap().routes(HandlerKind::Api).contains_key("/api/v1/users"));
    assert!(conf.get(Port(8080)).is_none());
}

#[test]
fn flag_port_overrides_document() {
    // Arrange
    let ws = TestWorkspace::from_fixture("gateway.hcl");

    // Act
    let conf = ws.compile_with_port(Some(6060)).unwrap();

    // Assert
    assert_eq!(conf.default_port(), Port(6060));
    assert_eq!(conf.http().listen_port, 6060);
}

#[test]
fn invalid_environment_port_is_rejected() {
    // Arrange
    let ws = TestWorkspace::from_fixture("gateway.hcl").with_env("SWITCHYARD_PORT", "http");

    // Act
    let err = ws.compile().unwrap_err();

    // Assert
    assert!(matches!(err, ConfigError::InvalidEnv { .. }));
}

#[test]
fn forwarded_host_flag_comes_from_environment() {
    // Arrange
    let ws = TestWorkspace::from_fixture("gateway.hcl").with_env("SWITCHYARD_XFH", "true");

    // Act
    let conf = ws.compile().unwrap();

    // Assert
    assert!(conf.http().use_xfh);
}
