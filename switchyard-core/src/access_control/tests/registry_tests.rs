use crate::access_control::{AccessControl, Source, configure_access_controls};
use crate::conf::types::{BasicAuthConfig, Definitions, JwtConfig, Origin};
use crate::conf::{ConfigError, EvalContext};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn jwt(name: &str) -> JwtConfig {
    JwtConfig {
        origin: Origin::test("definitions.jwt"),
        name: name.to_string(),
        signature_algorithm: "HS256".to_string(),
        key: "secret".to_string(),
        ..Default::default()
    }
}

fn basic_auth(name: &str) -> BasicAuthConfig {
    BasicAuthConfig {
        origin: Origin::test("definitions.basic_auth"),
        name: name.to_string(),
        user: "admin".to_string(),
        password: "pw".to_string(),
        ..Default::default()
    }
}

fn claims_expr(src: &str) -> hcl::Expression {
    let body: hcl::Body = hcl::parse(&format!("claims = {src}\n")).unwrap();
    body.attributes().next().unwrap().expr().clone()
}

#[test]
fn no_definitions_yields_empty_map() {
    // Act
    let map = configure_access_controls(None, &EvalContext::default(), Path::new("/")).unwrap();

    // Assert
    assert!(map.is_empty());
}

#[test]
fn registers_basic_auth_and_jwt() {
    // Arrange
    let definitions = Definitions {
        jwt: vec![jwt("token")],
        basic_auth: vec![basic_auth("ba")],
        ..Default::default()
    };

    // Act
    let map =
        configure_access_controls(Some(&definitions), &EvalContext::default(), Path::new("/"))
            .unwrap();

    // Assert
    assert_eq!(map.names().collect::<Vec<_>>(), vec!["ba", "token"]);
    assert_eq!(map.get("ba").unwrap().kind(), "basic_auth");
    assert_eq!(map.get("token").unwrap().kind(), "jwt");
}

#[test]
fn name_shared_by_basic_auth_and_jwt_is_rejected_on_jwt() {
    // Arrange
    let definitions = Definitions {
        jwt: vec![jwt("shared")],
        basic_auth: vec![basic_auth("shared")],
        ..Default::default()
    };

    // Act
    let err =
        configure_access_controls(Some(&definitions), &EvalContext::default(), Path::new("/"))
            .unwrap_err();

    // Assert
    assert!(matches!(
        err,
        ConfigError::DuplicateAccessControl { kind: "jwt", ref name } if name == "shared"
    ));
}

#[test]
fn empty_name_is_rejected() {
    // Arrange
    let definitions = Definitions {
        basic_auth: vec![basic_auth("")],
        ..Default::default()
    };

    // Act
    let err =
        configure_access_controls(Some(&definitions), &EvalContext::default(), Path::new("/"))
            .unwrap_err();

    // Assert
    assert!(matches!(
        err,
        ConfigError::MissingAccessControlLabel {
            kind: "basic_auth",
            ..
        }
    ));
}

#[test]
fn unknown_reference_is_not_found() {
    // Arrange
    let map = configure_access_controls(None, &EvalContext::default(), Path::new("/")).unwrap();

    // Act
    let err = map.get("missing").unwrap_err();

    // Assert
    assert_eq!(err.to_string(), "access control 'missing' not found");
}

#[test]
fn key_file_is_read_relative_to_working_directory() {
    // Arrange
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("hmac.key"), "file-secret").unwrap();
    let definitions = Definitions {
        jwt: vec![JwtConfig {
            key: String::new(),
            key_file: Some(PathBuf::from("hmac.key")),
            cookie: "session".to_string(),
            ..jwt("token")
        }],
        ..Default::default()
    };

    // Act
    let map = configure_access_controls(Some(&definitions), &EvalContext::default(), dir.path())
        .unwrap();

    // Assert
    let control = map.get("token").unwrap();
    let AccessControl::Jwt(jwt) = control.as_ref() else {
        panic!("expected jwt");
    };
    assert_eq!(jwt.source(), &Source::Cookie("session".to_string()));
}

#[test]
fn missing_key_file_is_io_error() {
    // Arrange
    let dir = tempdir().unwrap();
    let definitions = Definitions {
        jwt: vec![JwtConfig {
            key_file: Some(PathBuf::from("missing.key")),
            ..jwt("token")
        }],
        ..Default::default()
    };

    // Act
    let err = configure_access_controls(Some(&definitions), &EvalContext::default(), dir.path())
        .unwrap_err();

    // Assert
    assert!(matches!(err, ConfigError::ReadKeyFile { .. }));
}

#[test]
fn htpasswd_file_is_loaded() {
    // Arrange
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".htpasswd"), "alice:hash\n").unwrap();
    let definitions = Definitions {
        basic_auth: vec![BasicAuthConfig {
            htpasswd_file: Some(PathBuf::from(".htpasswd")),
            ..basic_auth("ba")
        }],
        ..Default::default()
    };

    // Act
    let map = configure_access_controls(Some(&definitions), &EvalContext::default(), dir.path())
        .unwrap();

    // Assert
    let control = map.get("ba").unwrap();
    let AccessControl::BasicAuth(ba) = control.as_ref() else {
        panic!("expected basic auth");
    };
    assert_eq!(ba.htpasswd().get("alice").map(String::as_str), Some("hash"));
}

#[test]
fn claims_are_evaluated_against_the_context() {
    // Arrange
    let ctx = EvalContext::new([("ISSUER", "https://issuer.example")]);
    let definitions = Definitions {
        jwt: vec![JwtConfig {
            claims: Some(claims_expr("{ iss = env.ISSUER, aud = \"gateway\" }")),
            ..jwt("token")
        }],
        ..Default::default()
    };

    // Act
    let map = configure_access_controls(Some(&definitions), &ctx, Path::new("/")).unwrap();

    // Assert
    let control = map.get("token").unwrap();
    let AccessControl::Jwt(jwt) = control.as_ref() else {
        panic!("expected jwt");
    };
    assert_eq!(jwt.claims()["iss"], "https://issuer.example");
    assert_eq!(jwt.claims()["aud"], "gateway");
}

#[test]
fn non_object_claims_are_malformed() {
    // Arrange
    let definitions = Definitions {
        jwt: vec![JwtConfig {
            claims: Some(claims_expr("[\"a\"]")),
            ..jwt("token")
        }],
        ..Default::default()
    };

    // Act
    let err =
        configure_access_controls(Some(&definitions), &EvalContext::default(), Path::new("/"))
            .unwrap_err();

    // Assert
    assert!(matches!(err, ConfigError::MalformedClaims { .. }));
}
