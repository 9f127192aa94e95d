use integration_tests::harness::{TestWorkspace, captured_events};
use pretty_assertions::assert_eq;

#[test]
fn compiling_emits_configuration_built_event() {
    // Arrange
    let events = captured_events();
    let ws = TestWorkspace::from_fixture("gateway.hcl");

    // Act
    ws.compile().unwrap();

    // Assert
    let events = events.lock().unwrap();
    let built = events
        .iter()
        .find(|event| event.message() == Some("server configuration built"))
        .expect("no configuration event captured");

    assert_eq!(built.level, tracing::Level::INFO);
    assert_eq!(built.target, "switchyard_core::runtime::server");
    assert_eq!(built.field("ports"), Some("2"));
    assert_eq!(built.field("backends"), Some("1"));
    assert_eq!(built.field("access_controls"), Some("2"));
}

#[test]
fn compiling_logs_each_registered_route() {
    // Arrange
    let events = captured_events();
    let ws = TestWorkspace::from_fixture("gateway.hcl");

    // Act
    ws.compile().unwrap();

    // Assert
    let events = events.lock().unwrap();
    assert!(events.iter().any(|event| {
        event.message() == Some("route registered")
            && event.field("route") == Some("api.example.com:9090/api/v1/users")
    }));
}
