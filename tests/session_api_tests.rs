use portweave::core::types::Port;
use portweave::{
    Bounds, Connection, ConnectionId, ConnectionRequest, DefaultPorts, DetachedSurface,
    DiagramSurface, EditorSession, Element, ElementId, PortId, ReasonCode, RuleError,
    SessionConfig, Side, ValidationRule,
};

/// Surface that remembers destroyed connections and the last magnets per side
#[derive(Default)]
struct Canvas {
    destroyed: Vec<ConnectionId>,
    magnets: Vec<(ElementId, Side, usize)>,
}

impl DiagramSurface for Canvas {
    fn destroy_connection(&mut self, connection_id: ConnectionId) {
        self.destroyed.push(connection_id);
    }

    fn ports_changed(&mut self, element_id: &ElementId, side: Side, ports: &[Port]) {
        self.magnets.push((element_id.clone(), side, ports.len()));
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn session_with_pair() -> EditorSession<Canvas> {
    let mut session = EditorSession::new(Canvas::default());
    session.init_element_ports(
        &Element::new("A", Bounds::new(0.0, 0.0, 120.0, 80.0)).with_ports(["top_0", "right_0"]),
    );
    session.init_element_ports(
        &Element::new("B", Bounds::new(300.0, 0.0, 120.0, 80.0)).with_ports(["left_0", "top_0"]),
    );
    session
}

fn connect(session: &mut EditorSession<Canvas>, request: &ConnectionRequest) -> Connection {
    let result = session.validate(request);
    assert!(result.is_valid(), "unexpected rejection: {:?}", result.reason);
    let (source, target) = request.endpoints().unwrap();
    let connection = Connection::new(source, target);
    session.on_connection_created(connection.clone()).unwrap();
    connection
}

#[test]
fn test_register_then_all_ports_free() {
    init_logging();
    let session = session_with_pair();

    let free = session.get_free_ports(&ElementId::new("A"));
    assert_eq!(free.len(), 2);
    assert!(free.iter().all(|port| !port.is_occupied()));
}

#[test]
fn test_connect_gesture_round_trip() {
    init_logging();
    let mut session = session_with_pair();
    let request = ConnectionRequest::new("A", "right_0", "B", "left_0");

    let connection = connect(&mut session, &request);
    assert!(!session.is_port_available(&ElementId::new("A"), &PortId::new("right_0")));

    let again = session.validate(&request);
    assert_eq!(again.reason, Some(ReasonCode::PortAvailable));

    session.on_connection_destroyed(&connection);
    assert!(session.is_port_available(&ElementId::new("A"), &PortId::new("right_0")));
    assert!(session.is_port_available(&ElementId::new("B"), &PortId::new("left_0")));
    assert!(session.validate(&request).is_valid());
}

#[test]
fn test_duplicate_detected_against_recorded_connections() {
    init_logging();
    let mut session = session_with_pair();
    let existing = vec![Connection::new(
        ElementId::new("A").port("top_0"),
        ElementId::new("B").port("left_0"),
    )];

    let request = ConnectionRequest::new("B", "left_0", "A", "top_0");
    let result = session.validate_against(&request, &existing);
    assert_eq!(result.reason, Some(ReasonCode::NoDuplicateConnection));

    // Same pair recorded by the session itself, with port checks disabled
    assert!(session.remove_rule("port-available"));
    connect(&mut session, &ConnectionRequest::new("A", "top_0", "B", "left_0"));
    let result = session.validate(&ConnectionRequest::new("A", "top_0", "B", "left_0"));
    assert_eq!(result.reason, Some(ReasonCode::NoDuplicateConnection));
}

#[test]
fn test_remove_occupied_port_frees_far_end() {
    init_logging();
    let mut session = session_with_pair();
    let connection = connect(&mut session, &ConnectionRequest::new("A", "right_0", "B", "left_0"));

    assert!(session.remove_port(&ElementId::new("A"), &PortId::new("right_0")));

    assert_eq!(session.surface().destroyed, vec![connection.id]);
    assert!(session.get_ports_on_side(&ElementId::new("A"), Side::Right).is_empty());
    assert!(session.is_port_available(&ElementId::new("B"), &PortId::new("left_0")));
    assert!(session.connections().is_empty());
}

#[test]
fn test_remove_missing_port_returns_false() {
    let mut session = session_with_pair();
    assert!(!session.remove_port(&ElementId::new("A"), &PortId::new("bottom_3")));
    assert!(!session.remove_port(&ElementId::new("nope"), &PortId::new("top_0")));
}

#[test]
fn test_remove_element_severs_connections() {
    init_logging();
    let mut session = session_with_pair();
    let connection = connect(&mut session, &ConnectionRequest::new("A", "right_0", "B", "left_0"));

    assert!(session.remove_element(&ElementId::new("A")));

    assert_eq!(session.surface().destroyed, vec![connection.id]);
    assert!(session.is_port_available(&ElementId::new("B"), &PortId::new("left_0")));
    assert!(session.get_free_ports(&ElementId::new("A")).is_empty());
    assert!(session.find_optimal_ports(&ElementId::new("A"), &ElementId::new("B")).is_none());
    assert!(!session.remove_element(&ElementId::new("A")));
}

#[test]
fn test_reregistering_resets_to_clean_state() {
    let mut session = session_with_pair();
    connect(&mut session, &ConnectionRequest::new("A", "top_0", "B", "top_0"));

    let element =
        Element::new("A", Bounds::new(0.0, 0.0, 120.0, 80.0)).with_ports(["top_0", "right_0"]);
    let first = session.init_element_ports(&element).clone();
    let second = session.init_element_ports(&element).clone();

    assert_eq!(first, second);
    assert_eq!(session.get_free_ports(&ElementId::new("A")).len(), 2);
    assert!(session.is_port_available(&ElementId::new("B"), &PortId::new("top_0")));
    assert_eq!(session.surface().destroyed.len(), 1);
}

#[test]
fn test_default_ports_from_config() {
    let config = SessionConfig::new().with_default_ports(DefaultPorts {
        top: 1,
        right: 2,
        bottom: 0,
        left: 3,
    });
    let mut session = EditorSession::with_config(config, Canvas::default());
    session.init_element_ports(&Element::new("N", Bounds::new(0.0, 0.0, 60.0, 60.0)));

    let id = ElementId::new("N");
    assert_eq!(session.get_ports_on_side(&id, Side::Top).len(), 1);
    assert_eq!(session.get_ports_on_side(&id, Side::Right).len(), 2);
    assert!(session.get_ports_on_side(&id, Side::Bottom).is_empty());
    let left: Vec<&str> = session
        .get_ports_on_side(&id, Side::Left)
        .iter()
        .map(|port| port.id().id())
        .collect();
    assert_eq!(left, vec!["left_0", "left_1", "left_2"]);
    assert_eq!(session.surface().magnets.last(), Some(&(id, Side::Left, 3)));
}

#[test]
fn test_added_ports_are_offered_by_optimal_search() {
    let mut session = EditorSession::new(DetachedSurface);
    session.init_element_ports(&Element::new("A", Bounds::new(0.0, 0.0, 100.0, 100.0)));
    session.init_element_ports(&Element::new("B", Bounds::new(0.0, 400.0, 100.0, 100.0)));
    let a = ElementId::new("A");
    let b = ElementId::new("B");

    assert!(session.find_optimal_ports(&a, &b).is_none());

    session.add_port(&a, Side::Bottom);
    session.add_port(&a, Side::Top);
    session.add_port(&b, Side::Top);
    session.add_port(&b, Side::Left);

    let pair = session.find_optimal_ports(&a, &b).unwrap();
    assert_eq!(pair.source.id(), "bottom_0");
    assert_eq!(pair.target.id(), "top_0");
    assert!((pair.distance - 300.0).abs() < 1e-9);

    session.update_bounds(&b, Bounds::new(400.0, 0.0, 100.0, 100.0));
    session.add_port(&a, Side::Right);
    let pair = session.find_optimal_ports(&a, &b).unwrap();
    assert_eq!(pair.source.id(), "right_0");
    assert_eq!(pair.target.id(), "left_0");
}

#[test]
fn test_custom_rule_fault_declines_without_mutation() {
    init_logging();
    let mut session = session_with_pair();
    session.add_rule(ValidationRule::custom("quota", |_request, _ctx| {
        Err(RuleError::new("quota", "quota service unavailable"))
    }));

    let result = session.validate(&ConnectionRequest::new("A", "right_0", "B", "left_0"));
    assert!(!result.valid);
    assert_eq!(result.reason, Some(ReasonCode::ValidationError));
    assert_eq!(session.get_free_ports(&ElementId::new("A")).len(), 2);
    assert!(session.rule_names().contains(&"quota"));
}

#[test]
fn test_validation_result_serializes_reason_code() {
    let session = session_with_pair();
    let result = session.validate(&ConnectionRequest::new("A", "top_0", "A", "right_0"));

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["valid"], serde_json::json!(false));
    assert_eq!(json["reason"], serde_json::json!("no-self-connection"));
}

#[test]
fn test_port_state_snapshot_lists_sides() {
    let session = session_with_pair();
    let state = session.store().state(&ElementId::new("B")).unwrap();

    let json = serde_json::to_value(state).unwrap();
    assert_eq!(json["left"][0]["id"], serde_json::json!("left_0"));
    assert_eq!(json["left"][0]["occupied"], serde_json::json!(false));
    assert_eq!(json["left"][0]["offset"], serde_json::json!(0.5));
    assert_eq!(json["bottom"], serde_json::json!([]));
}

#[test]
fn test_registration_renders_imported_magnets() {
    let mut session = EditorSession::new(Canvas::default());
    let a = ElementId::new("A");
    let bounds = Bounds::new(0.0, 0.0, 80.0, 80.0);

    let imported = Element::new("A", bounds).with_ports(["top_0", "top_1", "left_0"]);
    session.init_element_ports(&imported);
    assert_eq!(
        session.surface().magnets,
        vec![(a.clone(), Side::Top, 2), (a.clone(), Side::Left, 1)]
    );

    session.surface_mut().magnets.clear();
    session.init_element_ports(&Element::new("A", bounds).with_ports(["right_0"]));
    assert_eq!(
        session.surface().magnets,
        vec![
            (a.clone(), Side::Top, 0),
            (a.clone(), Side::Right, 1),
            (a, Side::Left, 0),
        ]
    );
}

#[test]
fn test_remove_all_ports_frees_far_end() {
    init_logging();
    let mut session = session_with_pair();
    let connection = connect(&mut session, &ConnectionRequest::new("A", "top_0", "B", "left_0"));

    let severed = session.remove_all_ports(&ElementId::new("A"));

    assert_eq!(severed, vec![connection.id]);
    assert_eq!(session.surface().destroyed, vec![connection.id]);
    assert!(session.is_port_available(&ElementId::new("B"), &PortId::new("left_0")));
    assert!(session.connections().is_empty());
    assert!(session.get_free_ports(&ElementId::new("A")).is_empty());
}

#[test]
fn test_optimal_search_needs_bounds_for_lazy_elements() {
    let mut session = session_with_pair();
    let x = ElementId::new("X");
    let b = ElementId::new("B");
    session.add_port(&x, Side::Right);

    assert!(session.find_optimal_ports(&x, &b).is_none());

    session.update_bounds(&x, Bounds::new(0.0, 200.0, 100.0, 100.0));
    let pair = session.find_optimal_ports(&x, &b).unwrap();
    assert_eq!(pair.source.id(), "right_0");
}
