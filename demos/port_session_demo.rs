use log::info;
use portweave::{
    Bounds, Connection, ConnectionRequest, DefaultPorts, DetachedSurface, EditorSession, Element,
    ElementId, SessionConfig, Side,
};

fn main() {
    env_logger::init();

    let config = SessionConfig::new().with_default_ports(DefaultPorts::uniform(1));
    let mut session = EditorSession::with_config(config, DetachedSurface);

    session.init_element_ports(&Element::new("start", Bounds::new(0.0, 0.0, 120.0, 60.0)));
    session.init_element_ports(&Element::new("decide", Bounds::new(0.0, 200.0, 120.0, 60.0)));
    let start = ElementId::new("start");
    let decide = ElementId::new("decide");

    session.add_port(&start, Side::Bottom);
    info!(
        "start has {} free port(s), decide has {}",
        session.get_free_ports(&start).len(),
        session.get_free_ports(&decide).len()
    );

    let Some(pair) = session.find_optimal_ports(&start, &decide) else {
        info!("No free port pair");
        return;
    };
    info!("Closest pair: {} -> {} ({:.1})", pair.source, pair.target, pair.distance);

    let request = ConnectionRequest::new(
        start.clone(),
        pair.source.clone(),
        decide.clone(),
        pair.target.clone(),
    );
    let result = session.validate(&request);
    if !result.is_valid() {
        info!("Connection declined: {:?}", result.reason);
        return;
    }

    // Commit only what the validator accepted
    if let Some((source, target)) = request.endpoints() {
        if let Err(err) = session.on_connection_created(Connection::new(source, target)) {
            info!("Connection refused: {}", err);
        }
    }

    let retry = session.validate(&request);
    info!("Second attempt on the same ports: {:?}", retry.reason);

    session.remove_port(&start, &pair.source);
    info!(
        "After removing {}: {} connection(s) left, {} port(s) on start's bottom side",
        pair.source,
        session.connections().stats().connections,
        session.get_ports_on_side(&start, Side::Bottom).len()
    );
}
