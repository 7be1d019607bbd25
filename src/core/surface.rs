use super::types::{ConnectionId, ElementId, Port, Side};

/// Collaborator on the rendering side of the editor
///
/// The core never destroys connections or draws magnets itself; it asks the
/// surface to do so and keeps its own model consistent with the request.
pub trait DiagramSurface {
    /// Called before a port bound to `connection_id` is removed
    fn destroy_connection(&mut self, connection_id: ConnectionId);

    /// Called after the ports on `side` were added, removed or re-laid-out
    fn ports_changed(&mut self, _element_id: &ElementId, _side: Side, _ports: &[Port]) {}
}

/// Surface that ignores every signal, for headless use
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedSurface;

impl DiagramSurface for DetachedSurface {
    fn destroy_connection(&mut self, _connection_id: ConnectionId) {}
}
