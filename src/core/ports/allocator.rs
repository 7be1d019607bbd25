use super::layout::PortLayout;
use super::store::PortStateStore;
use crate::core::errors::PortError;
use crate::core::surface::DiagramSurface;
use crate::core::types::{ConnectionId, ElementId, Port, PortId, Side};
use log::debug;

/// Creates and destroys ports, keeping the store and the rendered magnets in step
pub struct PortAllocator;

impl PortAllocator {
    /// Append a port to `side` and re-lay-out that side. Unknown elements are
    /// initialized on the fly.
    ///
    /// The new port is named `{side}_{n}` where `n` is the live count on the
    /// side. Indices are not tracked across removals, so a freed index can be
    /// handed out again; if the count-based name is still held by a survivor
    /// the next unused index is taken instead.
    pub fn add_port(
        store: &mut PortStateStore,
        surface: &mut dyn DiagramSurface,
        element_id: &ElementId,
        side: Side,
    ) -> PortId {
        let state = store.ensure_element(element_id);

        let mut index = state.side(side).len();
        let mut port_id = PortId::on_side(side, index);
        while state.contains(&port_id) {
            index += 1;
            port_id = PortId::on_side(side, index);
        }

        let ports = state.side_mut(side);
        ports.push(Port::new(port_id.clone(), side));
        PortLayout::relayout(ports);

        debug!("Added port '{}' to element '{}'", port_id, element_id);
        surface.ports_changed(element_id, side, ports);
        port_id
    }

    /// Remove a port, signalling destruction of its connection first.
    ///
    /// Returns the connection that was bound to the port, if any.
    pub fn remove_port(
        store: &mut PortStateStore,
        surface: &mut dyn DiagramSurface,
        element_id: &ElementId,
        port_id: &PortId,
    ) -> Result<Option<ConnectionId>, PortError> {
        let state = store
            .state_mut(element_id)
            .ok_or_else(|| PortError::UnknownElement(element_id.clone()))?;
        let port = state.get(port_id).ok_or_else(|| PortError::UnknownPort {
            element: element_id.clone(),
            port: port_id.clone(),
        })?;
        let side = port.side();
        let severed = if port.is_occupied() { port.link_id() } else { None };

        if let Some(connection_id) = severed {
            debug!(
                "Port '{}' on element '{}' is bound to {}, requesting its destruction",
                port_id, element_id, connection_id
            );
            surface.destroy_connection(connection_id);
        }

        let ports = state.side_mut(side);
        ports.retain(|port| port.id() != port_id);
        PortLayout::relayout(ports);

        debug!("Removed port '{}' from element '{}'", port_id, element_id);
        surface.ports_changed(element_id, side, ports);
        Ok(severed)
    }

    /// Remove every port of an element, signalling destruction of each bound
    /// connection. Returns the severed connections.
    pub fn remove_all_ports(
        store: &mut PortStateStore,
        surface: &mut dyn DiagramSurface,
        element_id: &ElementId,
    ) -> Vec<ConnectionId> {
        let Some(state) = store.state_mut(element_id) else {
            return Vec::new();
        };

        let mut severed: Vec<ConnectionId> = Vec::new();
        for link in state.ports().filter(|port| port.is_occupied()).filter_map(Port::link_id) {
            if !severed.contains(&link) {
                severed.push(link);
            }
        }
        for connection_id in &severed {
            surface.destroy_connection(*connection_id);
        }

        for side in Side::ALL {
            let ports = state.side_mut(side);
            if !ports.is_empty() {
                ports.clear();
                surface.ports_changed(element_id, side, ports);
            }
        }

        debug!(
            "Cleared all ports on element '{}' ({} connection(s) severed)",
            element_id,
            severed.len()
        );
        severed
    }
}
