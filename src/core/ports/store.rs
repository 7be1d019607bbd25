use super::layout::PortLayout;
use crate::core::errors::PortError;
use crate::core::types::{ConnectionId, Element, ElementId, Port, PortId, Side};
use log::{trace, warn};
use serde::Serialize;
use std::collections::HashMap;

/// Ports of one element, grouped by side in placement order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PortState {
    top: Vec<Port>,
    right: Vec<Port>,
    bottom: Vec<Port>,
    left: Vec<Port>,
}

impl PortState {
    /// Empty four-side record
    pub fn new() -> Self {
        Self::default()
    }

    pub fn side(&self, side: Side) -> &[Port] {
        match side {
            Side::Top => &self.top,
            Side::Right => &self.right,
            Side::Bottom => &self.bottom,
            Side::Left => &self.left,
        }
    }

    pub(crate) fn side_mut(&mut self, side: Side) -> &mut Vec<Port> {
        match side {
            Side::Top => &mut self.top,
            Side::Right => &mut self.right,
            Side::Bottom => &mut self.bottom,
            Side::Left => &mut self.left,
        }
    }

    /// All ports, sides in canonical order
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        Side::ALL.into_iter().flat_map(move |side| self.side(side).iter())
    }

    pub fn get(&self, port_id: &PortId) -> Option<&Port> {
        self.ports().find(|port| &port.id == port_id)
    }

    pub(crate) fn get_mut(&mut self, port_id: &PortId) -> Option<&mut Port> {
        let side = self.get(port_id)?.side;
        self.side_mut(side).iter_mut().find(|port| &port.id == port_id)
    }

    pub fn contains(&self, port_id: &PortId) -> bool {
        self.get(port_id).is_some()
    }

    pub fn len(&self) -> usize {
        Side::ALL.iter().map(|side| self.side(*side).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-element port occupancy, owned by the editor session
#[derive(Debug, Default)]
pub struct PortStateStore {
    elements: HashMap<ElementId, PortState>,
}

impl PortStateStore {
    pub fn new() -> Self {
        Self {
            elements: HashMap::new(),
        }
    }

    /// Build a fresh record for `element`, importing its predefined ports as free.
    /// Replaces any prior state held for the same ID.
    pub fn init_element_ports(&mut self, element: &Element) -> &PortState {
        let mut state = PortState::new();

        for port_id in &element.ports {
            let Some(side) = port_id.parse_side() else {
                let err = PortError::MalformedPortId(port_id.clone());
                warn!("Skipping port on element '{}': {}", element.id, err);
                continue;
            };
            if state.contains(port_id) {
                warn!("Skipping duplicate port '{}' on element '{}'", port_id, element.id);
                continue;
            }
            state.side_mut(side).push(Port::new(port_id.clone(), side));
        }

        for side in Side::ALL {
            PortLayout::relayout(state.side_mut(side));
        }

        trace!(
            "Initialized {} port(s) for element '{}'",
            state.len(),
            element.id
        );
        self.elements.insert(element.id.clone(), state);
        &self.elements[&element.id]
    }

    /// State for `element_id`, creating an empty record on first reference
    pub(crate) fn ensure_element(&mut self, element_id: &ElementId) -> &mut PortState {
        self.elements.entry(element_id.clone()).or_insert_with(|| {
            trace!("Lazily initialized port state for element '{}'", element_id);
            PortState::new()
        })
    }

    pub(crate) fn state_mut(&mut self, element_id: &ElementId) -> Option<&mut PortState> {
        self.elements.get_mut(element_id)
    }

    pub fn state(&self, element_id: &ElementId) -> Option<&PortState> {
        self.elements.get(element_id)
    }

    pub fn contains_element(&self, element_id: &ElementId) -> bool {
        self.elements.contains_key(element_id)
    }

    pub fn element_ids(&self) -> Vec<&ElementId> {
        self.elements.keys().collect()
    }

    /// Ports on one side, empty for unknown elements
    pub fn get_ports_on_side(&self, element_id: &ElementId, side: Side) -> &[Port] {
        self.elements
            .get(element_id)
            .map(|state| state.side(side))
            .unwrap_or(&[])
    }

    pub fn get_port(&self, element_id: &ElementId, port_id: &PortId) -> Option<&Port> {
        self.elements.get(element_id)?.get(port_id)
    }

    pub fn get_all_ports(&self, element_id: &ElementId) -> Vec<&Port> {
        self.elements
            .get(element_id)
            .map(|state| state.ports().collect())
            .unwrap_or_default()
    }

    pub fn get_free_ports(&self, element_id: &ElementId) -> Vec<&Port> {
        self.get_all_ports(element_id)
            .into_iter()
            .filter(|port| !port.occupied)
            .collect()
    }

    pub fn get_free_ports_on_side(&self, element_id: &ElementId, side: Side) -> Vec<&Port> {
        self.get_ports_on_side(element_id, side)
            .iter()
            .filter(|port| !port.occupied)
            .collect()
    }

    pub fn get_occupied_ports(&self, element_id: &ElementId) -> Vec<&Port> {
        self.get_all_ports(element_id)
            .into_iter()
            .filter(|port| port.occupied)
            .collect()
    }

    pub fn port_count(&self, element_id: &ElementId) -> usize {
        self.elements.get(element_id).map_or(0, PortState::len)
    }

    /// True iff the port exists and is unoccupied
    pub fn is_port_available(&self, element_id: &ElementId, port_id: &PortId) -> bool {
        self.get_port(element_id, port_id)
            .map_or(false, |port| !port.occupied)
    }

    /// Bind a port to a connection
    pub fn occupy_port(
        &mut self,
        element_id: &ElementId,
        port_id: &PortId,
        connection_id: ConnectionId,
    ) -> Result<(), PortError> {
        let port = self.port_mut(element_id, port_id)?;
        if let Some(previous) = port.link_id {
            if previous != connection_id {
                warn!(
                    "Port '{}' on element '{}' relinked from {} to {}",
                    port_id, element_id, previous, connection_id
                );
            }
        }
        port.occupied = true;
        port.link_id = Some(connection_id);
        trace!("Occupied {}.{} with {}", element_id, port_id, connection_id);
        Ok(())
    }

    /// Release a port and clear its link
    pub fn free_port(&mut self, element_id: &ElementId, port_id: &PortId) -> Result<(), PortError> {
        let port = self.port_mut(element_id, port_id)?;
        port.occupied = false;
        port.link_id = None;
        trace!("Freed {}.{}", element_id, port_id);
        Ok(())
    }

    /// Drop all state for an element leaving the diagram
    pub fn remove_element(&mut self, element_id: &ElementId) -> Option<PortState> {
        let removed = self.elements.remove(element_id);
        if removed.is_some() {
            trace!("Removed port state for element '{}'", element_id);
        }
        removed
    }

    fn port_mut(
        &mut self,
        element_id: &ElementId,
        port_id: &PortId,
    ) -> Result<&mut Port, PortError> {
        let state = self
            .elements
            .get_mut(element_id)
            .ok_or_else(|| PortError::UnknownElement(element_id.clone()))?;
        state.get_mut(port_id).ok_or_else(|| PortError::UnknownPort {
            element: element_id.clone(),
            port: port_id.clone(),
        })
    }
}
