use crate::core::errors::PortError;
use crate::core::ports::store::PortStateStore;
use crate::core::types::{Connection, ConnectionId, ElementId, Endpoint};
use log::{debug, trace};
use std::collections::HashSet;

/// Live connections the surface has committed, mirrored into port occupancy
pub struct ConnectionManager {
    /// Committed connections in creation order
    connections: Vec<Connection>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Vec::new(),
        }
    }

    /// Occupy both endpoint ports for a newly committed connection.
    ///
    /// Either both ports are occupied or neither is.
    pub fn on_connection_created(
        &mut self,
        store: &mut PortStateStore,
        connection: Connection,
    ) -> Result<(), PortError> {
        Self::check_free(store, &connection.source)?;
        Self::check_free(store, &connection.target)?;

        store.occupy_port(
            &connection.source.element_id,
            &connection.source.port_id,
            connection.id,
        )?;
        store.occupy_port(
            &connection.target.element_id,
            &connection.target.port_id,
            connection.id,
        )?;

        debug!(
            "Connection {} created: {}.{} -> {}.{}",
            connection.id,
            connection.source.element_id,
            connection.source.port_id,
            connection.target.element_id,
            connection.target.port_id
        );
        self.connections.push(connection);
        Ok(())
    }

    /// Free the endpoints of a connection the surface has removed
    pub fn on_connection_destroyed(
        &mut self,
        store: &mut PortStateStore,
        connection: &Connection,
    ) -> Option<Connection> {
        Self::release_endpoint(store, &connection.source, connection.id);
        Self::release_endpoint(store, &connection.target, connection.id);
        let removed = self.take(connection.id);
        debug!("Connection {} destroyed", connection.id);
        removed
    }

    /// Forget a recorded connection by ID and free whatever endpoints remain
    pub fn release(
        &mut self,
        store: &mut PortStateStore,
        connection_id: ConnectionId,
    ) -> Option<Connection> {
        let connection = self.take(connection_id)?;
        Self::release_endpoint(store, &connection.source, connection_id);
        Self::release_endpoint(store, &connection.target, connection_id);
        Some(connection)
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn get(&self, connection_id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|connection| connection.id == connection_id)
    }

    pub fn connections_for_element(&self, element_id: &ElementId) -> Vec<&Connection> {
        self.connections
            .iter()
            .filter(|connection| connection.involves_element(element_id))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Get connection statistics
    pub fn stats(&self) -> ConnectionStats {
        let linked: HashSet<&ElementId> = self
            .connections
            .iter()
            .flat_map(|connection| [&connection.source.element_id, &connection.target.element_id])
            .collect();
        ConnectionStats {
            connections: self.connections.len(),
            linked_elements: linked.len(),
        }
    }

    fn take(&mut self, connection_id: ConnectionId) -> Option<Connection> {
        let index = self
            .connections
            .iter()
            .position(|connection| connection.id == connection_id)?;
        Some(self.connections.remove(index))
    }

    fn check_free(store: &PortStateStore, endpoint: &Endpoint) -> Result<(), PortError> {
        match store.get_port(&endpoint.element_id, &endpoint.port_id) {
            Some(port) if port.is_occupied() => Err(PortError::PortOccupied {
                element: endpoint.element_id.clone(),
                port: endpoint.port_id.clone(),
            }),
            Some(_) => Ok(()),
            None if store.contains_element(&endpoint.element_id) => Err(PortError::UnknownPort {
                element: endpoint.element_id.clone(),
                port: endpoint.port_id.clone(),
            }),
            None => Err(PortError::UnknownElement(endpoint.element_id.clone())),
        }
    }

    /// Free a port only while it is still bound to `connection_id`
    fn release_endpoint(
        store: &mut PortStateStore,
        endpoint: &Endpoint,
        connection_id: ConnectionId,
    ) {
        let bound = store
            .get_port(&endpoint.element_id, &endpoint.port_id)
            .map_or(false, |port| port.link_id() == Some(connection_id));
        if !bound {
            trace!(
                "Endpoint {}.{} no longer bound to {}",
                endpoint.element_id,
                endpoint.port_id,
                connection_id
            );
            return;
        }
        if let Err(err) = store.free_port(&endpoint.element_id, &endpoint.port_id) {
            trace!("Could not free {}.{}: {}", endpoint.element_id, endpoint.port_id, err);
        }
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Connection statistics for debugging
#[derive(Debug, PartialEq, Eq)]
pub struct ConnectionStats {
    pub connections: usize,
    pub linked_elements: usize,
}
