use super::config::SessionConfig;
use super::connections::manager::ConnectionManager;
use super::connections::rules::{ConnectionRequest, ValidationRule};
use super::connections::validator::{ConnectionValidator, PortPair, ValidationResult};
use super::errors::PortError;
use super::ports::allocator::PortAllocator;
use super::ports::store::{PortState, PortStateStore};
use super::surface::DiagramSurface;
use super::types::{Bounds, Connection, ConnectionId, Element, ElementId, Port, PortId, Side};
use log::{debug, warn};
use std::collections::HashMap;

/// Port and connection model for one open diagram
///
/// Owns the port store, the validator and the connection records, and talks
/// back to the rendering side through a `DiagramSurface`. Every call completes
/// its mutation before returning, so the next UI event always sees a
/// consistent store.
pub struct EditorSession<S: DiagramSurface> {
    config: SessionConfig,
    store: PortStateStore,
    validator: ConnectionValidator,
    connections: ConnectionManager,
    bounds: HashMap<ElementId, Bounds>,
    surface: S,
}

impl<S: DiagramSurface> EditorSession<S> {
    /// Create a session with the default configuration
    pub fn new(surface: S) -> Self {
        Self::with_config(SessionConfig::default(), surface)
    }

    pub fn with_config(config: SessionConfig, surface: S) -> Self {
        let mut validator = ConnectionValidator::with_rules(&config.rules);
        validator.set_rejection_logging(config.log_rejections);
        Self {
            config,
            store: PortStateStore::new(),
            validator,
            connections: ConnectionManager::new(),
            bounds: HashMap::new(),
            surface,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &PortStateStore {
        &self.store
    }

    pub fn connections(&self) -> &ConnectionManager {
        &self.connections
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    // Registration hooks

    /// Register an element entering the diagram, or reset one already known.
    ///
    /// Connections still attached to a re-registered element are severed.
    /// Elements without predefined ports receive the configured default ports.
    pub fn init_element_ports(&mut self, element: &Element) -> &PortState {
        if self.store.contains_element(&element.id) {
            self.detach_element(&element.id);
        }
        let previous: Vec<Side> = Side::ALL
            .into_iter()
            .filter(|side| !self.store.get_ports_on_side(&element.id, *side).is_empty())
            .collect();
        self.bounds.insert(element.id.clone(), element.bounds);
        let state = self.store.init_element_ports(element);

        // Re-render every side that now has magnets or had them before the reset
        for side in Side::ALL {
            let ports = state.side(side);
            if !ports.is_empty() || previous.contains(&side) {
                self.surface.ports_changed(&element.id, side, ports);
            }
        }

        let defaults = self.config.default_ports;
        if element.ports.is_empty() && !defaults.is_empty() {
            for side in Side::ALL {
                for _ in 0..defaults.count(side) {
                    PortAllocator::add_port(
                        &mut self.store,
                        &mut self.surface,
                        &element.id,
                        side,
                    );
                }
            }
        }

        debug!(
            "Registered element '{}' with {} port(s)",
            element.id,
            self.store.port_count(&element.id)
        );
        self.store.ensure_element(&element.id)
    }

    /// Update the bounding box used for port geometry
    pub fn update_bounds(&mut self, element_id: &ElementId, bounds: Bounds) {
        self.bounds.insert(element_id.clone(), bounds);
    }

    /// Forget an element leaving the diagram, severing its connections
    pub fn remove_element(&mut self, element_id: &ElementId) -> bool {
        self.detach_element(element_id);
        self.bounds.remove(element_id);
        self.store.remove_element(element_id).is_some()
    }

    // Mutation hooks

    /// Record a connection the surface has committed
    pub fn on_connection_created(&mut self, connection: Connection) -> Result<(), PortError> {
        let id = connection.id;
        self.connections
            .on_connection_created(&mut self.store, connection)
            .map_err(|err| {
                warn!("Connection {} not recorded: {}", id, err);
                err
            })
    }

    /// Free the ports of a connection the surface has removed
    pub fn on_connection_destroyed(&mut self, connection: &Connection) {
        self.connections.on_connection_destroyed(&mut self.store, connection);
    }

    pub fn add_port(&mut self, element_id: &ElementId, side: Side) -> PortId {
        PortAllocator::add_port(&mut self.store, &mut self.surface, element_id, side)
    }

    /// Remove a port; its connection, if any, is destroyed first.
    /// Returns false if the port does not exist.
    pub fn remove_port(&mut self, element_id: &ElementId, port_id: &PortId) -> bool {
        match PortAllocator::remove_port(&mut self.store, &mut self.surface, element_id, port_id) {
            Ok(severed) => {
                if let Some(connection_id) = severed {
                    self.connections.release(&mut self.store, connection_id);
                }
                true
            }
            Err(err) => {
                warn!("remove_port ignored: {}", err);
                false
            }
        }
    }

    /// Remove every port of an element. Returns the severed connections.
    pub fn remove_all_ports(&mut self, element_id: &ElementId) -> Vec<ConnectionId> {
        let severed =
            PortAllocator::remove_all_ports(&mut self.store, &mut self.surface, element_id);
        for connection_id in &severed {
            self.connections.release(&mut self.store, *connection_id);
        }
        severed
    }

    // Query hooks

    pub fn get_free_ports(&self, element_id: &ElementId) -> Vec<&Port> {
        self.store.get_free_ports(element_id)
    }

    pub fn get_free_ports_on_side(&self, element_id: &ElementId, side: Side) -> Vec<&Port> {
        self.store.get_free_ports_on_side(element_id, side)
    }

    pub fn get_ports_on_side(&self, element_id: &ElementId, side: Side) -> &[Port] {
        self.store.get_ports_on_side(element_id, side)
    }

    pub fn is_port_available(&self, element_id: &ElementId, port_id: &PortId) -> bool {
        self.store.is_port_available(element_id, port_id)
    }

    /// Closest free port pair between two registered elements
    ///
    /// Geometry comes from the bounds given at registration. Elements created
    /// lazily through `add_port` have none until `update_bounds` is called,
    /// and yield `None` here.
    pub fn find_optimal_ports(&self, source: &ElementId, target: &ElementId) -> Option<PortPair> {
        let source_bounds = self.bounds_for(source)?;
        let target_bounds = self.bounds_for(target)?;
        ConnectionValidator::find_optimal_ports(
            &self.store,
            source,
            source_bounds,
            target,
            target_bounds,
        )
    }

    // Validation hook

    /// Validate a connect gesture against the recorded connections
    pub fn validate(&self, request: &ConnectionRequest) -> ValidationResult {
        self.validator
            .validate(&self.store, request, self.connections.connections())
    }

    /// Validate against a caller-supplied set of existing connections
    pub fn validate_against(
        &self,
        request: &ConnectionRequest,
        existing: &[Connection],
    ) -> ValidationResult {
        self.validator.validate(&self.store, request, existing)
    }

    pub fn add_rule(&mut self, rule: ValidationRule) {
        self.validator.add_rule(rule);
    }

    pub fn remove_rule(&mut self, name: &str) -> bool {
        self.validator.remove_rule(name)
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.validator.rule_names()
    }

    fn bounds_for(&self, element_id: &ElementId) -> Option<&Bounds> {
        let bounds = self.bounds.get(element_id);
        if bounds.is_none() && self.store.contains_element(element_id) {
            warn!(
                "Element '{}' has ports but no bounds; call update_bounds before port search",
                element_id
            );
        }
        bounds
    }

    /// Sever every recorded connection touching `element_id`
    fn detach_element(&mut self, element_id: &ElementId) {
        let attached: Vec<ConnectionId> = self
            .connections
            .connections_for_element(element_id)
            .into_iter()
            .map(|connection| connection.id)
            .collect();
        for connection_id in attached {
            self.surface.destroy_connection(connection_id);
            self.connections.release(&mut self.store, connection_id);
        }
    }
}
