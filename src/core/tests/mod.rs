
use crate::core::surface::DiagramSurface;
use crate::core::types::{ConnectionId, ElementId, Port, PortId, Side};

/// Signals received from the core, in arrival order
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SurfaceSignal {
    Destroy(ConnectionId),
    PortsChanged(ElementId, Side, Vec<PortId>),
}

/// Surface that records everything it is told
#[derive(Debug, Default)]
pub(crate) struct RecordingSurface {
    pub signals: Vec<SurfaceSignal>,
}

impl RecordingSurface {
    pub fn destroyed(&self) -> Vec<ConnectionId> {
        self.signals
            .iter()
            .filter_map(|signal| match signal {
                SurfaceSignal::Destroy(id) => Some(*id),
                _ => None,
            })
            .collect()
    }
}

impl DiagramSurface for RecordingSurface {
    fn destroy_connection(&mut self, connection_id: ConnectionId) {
        self.signals.push(SurfaceSignal::Destroy(connection_id));
    }

    fn ports_changed(&mut self, element_id: &ElementId, side: Side, ports: &[Port]) {
        self.signals.push(SurfaceSignal::PortsChanged(
            element_id.clone(),
            side,
            ports.iter().map(|port| port.id().clone()).collect(),
        ));
    }
}
