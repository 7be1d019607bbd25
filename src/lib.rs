pub mod core;

// Re-export commonly used types
pub use crate::core::config::{DefaultPorts, SessionConfig};
pub use crate::core::connections::{
    BuiltinRule, ConnectionRequest, ReasonCode, ValidationResult, ValidationRule,
};
pub use crate::core::errors::{PortError, RuleError};
pub use crate::core::session::EditorSession;
pub use crate::core::surface::{DetachedSurface, DiagramSurface};
pub use crate::core::types::{
    Bounds, Connection, ConnectionId, Element, ElementId, Endpoint, PortId, Side,
};
