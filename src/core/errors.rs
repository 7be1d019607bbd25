use super::types::{ElementId, PortId};
use thiserror::Error;

/// Reasons a store or allocator mutation was a no-op
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortError {
    #[error("Element '{0}' has no port state")]
    UnknownElement(ElementId),

    #[error("Port '{port}' not found on element '{element}'")]
    UnknownPort { element: ElementId, port: PortId },

    #[error("Port '{port}' on element '{element}' is already occupied")]
    PortOccupied { element: ElementId, port: PortId },

    #[error("Port ID '{0}' does not start with a side prefix")]
    MalformedPortId(PortId),
}

/// Failure raised by a custom validation rule itself
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Rule '{rule}' failed: {message}")]
pub struct RuleError {
    pub rule: String,
    pub message: String,
}

impl RuleError {
    pub fn new(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            message: message.into(),
        }
    }
}
