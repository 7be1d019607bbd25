use crate::core::errors::RuleError;
use crate::core::ports::store::PortStateStore;
use crate::core::types::{Connection, ElementId, Endpoint, PortId};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A proposed connection, as seen during the user's connect gesture
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionRequest {
    pub source_element: ElementId,
    /// `None` when the gesture did not start on a magnet
    pub source_port: Option<PortId>,
    pub target_element: ElementId,
    /// `None` when the gesture did not end on a magnet
    pub target_port: Option<PortId>,
}

impl ConnectionRequest {
    /// Request anchored on ports at both ends
    pub fn new(
        source_element: impl Into<ElementId>,
        source_port: impl Into<PortId>,
        target_element: impl Into<ElementId>,
        target_port: impl Into<PortId>,
    ) -> Self {
        Self {
            source_element: source_element.into(),
            source_port: Some(source_port.into()),
            target_element: target_element.into(),
            target_port: Some(target_port.into()),
        }
    }

    /// Request where either end may lack a port
    pub fn unanchored(
        source_element: impl Into<ElementId>,
        source_port: Option<PortId>,
        target_element: impl Into<ElementId>,
        target_port: Option<PortId>,
    ) -> Self {
        Self {
            source_element: source_element.into(),
            source_port,
            target_element: target_element.into(),
            target_port,
        }
    }

    /// Both endpoints, when both ports are present and non-empty
    pub fn endpoints(&self) -> Option<(Endpoint, Endpoint)> {
        let source = present(&self.source_port)?;
        let target = present(&self.target_port)?;
        Some((
            Endpoint::new(self.source_element.clone(), source.clone()),
            Endpoint::new(self.target_element.clone(), target.clone()),
        ))
    }
}

fn present(port: &Option<PortId>) -> Option<&PortId> {
    port.as_ref().filter(|port| !port.id().is_empty())
}

/// Read-only view handed to every rule
pub struct RuleContext<'a> {
    pub store: &'a PortStateStore,
    pub connections: &'a [Connection],
}

/// Rules shipped with the validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuiltinRule {
    NoSelfConnection,
    PortsPresent,
    PortAvailable,
    NoDuplicateConnection,
}

impl BuiltinRule {
    /// The default chain, in evaluation order
    pub fn standard() -> [BuiltinRule; 4] {
        [
            BuiltinRule::NoSelfConnection,
            BuiltinRule::PortsPresent,
            BuiltinRule::PortAvailable,
            BuiltinRule::NoDuplicateConnection,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinRule::NoSelfConnection => "no-self-connection",
            BuiltinRule::PortsPresent => "ports-present",
            BuiltinRule::PortAvailable => "port-available",
            BuiltinRule::NoDuplicateConnection => "no-duplicate-connection",
        }
    }

    /// True when the request passes this rule
    pub fn evaluate(&self, request: &ConnectionRequest, ctx: &RuleContext<'_>) -> bool {
        match self {
            BuiltinRule::NoSelfConnection => request.source_element != request.target_element,
            BuiltinRule::PortsPresent => {
                present(&request.source_port).is_some() && present(&request.target_port).is_some()
            }
            BuiltinRule::PortAvailable => match request.endpoints() {
                Some((source, target)) => {
                    ctx.store.is_port_available(&source.element_id, &source.port_id)
                        && ctx.store.is_port_available(&target.element_id, &target.port_id)
                }
                None => false,
            },
            BuiltinRule::NoDuplicateConnection => match request.endpoints() {
                Some((source, target)) => !ctx
                    .connections
                    .iter()
                    .any(|connection| connection.links(&source, &target)),
                None => true,
            },
        }
    }
}

/// Signature of a user-supplied rule: `Ok(true)` passes, `Ok(false)` rejects
pub type RuleFn = dyn Fn(&ConnectionRequest, &RuleContext<'_>) -> Result<bool, RuleError>;

/// A named rule registered by the editor shell
pub struct CustomRule {
    name: String,
    check: Box<RuleFn>,
}

impl CustomRule {
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&ConnectionRequest, &RuleContext<'_>) -> Result<bool, RuleError> + 'static,
    {
        Self {
            name: name.into(),
            check: Box::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRule").field("name", &self.name).finish()
    }
}

/// An entry in the validator's rule chain
#[derive(Debug)]
pub enum ValidationRule {
    Builtin(BuiltinRule),
    Custom(CustomRule),
}

impl ValidationRule {
    pub fn custom<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&ConnectionRequest, &RuleContext<'_>) -> Result<bool, RuleError> + 'static,
    {
        ValidationRule::Custom(CustomRule::new(name, check))
    }

    pub fn name(&self) -> &str {
        match self {
            ValidationRule::Builtin(rule) => rule.name(),
            ValidationRule::Custom(rule) => rule.name(),
        }
    }

    pub fn evaluate(
        &self,
        request: &ConnectionRequest,
        ctx: &RuleContext<'_>,
    ) -> Result<bool, RuleError> {
        match self {
            ValidationRule::Builtin(rule) => Ok(rule.evaluate(request, ctx)),
            ValidationRule::Custom(rule) => (rule.check)(request, ctx),
        }
    }

    /// Reason reported when this rule rejects a request
    pub fn reason(&self) -> ReasonCode {
        match self {
            ValidationRule::Builtin(rule) => ReasonCode::from(*rule),
            ValidationRule::Custom(rule) => ReasonCode::Custom(rule.name.clone()),
        }
    }
}

impl From<BuiltinRule> for ValidationRule {
    fn from(rule: BuiltinRule) -> Self {
        ValidationRule::Builtin(rule)
    }
}

/// Why a connection attempt was declined
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReasonCode {
    NoSelfConnection,
    PortsPresent,
    PortAvailable,
    NoDuplicateConnection,
    /// Rejected by the custom rule with this name
    Custom(String),
    /// A rule failed while evaluating
    ValidationError,
}

impl ReasonCode {
    pub fn as_str(&self) -> &str {
        match self {
            ReasonCode::NoSelfConnection => "no-self-connection",
            ReasonCode::PortsPresent => "ports-present",
            ReasonCode::PortAvailable => "port-available",
            ReasonCode::NoDuplicateConnection => "no-duplicate-connection",
            ReasonCode::Custom(name) => name.as_str(),
            ReasonCode::ValidationError => "validation-error",
        }
    }
}

impl From<BuiltinRule> for ReasonCode {
    fn from(rule: BuiltinRule) -> Self {
        match rule {
            BuiltinRule::NoSelfConnection => ReasonCode::NoSelfConnection,
            BuiltinRule::PortsPresent => ReasonCode::PortsPresent,
            BuiltinRule::PortAvailable => ReasonCode::PortAvailable,
            BuiltinRule::NoDuplicateConnection => ReasonCode::NoDuplicateConnection,
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ReasonCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
