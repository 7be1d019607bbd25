use super::rules::{BuiltinRule, ConnectionRequest, ReasonCode, RuleContext, ValidationRule};
use crate::core::ports::layout::PortLayout;
use crate::core::ports::store::PortStateStore;
use crate::core::types::{Bounds, Connection, ElementId, PortId};
use log::{debug, warn};
use serde::Serialize;

/// Outcome of a connection attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub reason: Option<ReasonCode>,
}

impl ValidationResult {
    pub fn accepted() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn rejected(reason: ReasonCode) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Closest free port pair between two elements
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortPair {
    pub source: PortId,
    pub target: PortId,
    pub distance: f64,
}

/// Ordered rule chain evaluated during the connect gesture
///
/// Validation only reads the store; a declined attempt leaves no trace.
#[derive(Debug)]
pub struct ConnectionValidator {
    rules: Vec<ValidationRule>,
    log_rejections: bool,
}

impl ConnectionValidator {
    /// Create a validator with the standard rule chain
    pub fn new() -> Self {
        Self::with_rules(&BuiltinRule::standard())
    }

    /// Create a validator with the given built-in rules, in order
    pub fn with_rules(rules: &[BuiltinRule]) -> Self {
        Self {
            rules: rules.iter().copied().map(ValidationRule::from).collect(),
            log_rejections: true,
        }
    }

    pub fn set_rejection_logging(&mut self, enabled: bool) {
        self.log_rejections = enabled;
    }

    /// Register a rule at the end of the chain. A rule with the same name is
    /// replaced in place.
    pub fn add_rule(&mut self, rule: ValidationRule) {
        match self.rules.iter_mut().find(|existing| existing.name() == rule.name()) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
    }

    /// Unregister a rule by name
    pub fn remove_rule(&mut self, name: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|rule| rule.name() != name);
        self.rules.len() != before
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| rule.name() == name)
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(ValidationRule::name).collect()
    }

    /// Evaluate the chain in registration order, stopping at the first failure
    pub fn validate(
        &self,
        store: &PortStateStore,
        request: &ConnectionRequest,
        existing: &[Connection],
    ) -> ValidationResult {
        let ctx = RuleContext {
            store,
            connections: existing,
        };

        for rule in &self.rules {
            match rule.evaluate(request, &ctx) {
                Ok(true) => continue,
                Ok(false) => {
                    let reason = rule.reason();
                    if self.log_rejections {
                        debug!(
                            "Connection {}.{:?} -> {}.{:?} rejected: {}",
                            request.source_element,
                            request.source_port,
                            request.target_element,
                            request.target_port,
                            reason
                        );
                    }
                    return ValidationResult::rejected(reason);
                }
                Err(err) => {
                    warn!("Validation rule '{}' faulted: {}", rule.name(), err);
                    return ValidationResult::rejected(ReasonCode::ValidationError);
                }
            }
        }

        ValidationResult::accepted()
    }

    /// Pick the free port pair with the shortest straight-line distance.
    ///
    /// Ties go to the first pair encountered, sides in canonical order.
    /// Returns `None` when either element has no free port.
    pub fn find_optimal_ports(
        store: &PortStateStore,
        source_element: &ElementId,
        source_bounds: &Bounds,
        target_element: &ElementId,
        target_bounds: &Bounds,
    ) -> Option<PortPair> {
        let source_ports = store.get_free_ports(source_element);
        let target_ports = store.get_free_ports(target_element);

        let mut best: Option<PortPair> = None;
        for source in &source_ports {
            let from = PortLayout::port_anchor(source_bounds, source);
            for target in &target_ports {
                let distance = from.distance(&PortLayout::port_anchor(target_bounds, target));
                if best.as_ref().map_or(true, |pair| distance < pair.distance) {
                    best = Some(PortPair {
                        source: source.id().clone(),
                        target: target.id().clone(),
                        distance,
                    });
                }
            }
        }
        best
    }
}

impl Default for ConnectionValidator {
    fn default() -> Self {
        Self::new()
    }
}
