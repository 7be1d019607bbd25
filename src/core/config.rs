//! Configuration for an editor session's port and connection core
//!
//! This module provides the settings an editor shell hands to `EditorSession`:
//! how many ports a freshly registered element receives, which built-in
//! validation rules are installed and in what order, and whether rejections
//! are logged.

use super::connections::rules::BuiltinRule;
use super::types::Side;
use serde::{Deserialize, Serialize};

/// Number of ports allocated per side when an element registers without
/// predefined port definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DefaultPorts {
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
    pub left: usize,
}

impl DefaultPorts {
    /// Same count on every side
    pub fn uniform(count: usize) -> Self {
        Self {
            top: count,
            right: count,
            bottom: count,
            left: count,
        }
    }

    pub fn count(&self, side: Side) -> usize {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    pub fn is_empty(&self) -> bool {
        Side::ALL.iter().all(|side| self.count(*side) == 0)
    }
}

/// Configuration for an editor session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Ports created on registration for elements without predefined ports
    pub default_ports: DefaultPorts,
    /// Built-in rules installed in the validator, in evaluation order
    pub rules: Vec<BuiltinRule>,
    /// Log every rejected connection attempt at debug level
    pub log_rejections: bool,
}

impl SessionConfig {
    /// Create a configuration with no default ports and the standard rule chain
    pub fn new() -> Self {
        Self {
            default_ports: DefaultPorts::default(),
            rules: BuiltinRule::standard().to_vec(),
            log_rejections: true,
        }
    }

    /// Set the ports allocated to newly registered elements
    pub fn with_default_ports(mut self, default_ports: DefaultPorts) -> Self {
        self.default_ports = default_ports;
        self
    }

    /// Replace the built-in rule chain
    ///
    /// # Note
    /// Order matters: evaluation stops at the first failing rule.
    pub fn with_rules(mut self, rules: Vec<BuiltinRule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_rejection_logging(mut self, enabled: bool) -> Self {
        self.log_rejections = enabled;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert!(config.default_ports.is_empty());
        assert_eq!(
            config.rules,
            vec![
                BuiltinRule::NoSelfConnection,
                BuiltinRule::PortsPresent,
                BuiltinRule::PortAvailable,
                BuiltinRule::NoDuplicateConnection,
            ]
        );
        assert!(config.log_rejections);
    }

    #[test]
    fn test_config_builder() {
        let config = SessionConfig::new()
            .with_default_ports(DefaultPorts::uniform(2))
            .with_rules(vec![BuiltinRule::PortAvailable])
            .with_rejection_logging(false);

        assert_eq!(config.default_ports.count(Side::Left), 2);
        assert_eq!(config.rules, vec![BuiltinRule::PortAvailable]);
        assert!(!config.log_rejections);
    }

    #[test]
    fn test_config_from_json() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"default_ports":{"top":1,"right":0,"bottom":1,"left":0}}"#)
                .unwrap();

        assert_eq!(config.default_ports.top, 1);
        assert_eq!(config.default_ports.right, 0);
        assert_eq!(config.rules, BuiltinRule::standard().to_vec());
    }

    #[test]
    fn test_rule_names_serialize_as_reason_codes() {
        let json = serde_json::to_string(&BuiltinRule::NoDuplicateConnection).unwrap();
        assert_eq!(json, "\"no-duplicate-connection\"");
    }
}
