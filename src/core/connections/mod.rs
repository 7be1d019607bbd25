pub mod manager;
pub mod rules;
pub mod validator;

pub use manager::{ConnectionManager, ConnectionStats};
pub use rules::{
    BuiltinRule, ConnectionRequest, CustomRule, ReasonCode, RuleContext, ValidationRule,
};
pub use validator::{ConnectionValidator, PortPair, ValidationResult};
