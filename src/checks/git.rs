use crate::eval::RiskVerdict;
use crate::rules::{RuleSet, first_match};

/// Classify a version-control command string.
pub fn check(rules: &RuleSet, command: &str) -> RiskVerdict {
    match first_match(&rules.git, command) {
        Some(rule) => RiskVerdict::dangerous(rule.severity, rule.reason.clone()),
        None => RiskVerdict::safe(),
    }
}
