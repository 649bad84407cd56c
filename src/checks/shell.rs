use crate::eval::RiskVerdict;
use crate::rules::{RuleSet, first_match};

/// Classify a shell command line.
///
/// The primary table is consulted first; composite rules only run when no
/// single-signal rule matched.
pub fn check(rules: &RuleSet, command: &str) -> RiskVerdict {
    if let Some(rule) = first_match(&rules.shell, command) {
        return RiskVerdict::dangerous(rule.severity, rule.reason.clone());
    }
    if let Some(rule) = rules.shell_composite.iter().find(|r| r.is_match(command)) {
        log::debug!("composite rule matched: {}", rule.signal_names());
        return RiskVerdict::dangerous(rule.severity, rule.reason.clone());
    }
    RiskVerdict::safe()
}
