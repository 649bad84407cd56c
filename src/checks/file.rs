use crate::eval::RiskVerdict;
use crate::rules::{RuleSet, first_match};

/// Classify a file write or edit by its target path.
///
/// Sensitive-name rules run before system-directory rules, so a path under
/// `/etc/` is reported as a warning and never reaches the critical check.
pub fn check(rules: &RuleSet, path: &str) -> RiskVerdict {
    let hit = first_match(&rules.file_sensitive, path)
        .or_else(|| first_match(&rules.file_system_dirs, path));
    let Some(rule) = hit else {
        return RiskVerdict::safe();
    };
    RiskVerdict::dangerous(rule.severity, format!("{}: {path}", rule.reason))
}
