//! PreToolUse hook protocol: JSON in on stdin, permission decision out on stdout.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::{ActionDescriptor, ToolCategory};
use crate::eval::{ApprovalPolicy, Classifier, RiskVerdict, decide};

#[derive(Debug, Deserialize)]
pub struct HookInput {
    pub tool_name: Option<String>,
    pub tool_input: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct HookOutput {
    #[serde(rename = "hookSpecificOutput")]
    pub hook_specific_output: PermissionDecision,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionDecision {
    pub hook_event_name: &'static str,
    pub permission_decision: &'static str,
    pub permission_decision_reason: String,
}

/// Classify a hook request and build the response.
///
/// Returns `None` for tools outside the gate's categories, leaving the
/// decision to the host.
pub fn respond(
    classifier: &Classifier,
    policy: ApprovalPolicy,
    input: &HookInput,
) -> Option<HookOutput> {
    let tool_name = input.tool_name.as_deref()?;
    if ToolCategory::resolve(tool_name) == ToolCategory::Unrecognized {
        return None;
    }
    let args = input.tool_input.clone().unwrap_or(Value::Null);
    let action = ActionDescriptor::from_tool(tool_name, &args);
    let verdict = classifier.classify(&action);
    let allowed = decide(policy, &verdict);
    let level = if verdict.is_critical() {
        log::Level::Warn
    } else {
        log::Level::Info
    };
    log::log!(
        level,
        "{} [{}] policy={}",
        if allowed { "ALLOW" } else { "ASK" },
        action.summary(),
        policy.as_str()
    );

    Some(HookOutput {
        hook_specific_output: PermissionDecision {
            hook_event_name: "PreToolUse",
            permission_decision: if allowed { "allow" } else { "ask" },
            permission_decision_reason: reason(policy, &verdict, allowed),
        },
    })
}

fn reason(policy: ApprovalPolicy, verdict: &RiskVerdict, allowed: bool) -> String {
    if !verdict.dangerous {
        return "no risk detected".into();
    }
    let severity = verdict.severity.as_str();
    if allowed {
        format!(
            "{severity} risk allowed by {} policy: {}",
            policy.as_str(),
            verdict.reason
        )
    } else {
        format!("{severity} risk requires approval: {}", verdict.reason)
    }
}
