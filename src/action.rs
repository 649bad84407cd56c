//! Action descriptors: which category a tool call belongs to, and the
//! arguments that category's checks need.

use serde_json::Value;

/// Closed set of tool categories the gate knows how to inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCategory {
    Shell,
    FileWrite,
    FileEdit,
    VersionControl,
    NetworkRequest,
    Unrecognized,
}

/// (category, accepted names, case-insensitive)
const TOOL_NAMES: &[(ToolCategory, &[&str], bool)] = &[
    (ToolCategory::Shell, &["bash", "shell"], true),
    (ToolCategory::FileWrite, &["Write", "file-write"], false),
    (ToolCategory::FileEdit, &["Edit", "file-edit"], false),
    (ToolCategory::VersionControl, &["git", "version-control"], false),
    (ToolCategory::NetworkRequest, &["WebFetch", "network-request"], false),
];

impl ToolCategory {
    /// Resolve a tool name.
    ///
    /// Only shell names ignore case (`Bash` and `bash` both select it). All
    /// other categories require an exact name.
    pub fn resolve(tool_name: &str) -> Self {
        TOOL_NAMES
            .iter()
            .find(|(_, names, ci)| {
                names.iter().any(|n| {
                    if *ci {
                        n.eq_ignore_ascii_case(tool_name)
                    } else {
                        *n == tool_name
                    }
                })
            })
            .map(|(category, _, _)| *category)
            .unwrap_or(ToolCategory::Unrecognized)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ToolCategory::Shell => "shell",
            ToolCategory::FileWrite => "file-write",
            ToolCategory::FileEdit => "file-edit",
            ToolCategory::VersionControl => "version-control",
            ToolCategory::NetworkRequest => "network-request",
            ToolCategory::Unrecognized => "unrecognized",
        }
    }
}

/// Arguments of a network request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkRequest {
    pub url: String,
    pub method: String,
    /// Request body rendered as text; `None` when absent, null, or empty.
    pub payload: Option<String>,
    /// Free-form options (headers, fetch init, ...) rendered as text.
    pub options: String,
}

/// One tool call to classify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionDescriptor {
    Shell { command: String },
    FileWrite { path: String },
    FileEdit { path: String },
    VersionControl { command: String },
    NetworkRequest(NetworkRequest),
    Unrecognized,
}

impl ActionDescriptor {
    /// Build a descriptor from a tool name and its JSON argument object.
    ///
    /// Missing or mistyped arguments become empty strings; nothing here fails.
    pub fn from_tool(tool_name: &str, args: &Value) -> Self {
        match ToolCategory::resolve(tool_name) {
            ToolCategory::Shell => ActionDescriptor::Shell {
                command: string_arg(args, &["command"]),
            },
            ToolCategory::FileWrite => ActionDescriptor::FileWrite {
                path: string_arg(args, &["file_path", "path"]),
            },
            ToolCategory::FileEdit => ActionDescriptor::FileEdit {
                path: string_arg(args, &["file_path", "path"]),
            },
            ToolCategory::VersionControl => ActionDescriptor::VersionControl {
                command: string_arg(args, &["command"]),
            },
            ToolCategory::NetworkRequest => ActionDescriptor::NetworkRequest(NetworkRequest {
                url: string_arg(args, &["url"]),
                method: string_arg(args, &["method"]),
                payload: text_arg(args, &["body", "data"]),
                options: text_arg(args, &["options"]).unwrap_or_default(),
            }),
            ToolCategory::Unrecognized => ActionDescriptor::Unrecognized,
        }
    }

    pub fn category(&self) -> ToolCategory {
        match self {
            ActionDescriptor::Shell { .. } => ToolCategory::Shell,
            ActionDescriptor::FileWrite { .. } => ToolCategory::FileWrite,
            ActionDescriptor::FileEdit { .. } => ToolCategory::FileEdit,
            ActionDescriptor::VersionControl { .. } => ToolCategory::VersionControl,
            ActionDescriptor::NetworkRequest(_) => ToolCategory::NetworkRequest,
            ActionDescriptor::Unrecognized => ToolCategory::Unrecognized,
        }
    }

    /// Short one-line summary for log lines.
    pub fn summary(&self) -> String {
        let text = match self {
            ActionDescriptor::Shell { command } | ActionDescriptor::VersionControl { command } => {
                command.as_str()
            }
            ActionDescriptor::FileWrite { path } | ActionDescriptor::FileEdit { path } => {
                path.as_str()
            }
            ActionDescriptor::NetworkRequest(req) => req.url.as_str(),
            ActionDescriptor::Unrecognized => "",
        };
        let truncated: String = text.chars().take(120).collect();
        format!("{}: {}", self.category().as_str(), truncated)
    }
}

/// First key holding a string value; anything else coerces to empty.
fn string_arg(args: &Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|k| args.get(k).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

/// First key holding a non-null, non-empty value, rendered as text.
fn text_arg(args: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match args.get(k)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(a) if a.is_empty() => None,
        Value::Object(o) if o.is_empty() => None,
        other => Some(other.to_string()),
    })
}
