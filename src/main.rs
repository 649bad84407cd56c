//! agent-riskgate: PreToolUse hook.
//!
//! Reads a tool call as JSON from stdin, classifies it, applies the approval
//! policy, and writes a permission decision to stdout.

use std::io::Read;

use clap::Parser;

use agent_riskgate::config::{Config, resolve_policy};
use agent_riskgate::hook::{self, HookInput};
use agent_riskgate::{Classifier, logging};

/// Risk gate for agent tool calls (PreToolUse hook)
#[derive(Parser, Debug)]
#[command(name = "agent-riskgate")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Approval policy for this call: always_ask, warn_only, block_critical, disabled
    #[arg(long)]
    policy: Option<String>,

    /// Print the merged configuration as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() {
    let cli = Cli::parse();

    let (config, load_err) = Config::load_or_default();
    logging::init(config.log_level());
    if let Some(e) = load_err {
        log::warn!("{e}; using default configuration");
    }

    if cli.dump_config {
        match toml::to_string(&config) {
            Ok(text) => print!("{text}"),
            Err(e) => {
                eprintln!("agent-riskgate: cannot render config: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let classifier = config.build_classifier().unwrap_or_else(|e| {
        log::warn!("{e}; using built-in rules");
        Classifier::builtin()
    });
    let rules = classifier.rules();
    log::debug!(
        "rules loaded: {} shell, {} file, {} git, {} allowed hosts",
        rules.shell.len(),
        rules.file_sensitive.len() + rules.file_system_dirs.len(),
        rules.git.len(),
        rules.network_allowed_hosts.len()
    );
    let policy = match cli.policy {
        Some(p) => resolve_policy(&p),
        None => config.approval_policy(),
    };

    let mut input = String::new();
    if std::io::stdin().read_to_string(&mut input).is_err() {
        eprintln!("failed to read stdin");
        std::process::exit(1);
    }

    let hook_input: HookInput = match serde_json::from_str(&input) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("JSON parse error: {e}");
            std::process::exit(1);
        }
    };

    let Some(output) = hook::respond(&classifier, policy, &hook_input) else {
        return;
    };
    match serde_json::to_string(&output) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("agent-riskgate: cannot encode response: {e}");
            std::process::exit(1);
        }
    }
}
