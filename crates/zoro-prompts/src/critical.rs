use std::path::Path;

use tracing::{debug, info};

use crate::rules::{probe, FsRuleStore, RuleContent, RulesBundle, RulesLayout};

const DELIMITER: &str = "====";
const BANNER: &str = "🚨 CRITICAL PROJECT RULES - READ THIS FIRST 🚨";
const INTRO: &str =
    "This is a ZORO project with MANDATORY integration requirements that MUST be followed.";
const INTEGRATION_HEADING: &str = "## Zoro Integration Requirements";
const PLAN_HEADING: &str = "## Current Zoro Plan";
const CLOSING: &str = "🚨 IMPORTANT: All 'zoro' commands will automatically execute in the \
     'zoro' conda environment. You do NOT need to manually activate it for zoro commands.";

/// Critical-rules block for the project at `cwd`, using the default layout.
///
/// Returns `""` when there is no working directory or the project has not
/// opted in. Probes the filesystem on every call.
pub fn critical_project_rules(cwd: Option<&Path>) -> String {
    critical_project_rules_with(cwd, &RulesLayout::default())
}

pub fn critical_project_rules_with(cwd: Option<&Path>, layout: &RulesLayout) -> String {
    let Some(cwd) = cwd else {
        debug!("no working directory, skipping critical rules");
        return String::new();
    };
    let store = FsRuleStore::for_project(cwd, layout);
    let rules = compose_critical_rules(&probe(&store, layout));
    if !rules.is_empty() {
        info!(cwd = %cwd.display(), chars = rules.len(), "generated critical project rules");
    }
    rules
}

/// Render the critical-rules block from an already-probed bundle.
///
/// Output is either empty or a complete `====`-delimited block.
pub fn compose_critical_rules(bundle: &RulesBundle) -> String {
    let Some(ref integration) = bundle.integration else {
        return String::new();
    };

    let mut block = String::new();
    block.push_str(&format!("{DELIMITER}\n\n{BANNER}\n\n{INTRO}\n\n"));
    append_subsection(&mut block, INTEGRATION_HEADING, integration);
    if let Some(ref plan) = bundle.plan {
        append_subsection(&mut block, PLAN_HEADING, plan);
    }
    block.push_str(&format!("{CLOSING}\n\n{DELIMITER}\n\n"));
    block
}

fn append_subsection(block: &mut String, heading: &str, content: &RuleContent) {
    block.push_str(heading);
    block.push_str("\n\n");
    match content {
        RuleContent::Text(text) => block.push_str(text),
        RuleContent::Unreadable { file_name } => {
            block.push_str(&format!("[Error reading {file_name}]"));
        }
    }
    block.push_str("\n\n");
}
