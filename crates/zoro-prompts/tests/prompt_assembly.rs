//! End-to-end checks of the critical-rules probe against real temporary
//! project directories, and of the two test-writing phases together.

use std::path::Path;

use tempfile::TempDir;
use zoro_core::{collect_results, test_method_stem, Requirement, TestResult, TestStatus};
use zoro_prompts::{
    assemble_prompt, build_instructions, build_investigation_prompt, critical_project_rules,
    critical_project_rules_with, PromptContext, RulesLayout, TestPhase,
};

/// Create a project dir with the given files under `.clinerules/`.
fn project_with(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    let rules = dir.path().join(".clinerules");
    std::fs::create_dir_all(&rules).unwrap();
    for (name, body) in files {
        std::fs::write(rules.join(name), body).unwrap();
    }
    dir
}

fn requirements() -> Vec<Requirement> {
    vec![
        Requirement::new("req-1", "Returns 404 on missing user", "api"),
        Requirement::new("req-2", "Hashes passwords with bcrypt", "security"),
        Requirement::new("login.flow-3", "Locks account after 5 failures", "security"),
    ]
}

/// Slice from `heading` up to the next top-level heading (or the end).
fn section<'a>(text: &'a str, heading: &str) -> &'a str {
    let start = text
        .find(heading)
        .unwrap_or_else(|| panic!("missing {heading:?}"));
    let rest = &text[start + heading.len()..];
    match rest.find("\n## ") {
        Some(end) => &text[start..start + heading.len() + end],
        None => &text[start..],
    }
}

#[test]
fn project_without_rules_dir_gets_nothing() {
    let dir = TempDir::new().unwrap();
    assert_eq!(critical_project_rules(Some(dir.path())), "");
}

#[test]
fn plan_without_integration_gets_nothing() {
    let dir = project_with(&[("zoro_plan.md", "# Plan")]);
    assert_eq!(critical_project_rules(Some(dir.path())), "");
}

#[test]
fn integration_only_project() {
    let dir = project_with(&[("zoro_integration.md", "Run `zoro check` before commits.")]);
    let out = critical_project_rules(Some(dir.path()));
    assert!(out.starts_with("===="));
    assert!(out.contains("## Zoro Integration Requirements\n\nRun `zoro check` before commits."));
    assert!(!out.contains("## Current Zoro Plan"));
    assert!(out.trim_end().ends_with("===="));
}

#[test]
fn integration_and_plan_project() {
    let dir = project_with(&[
        ("zoro_integration.md", "integration body"),
        ("zoro_plan.md", "plan body"),
    ]);
    let out = critical_project_rules(Some(dir.path()));
    assert!(out.contains("integration body"));
    assert!(out.contains("## Current Zoro Plan\n\nplan body"));
}

#[test]
fn unreadable_plan_keeps_block_whole() {
    let dir = project_with(&[("zoro_integration.md", "integration body")]);
    // A directory where the plan file should be: exists, but cannot be read.
    std::fs::create_dir_all(dir.path().join(".clinerules/zoro_plan.md")).unwrap();
    let out = critical_project_rules(Some(dir.path()));
    assert!(out.contains("integration body"));
    assert!(out.contains("## Current Zoro Plan\n\n[Error reading zoro_plan.md]"));
    assert!(out.contains("'zoro' conda environment"));
    assert!(out.trim_end().ends_with("===="));
}

#[test]
fn each_call_reprobes() {
    let dir = project_with(&[]);
    assert_eq!(critical_project_rules(Some(dir.path())), "");
    std::fs::write(dir.path().join(".clinerules/zoro_integration.md"), "now enabled").unwrap();
    assert!(critical_project_rules(Some(dir.path())).contains("now enabled"));
}

#[test]
fn custom_layout() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".rules")).unwrap();
    std::fs::write(dir.path().join(".rules/opt_in.md"), "custom").unwrap();
    let layout = RulesLayout {
        dir: ".rules".into(),
        integration_file: "opt_in.md".into(),
        plan_file: "plan.md".into(),
    };
    assert!(critical_project_rules_with(Some(dir.path()), &layout).contains("custom"));
    assert_eq!(critical_project_rules(Some(dir.path())), "");
}

#[test]
fn investigation_names_match_write_phase() {
    let reqs = requirements();
    let investigation = build_investigation_prompt("step", "substep", &reqs, "");
    let instructions = build_instructions(
        &reqs,
        Path::new("/ws"),
        Path::new("/ws/tests/test_substep.py"),
        None,
    );
    for req in &reqs {
        let pattern = format!("Test method: {}_<descriptive_name>", test_method_stem(&req.id));
        assert_eq!(investigation.matches(&pattern).count(), 1, "{pattern}");
        assert_eq!(instructions.matches(&pattern).count(), 1, "{pattern}");
    }
    assert!(investigation.contains("test_login_flow_3_<descriptive_name>"));
}

#[test]
fn modes_differ_only_in_mode_sections() {
    let reqs = requirements();
    let ws = Path::new("/ws");
    let target = Path::new("/ws/tests/test_substep.py");
    let create = build_instructions(&reqs, ws, target, None);
    let update = build_instructions(&reqs, ws, target, Some("import unittest\n"));

    let create_header = &create[..create.find("## Requirements to Cover").unwrap()];
    let update_header = &update[..update.find("## Requirements to Cover").unwrap()];
    assert_eq!(create_header, update_header);

    assert_eq!(
        section(&create, "## Requirements to Cover"),
        section(&update, "## Requirements to Cover")
    );
    assert_eq!(
        section(&create, "## Key Points:"),
        section(&update, "## Key Points:")
    );
    assert_ne!(create, update);
}

#[test]
fn update_body_is_not_reformatted() {
    let body = "import unittest\n\n\nclass TestSubstep(unittest.TestCase):\n\tdef test_req_1_old(self):  \n\t\tpass";
    let out = build_instructions(&requirements(), Path::new("/ws"), Path::new("/ws/t.py"), Some(body));
    assert!(out.contains(&format!("```python\n{body}\n```")));
}

#[test]
fn create_helper_emits_collectable_lines() {
    // A line shaped like the generated helper's output parses with the shared schema.
    let out = build_instructions(&requirements(), Path::new("/ws"), Path::new("/ws/t.py"), None);
    assert!(out.contains("print(f\"TEST_RESULT: {json.dumps(result)}\")"));

    let expected = TestResult::new("test_req_1_example", TestStatus::Pass, "What was verified", "feature")
        .with_requirement("req-1");
    let captured = format!("..\n{}\nOK\n", expected.to_line().unwrap());
    assert_eq!(collect_results(&captured), vec![expected]);
}

#[test]
fn assemble_prompt_dispatches_by_phase() {
    let ctx = PromptContext {
        step_description: "Users API".into(),
        substep_description: "Lookup".into(),
        requirements: requirements(),
        workspace_dir: "/ws".into(),
        test_file_path: "/ws/tests/test_lookup.py".into(),
        ..Default::default()
    };
    let investigate = assemble_prompt(&ctx, TestPhase::Investigate);
    assert!(investigate.starts_with("Investigate the implementation"));
    assert!(investigate.contains("## REQUIREMENTS TO TEST (3):"));

    let write = assemble_prompt(&ctx, TestPhase::Write);
    assert!(write.starts_with("Now write the test file to: /ws/tests/test_lookup.py"));
    assert!(write.contains("**Generate test methods for ALL 3 requirements.**"));
}
