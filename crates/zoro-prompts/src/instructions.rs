use std::path::Path;

use zoro_core::{Requirement, TestResult, TestStatus, RESULT_MARKER};

use crate::listing::append_requirement_list;

/// Category shown in example methods when there is no requirement to borrow one from.
const DEFAULT_EXAMPLE_CATEGORY: &str = "feature";

/// Whether the agent writes a fresh test file or edits one already on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Update,
}

impl WriteMode {
    pub fn for_existing(existing_test_file: Option<&str>) -> Self {
        match existing_test_file {
            Some(_) => WriteMode::Update,
            None => WriteMode::Create,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WriteMode::Create => "create",
            WriteMode::Update => "update",
        }
    }
}

/// The named parts of the write instructions, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Header,
    Requirements,
    ExistingFile,
    UpdateRules,
    CreateTemplate,
    KeyPoints,
}

/// Assembles the phase-2 instructions that tell the agent exactly what test
/// file to write.
#[derive(Debug, Clone)]
pub struct InstructionBuilder<'a> {
    requirements: &'a [Requirement],
    workspace_dir: &'a Path,
    test_file_path: &'a Path,
    existing_test_file: Option<&'a str>,
}

impl<'a> InstructionBuilder<'a> {
    pub fn new(
        requirements: &'a [Requirement],
        workspace_dir: &'a Path,
        test_file_path: &'a Path,
    ) -> Self {
        Self {
            requirements,
            workspace_dir,
            test_file_path,
            existing_test_file: None,
        }
    }

    /// Supplying a body switches the builder to update mode.
    pub fn existing_test_file(mut self, body: Option<&'a str>) -> Self {
        self.existing_test_file = body;
        self
    }

    pub fn mode(&self) -> WriteMode {
        WriteMode::for_existing(self.existing_test_file)
    }

    pub fn sections(&self) -> Vec<Section> {
        let mut sections = vec![Section::Header, Section::Requirements];
        match self.mode() {
            WriteMode::Update => sections.extend([Section::ExistingFile, Section::UpdateRules]),
            WriteMode::Create => sections.push(Section::CreateTemplate),
        }
        sections.push(Section::KeyPoints);
        sections
    }

    pub fn append_section(&self, prompt: &mut String, section: Section) {
        match section {
            Section::Header => {
                prompt.push_str(&format!(
                    "Now write the test file to: {}\n\n",
                    self.test_file_path.display()
                ));
            }
            Section::Requirements => {
                prompt.push_str(&format!(
                    "## Requirements to Cover ({}):\n",
                    self.requirements.len()
                ));
                append_requirement_list(prompt, self.requirements);
                prompt.push_str("\n\n");
            }
            Section::ExistingFile => {
                if let Some(body) = self.existing_test_file {
                    prompt.push_str("## Existing Test File\n\n```python\n");
                    prompt.push_str(body);
                    prompt.push_str("\n```\n\n");
                }
            }
            Section::UpdateRules => self.append_update_rules(prompt),
            Section::CreateTemplate => self.append_create_template(prompt),
            Section::KeyPoints => self.append_key_points(prompt),
        }
    }

    pub fn build(&self) -> String {
        let mut prompt = String::new();
        for section in self.sections() {
            self.append_section(&mut prompt, section);
        }
        prompt
    }

    fn example_category(&self) -> &str {
        self.requirements
            .first()
            .map(|r| r.category.as_str())
            .unwrap_or(DEFAULT_EXAMPLE_CATEGORY)
    }

    fn append_update_rules(&self, prompt: &mut String) {
        prompt.push_str("## Instructions for UPDATING Test File\n\n");
        prompt.push_str("⚠️ **CRITICAL - Preserve Existing Structure**:\n\n");
        prompt.push_str(
            "1. **Keep ALL existing code**:\n   \
             - Import statements\n   \
             - Helper functions (especially print_test_result)\n   \
             - Class definition and setUp/tearDown\n   \
             - Test methods for OTHER requirements (not in the list above)\n\n",
        );
        prompt.push_str(
            "2. **For EACH requirement in the list**:\n   \
             - Check if test method for that requirement exists (e.g., `test_req_1_*`)\n   \
             - If EXISTS → **REPLACE** the method with updated implementation\n   \
             - If NOT EXISTS → **ADD** new test method\n\n",
        );
        prompt.push_str("3. **Test method format**:\n   ```python\n");
        append_example_method(
            prompt,
            "   ",
            "test_req_1_descriptive_name",
            "Description here",
            self.example_category(),
        );
        prompt.push_str("   ```\n\n");
        prompt.push_str(
            "4. **Write the complete updated file** (the whole file, not a diff) \
             using write_to_file tool.\n\n",
        );
    }

    fn append_create_template(&self, prompt: &mut String) {
        let ws = self.workspace_dir.display();
        prompt.push_str("## Instructions for CREATING New Test File\n\n");
        prompt.push_str("**You must write a complete test file with this structure**:\n\n");
        prompt.push_str("```python\nimport sys\nimport os\nimport json\nimport unittest\n\n");
        prompt.push_str(&format!(
            "# Add workspace root to path\n\
             sys.path.insert(0, '{ws}')\n\
             # Add other paths if needed (analyze implementation files first!)\n\
             # sys.path.insert(0, '{ws}/backend')\n\
             # sys.path.insert(0, '{ws}/src')\n\n"
        ));
        append_result_helper(prompt);
        prompt.push_str(
            "\n# Import from workspace (analyze implementation first!)\n\
             # from backend.api.routes import ...\n\
             # from src.components import ...\n\n",
        );
        prompt.push_str("class TestSubstep(unittest.TestCase):\n");
        prompt.push_str("    \"\"\"Tests for substep requirements\"\"\"\n\n");
        append_example_method(
            prompt,
            "    ",
            "test_req_1_example",
            "Description",
            DEFAULT_EXAMPLE_CATEGORY,
        );
        prompt.push_str("\nif __name__ == '__main__':\n    unittest.main()\n```\n\n");
        prompt.push_str(&format!(
            "**Generate test methods for ALL {} requirements.**\n\n",
            self.requirements.len()
        ));
    }

    fn append_key_points(&self, prompt: &mut String) {
        prompt.push_str("## Key Points:\n\n");
        prompt.push_str(&format!(
            "- Use **write_to_file** to write the complete file to: `{}`\n",
            self.test_file_path.display()
        ));
        prompt.push_str(
            "- Each test must include requirement_id in print_test_result()\n\
             - Use clear test names: test_req_{id}_<descriptive_name>\n\
             - **Maximum 3 test methods per requirement** (prefer just 1)\n\
             - Each requirement should have exactly ONE test method, reporting one \
             canonical outcome, unless multiple scenarios are genuinely needed\n\
             - Write the whole file in a single write_to_file call; no partial files or diffs\n\n\
             Use the write_to_file tool now to write the test file.",
        );
    }
}

/// Build the phase-2 write instructions.
///
/// `existing_test_file` selects update mode when present. Requirements are
/// rendered as given: no deduplication, no validation.
pub fn build_instructions(
    requirements: &[Requirement],
    workspace_dir: &Path,
    test_file_path: &Path,
    existing_test_file: Option<&str>,
) -> String {
    InstructionBuilder::new(requirements, workspace_dir, test_file_path)
        .existing_test_file(existing_test_file)
        .build()
}

/// Python helper that prints one `TEST_RESULT:` line, generated from the
/// result schema so the template and the collector cannot drift apart.
fn append_result_helper(prompt: &mut String) {
    let optional_params: Vec<String> = TestResult::OPTIONAL_FIELDS
        .iter()
        .map(|f| format!("{f}=None"))
        .collect();
    prompt.push_str("# Helper function to print structured test results\n");
    prompt.push_str(&format!(
        "def print_test_result(name, status, description, category=\"general\",\n\
         {:22}{}):\n",
        "",
        optional_params.join(", ")
    ));
    prompt.push_str("    \"\"\"Print test result in format that Zoro can parse\"\"\"\n");
    prompt.push_str("    result = {\n");
    let last = TestResult::REQUIRED_FIELDS.len() - 1;
    for (i, field) in TestResult::REQUIRED_FIELDS.iter().enumerate() {
        // output/test_code are always present but left empty by the helper.
        let value = match *field {
            "output" | "test_code" => "\"\"",
            param => param,
        };
        prompt.push_str(&format!("        \"{field}\": {value}"));
        if i < last {
            prompt.push(',');
        }
        if *field == "status" {
            prompt.push_str(&format!("  # Must be {}", status_choices()));
        }
        prompt.push('\n');
    }
    prompt.push_str("    }\n");
    for field in TestResult::OPTIONAL_FIELDS {
        prompt.push_str(&format!(
            "    if {field}:\n        result[\"{field}\"] = {field}\n"
        ));
    }
    prompt.push_str(&format!(
        "    print(f\"{RESULT_MARKER} {{json.dumps(result)}}\")\n"
    ));
}

/// `'pass', 'fail', or 'error'`
fn status_choices() -> String {
    let quoted: Vec<String> = TestStatus::ALL
        .iter()
        .map(|s| format!("'{}'", s.as_str()))
        .collect();
    match quoted.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{}, or {last}", rest.join(", ")),
        _ => quoted.concat(),
    }
}

fn append_example_method(
    prompt: &mut String,
    indent: &str,
    method: &str,
    docstring: &str,
    category: &str,
) {
    let pass = TestStatus::Pass.as_str();
    let fail = TestStatus::Fail.as_str();
    let body = format!(
        r#"def {method}(self):
    """Requirement req-1: {docstring}"""
    try:
        # Test implementation
        self.assertEqual(actual, expected)

        # REQUIRED: Print on success
        print_test_result(
            name="{method}",
            requirement_id="req-1",  # ← CRITICAL!
            status="{pass}",
            description="What was verified",
            category="{category}"
        )
    except AssertionError as e:
        # REQUIRED: Print on failure
        print_test_result(
            name="{method}",
            requirement_id="req-1",
            status="{fail}",
            description=str(e),
            category="{category}"
        )
        raise"#
    );
    for line in body.lines() {
        if !line.is_empty() {
            prompt.push_str(indent);
            prompt.push_str(line);
        }
        prompt.push('\n');
    }
}
