use std::path::PathBuf;

use zoro_core::Requirement;

use crate::critical::critical_project_rules;
use crate::instructions::{build_instructions, WriteMode};
use crate::investigate::build_investigation_prompt;

/// Everything the host knows about one test-writing substep.
#[derive(Debug, Clone, Default)]
pub struct PromptContext {
    /// Project working directory; `None` disables critical rules.
    pub cwd: Option<PathBuf>,
    pub step_description: String,
    pub substep_description: String,
    pub requirements: Vec<Requirement>,
    pub chat_history: String,
    pub workspace_dir: PathBuf,
    pub test_file_path: PathBuf,
    /// Current body of the test file, when one already exists.
    pub existing_test_file: Option<String>,
}

impl PromptContext {
    pub fn write_mode(&self) -> WriteMode {
        WriteMode::for_existing(self.existing_test_file.as_deref())
    }

    /// Critical-rules block for the system prompt, or `""`.
    pub fn critical_rules(&self) -> String {
        critical_project_rules(self.cwd.as_deref())
    }

    /// Phase 1: investigate before writing.
    pub fn investigation_prompt(&self) -> String {
        build_investigation_prompt(
            &self.step_description,
            &self.substep_description,
            &self.requirements,
            &self.chat_history,
        )
    }

    /// Phase 2: write the test file.
    pub fn write_instructions(&self) -> String {
        build_instructions(
            &self.requirements,
            &self.workspace_dir,
            &self.test_file_path,
            self.existing_test_file.as_deref(),
        )
    }
}
