pub mod context;
pub mod critical;
pub mod instructions;
pub mod investigate;
mod listing;
pub mod rules;

pub use context::PromptContext;
pub use critical::{compose_critical_rules, critical_project_rules, critical_project_rules_with};
pub use instructions::{build_instructions, InstructionBuilder, Section, WriteMode};
pub use investigate::build_investigation_prompt;
pub use rules::{
    probe, FsRuleStore, MemoryRuleStore, RuleContent, RuleStore, RulesBundle, RulesError,
    RulesLayout,
};

/// The two phases of the test-writing workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestPhase {
    /// Read and search the code; write nothing.
    Investigate,
    /// Emit the test file.
    Write,
}

/// Assemble the prompt for a given phase of a substep.
pub fn assemble_prompt(ctx: &PromptContext, phase: TestPhase) -> String {
    match phase {
        TestPhase::Investigate => ctx.investigation_prompt(),
        TestPhase::Write => ctx.write_instructions(),
    }
}
