use zoro_core::Requirement;

use crate::listing::append_requirement_list;

/// Build the phase-1 prompt asking the agent to investigate how to test a
/// substep's requirements before writing anything.
pub fn build_investigation_prompt(
    step_description: &str,
    substep_description: &str,
    requirements: &[Requirement],
    chat_history: &str,
) -> String {
    let mut prompt = String::new();
    prompt.push_str(
        "Investigate the implementation to understand how to test these requirements.\n\n",
    );
    prompt.push_str(&format!("## PARENT STEP:\n{step_description}\n\n"));
    prompt.push_str(&format!("## SUBSTEP:\n{substep_description}\n\n"));

    prompt.push_str(&format!(
        "## REQUIREMENTS TO TEST ({}):\n",
        requirements.len()
    ));
    append_requirement_list(&mut prompt, requirements);
    prompt.push_str("\n\n");

    prompt.push_str(&format!("## CHAT HISTORY:\n{chat_history}\n\n"));
    append_task(&mut prompt);
    prompt
}

fn append_task(prompt: &mut String) {
    prompt.push_str("## YOUR TASK:\n");
    prompt.push_str(
        "Use tools to investigate the code and understand:\n\
         - Where each requirement is implemented\n\
         - What files contain the relevant code\n\
         - How the implementation works\n\
         - What needs to be tested\n\n\
         Read implementation files, search for relevant code, and gather \
         information about how to test each requirement. Do not write or \
         modify any files yet.",
    );
}
