use zoro_core::{test_method_pattern, Requirement};

/// Append the numbered requirement entries, separated by blank lines.
///
/// Both prompt phases render requirements through here so the method names
/// the agent notes during investigation match the ones it must later write.
pub(crate) fn append_requirement_list(prompt: &mut String, requirements: &[Requirement]) {
    let entries: Vec<String> = requirements
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "{}. [{}] {}\n   Category: {}\n   Test method: {}",
                i + 1,
                r.id,
                r.description,
                r.category,
                test_method_pattern(&r.id)
            )
        })
        .collect();
    prompt.push_str(&entries.join("\n\n"));
}
