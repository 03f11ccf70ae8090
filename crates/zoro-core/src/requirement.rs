use serde::{Deserialize, Serialize};

/// A single testable obligation attached to a substep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Stable identifier, e.g. `req-1`.
    pub id: String,
    pub description: String,
    pub category: String,
}

impl Requirement {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            category: category.into(),
        }
    }

    /// Test-method prefix derived from this requirement's id.
    pub fn test_method_stem(&self) -> String {
        test_method_stem(&self.id)
    }
}

/// Derive the Python test-method prefix for a requirement id.
///
/// Any character that cannot appear in a Python identifier is mapped to `_`,
/// so `req-1` becomes `test_req_1`. Both prompt phases name methods through
/// this function.
pub fn test_method_stem(id: &str) -> String {
    let normalized: String = id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("test_{normalized}")
}

/// Full method-name pattern shown to the agent, e.g. `test_req_1_<descriptive_name>`.
pub fn test_method_pattern(id: &str) -> String {
    format!("{}_<descriptive_name>", test_method_stem(id))
}
