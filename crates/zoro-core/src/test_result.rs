use serde::{Deserialize, Serialize};

use crate::error::ZoroError;

/// Prefix of every structured result line printed by a generated test file.
pub const RESULT_MARKER: &str = "TEST_RESULT:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Pass,
    Fail,
    Error,
}

impl TestStatus {
    pub const ALL: [TestStatus; 3] = [TestStatus::Pass, TestStatus::Fail, TestStatus::Error];

    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Pass => "pass",
            TestStatus::Fail => "fail",
            TestStatus::Error => "error",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "pass" => Some(TestStatus::Pass),
            "fail" => Some(TestStatus::Fail),
            "error" => Some(TestStatus::Error),
            _ => None,
        }
    }
}

/// One test outcome, as carried on a `TEST_RESULT: <json>` line.
///
/// The six required fields are always serialized; `output` and `test_code`
/// may be empty strings. The optional fields are only emitted when they hold
/// a non-empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub status: TestStatus,
    pub description: String,
    pub category: String,
    pub output: String,
    pub test_code: String,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub requirement_id: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub rule_description: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub feature_name: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

impl TestResult {
    /// Fields present on every result line, in emission order.
    pub const REQUIRED_FIELDS: [&'static str; 6] = [
        "name",
        "status",
        "description",
        "category",
        "output",
        "test_code",
    ];

    /// Fields present only when the test supplies a value.
    pub const OPTIONAL_FIELDS: [&'static str; 3] =
        ["requirement_id", "rule_description", "feature_name"];

    pub fn new(
        name: impl Into<String>,
        status: TestStatus,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            description: description.into(),
            category: category.into(),
            output: String::new(),
            test_code: String::new(),
            requirement_id: None,
            rule_description: None,
            feature_name: None,
        }
    }

    pub fn with_requirement(mut self, requirement_id: impl Into<String>) -> Self {
        self.requirement_id = Some(requirement_id.into());
        self
    }

    /// Render the exact line a generated test prints for this outcome.
    pub fn to_line(&self) -> Result<String, ZoroError> {
        Ok(format!("{RESULT_MARKER} {}", serde_json::to_string(self)?))
    }

    /// Parse a single `TEST_RESULT: <json>` line. Leading whitespace is ignored.
    pub fn parse_line(line: &str) -> Result<Self, ZoroError> {
        let json = line
            .trim_start()
            .strip_prefix(RESULT_MARKER)
            .ok_or_else(|| ZoroError::NotAResultLine(line.to_string()))?;
        let mut result: TestResult = serde_json::from_str(json.trim())?;
        // Empty optionals carry no information; normalize them away.
        for field in [
            &mut result.requirement_id,
            &mut result.rule_description,
            &mut result.feature_name,
        ] {
            if is_blank(field) {
                *field = None;
            }
        }
        Ok(result)
    }
}

/// Extract every well-formed result from captured test output.
///
/// Lines without the marker are ignored, as are marker lines whose JSON does
/// not match the schema.
pub fn collect_results(output: &str) -> Vec<TestResult> {
    output
        .lines()
        .filter(|line| line.trim_start().starts_with(RESULT_MARKER))
        .filter_map(|line| TestResult::parse_line(line).ok())
        .collect()
}
