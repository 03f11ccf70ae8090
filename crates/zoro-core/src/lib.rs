pub mod error;
pub mod requirement;
pub mod test_result;

pub use error::ZoroError;
pub use requirement::{test_method_pattern, test_method_stem, Requirement};
pub use test_result::{collect_results, TestResult, TestStatus, RESULT_MARKER};
