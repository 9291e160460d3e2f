use single_utilities::traits::FloatOps;
use std::collections::HashMap;

pub mod correction;
pub mod inference;

#[derive(Debug, Clone)]
pub struct TestResult<T> {
    /// The test statistic value (e.g., z-score)
    pub statistic: T,
    /// The p-value of the test
    pub p_value: T,
    /// Standard error of the test statistic
    pub standard_error: Option<T>,
    /// Additional test-specific information
    pub metadata: HashMap<String, T>,
}

impl<T> TestResult<T>
where
    T: FloatOps,
{
    /// Create a new test result with minimal information
    pub fn new(statistic: T, p_value: T) -> Self {
        TestResult {
            statistic,
            p_value,
            standard_error: None,
            metadata: HashMap::new(),
        }
    }

    /// Add standard error to the result
    pub fn with_standard_error(mut self, se: T) -> Self {
        self.standard_error = Some(se);
        self
    }

    /// Add additional metadata
    pub fn with_metadata(mut self, key: &str, value: T) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }
}
