use std::error::Error;

/// Result with boxed error as trait object, so tests can use `?` on any error.
pub(crate) type TestResult = Result<(), Box<dyn Error + Send + Sync>>;
