pub mod driver;
pub mod oracle;

pub use driver::{OutputTestRunner, RunnerOptions, TestHost, TestSummary};
pub use oracle::{Crisp8OutputTest, OutputTest, OutputTestResult, DEFAULT_SEED};
