use std::error::Error;

use crisp8_machine::{Crisp8, ExecutionError, RunStats, CYCLE_LIMIT, HALT_ADDRESS};
use log::debug;
use rand::{rngs::StdRng, SeedableRng};
use strum::Display;

/// Seed for the `CXNN` random stream when a test does not pick one.
pub const DEFAULT_SEED: u64 = 0xC8;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputTestResult {
    #[strum(serialize = "passed")]
    Passed,
    #[strum(serialize = "failed-incorrect-result")]
    FailedIncorrectResult,
    #[strum(serialize = "failed-timeout")]
    FailedTimeout,
    #[strum(serialize = "failed-threw-error")]
    FailedThrewError,
}

/// What the driver needs to know about a test.
pub trait OutputTest {
    fn run_test(&mut self) -> OutputTestResult;

    /// `None` until the test has run.
    fn result(&self) -> Option<OutputTestResult>;

    fn expected_output(&self) -> &str;

    /// The dump, or the text of a domain error. `None` when the test threw.
    fn actual_output(&self) -> Option<&str>;

    fn error(&self) -> Option<&(dyn Error + 'static)>;
}

/// Runs one ROM to the halt sentinel and compares the final dump with the
/// expected text. `C` is whatever the host wants to carry along (paths).
#[derive(Debug, Clone)]
pub struct Crisp8OutputTest<C = ()> {
    input: Vec<u8>,
    expected_output: String,
    seed: u64,
    actual_output: Option<String>,
    result: Option<OutputTestResult>,
    error: Option<ExecutionError>,
    cycles: usize,
    pub context: C,
}

impl Crisp8OutputTest<()> {
    pub fn new(input: Vec<u8>, expected_output: impl Into<String>) -> Self {
        Self::with_context(input, expected_output, ())
    }
}

impl<C> Crisp8OutputTest<C> {
    pub fn with_context(input: Vec<u8>, expected_output: impl Into<String>, context: C) -> Self {
        Self {
            input,
            expected_output: expected_output.into(),
            seed: DEFAULT_SEED,
            actual_output: None,
            result: None,
            error: None,
            cycles: 0,
            context,
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn input(&self) -> &[u8] {
        &self.input
    }

    /// Instructions executed by the last run that did not stop on an error.
    pub fn cycles(&self) -> usize {
        self.cycles
    }

    pub fn execution_error(&self) -> Option<&ExecutionError> {
        self.error.as_ref()
    }

    fn execute(&self) -> Result<(String, RunStats), ExecutionError> {
        let mut machine = Crisp8::new(StdRng::seed_from_u64(self.seed));
        machine.load_rom(&self.input)?;
        let stats = machine.run_until(HALT_ADDRESS, CYCLE_LIMIT)?;
        Ok((machine.debug_string(), stats))
    }

    fn compare(&self) -> OutputTestResult {
        if self.actual_output.as_deref() == Some(self.expected_output.as_str()) {
            OutputTestResult::Passed
        } else {
            OutputTestResult::FailedIncorrectResult
        }
    }
}

impl<C> OutputTest for Crisp8OutputTest<C> {
    fn run_test(&mut self) -> OutputTestResult {
        self.actual_output = None;
        self.error = None;
        self.cycles = 0;

        let result = match self.execute() {
            Ok((output, stats)) => {
                self.cycles = stats.cycles;
                self.actual_output = Some(output);
                if stats.halted {
                    self.compare()
                } else {
                    OutputTestResult::FailedTimeout
                }
            }
            Err(error) if error.is_domain() => {
                self.actual_output = Some(error.to_string());
                self.compare()
            }
            Err(error) => {
                self.error = Some(error);
                OutputTestResult::FailedThrewError
            }
        };

        debug!("output test finished: {result} after {} cycles", self.cycles);
        self.result = Some(result);
        result
    }

    fn result(&self) -> Option<OutputTestResult> {
        self.result
    }

    fn expected_output(&self) -> &str {
        &self.expected_output
    }

    fn actual_output(&self) -> Option<&str> {
        self.actual_output.as_deref()
    }

    fn error(&self) -> Option<&(dyn Error + 'static)> {
        self.error.as_ref().map(|error| error as &(dyn Error + 'static))
    }
}
