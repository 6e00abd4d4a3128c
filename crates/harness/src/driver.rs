use log::debug;

use crate::oracle::{OutputTest, OutputTestResult};

/// Everything platform specific about a test run: where tests come from,
/// how progress is reported and where new baselines go.
pub trait TestHost {
    type Test: OutputTest;
    type Error;

    /// `Ok(None)` once the source is exhausted.
    fn load_next_test(&mut self) -> Result<Option<Self::Test>, Self::Error>;

    fn test_did_start(&mut self, _test: &Self::Test) {}

    fn test_did_pass(&mut self, _test: &Self::Test) {}

    fn test_did_fail(&mut self, test: &Self::Test, result: OutputTestResult);

    /// Accept the actual output of `test` as its new expected output.
    fn save_new_baseline(&mut self, test: &Self::Test) -> Result<(), Self::Error>;

    fn testing_did_finish(&mut self, _summary: &TestSummary) {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunnerOptions {
    pub rebase: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestSummary {
    pub passed: usize,
    pub failed: usize,
    pub rebased: usize,
}

impl TestSummary {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

#[derive(Debug, Default)]
pub struct OutputTestRunner {
    options: RunnerOptions,
    summary: TestSummary,
}

impl OutputTestRunner {
    pub fn new(options: RunnerOptions) -> Self {
        Self {
            options,
            summary: TestSummary::default(),
        }
    }

    pub fn run<H: TestHost>(&mut self, host: &mut H) -> Result<TestSummary, H::Error> {
        while let Some(mut test) = host.load_next_test()? {
            host.test_did_start(&test);

            match test.run_test() {
                OutputTestResult::Passed => {
                    self.summary.passed += 1;
                    host.test_did_pass(&test);
                }
                OutputTestResult::FailedIncorrectResult if self.options.rebase => {
                    self.summary.rebased += 1;
                    host.save_new_baseline(&test)?;
                }
                result => {
                    self.summary.failed += 1;
                    host.test_did_fail(&test, result);
                }
            }
        }

        debug!("testing finished: {:?}", self.summary);
        host.testing_did_finish(&self.summary);
        Ok(self.summary)
    }

    pub fn passed_test_count(&self) -> usize {
        self.summary.passed
    }

    pub fn failed_test_count(&self) -> usize {
        self.summary.failed
    }

    pub fn rebased_test_count(&self) -> usize {
        self.summary.rebased
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, error::Error};

    use super::*;

    /// Canned test that reports a fixed result.
    struct FixedTest {
        name: &'static str,
        result: OutputTestResult,
    }

    impl OutputTest for FixedTest {
        fn run_test(&mut self) -> OutputTestResult {
            self.result
        }

        fn result(&self) -> Option<OutputTestResult> {
            Some(self.result)
        }

        fn expected_output(&self) -> &str {
            ""
        }

        fn actual_output(&self) -> Option<&str> {
            Some(self.name)
        }

        fn error(&self) -> Option<&(dyn Error + 'static)> {
            None
        }
    }

    #[derive(Default)]
    struct RecordingHost {
        queue: VecDeque<FixedTest>,
        events: Vec<String>,
        fail_baseline: bool,
    }

    impl RecordingHost {
        fn with_results(results: &[(&'static str, OutputTestResult)]) -> Self {
            Self {
                queue: results
                    .iter()
                    .map(|&(name, result)| FixedTest { name, result })
                    .collect(),
                ..Default::default()
            }
        }
    }

    impl TestHost for RecordingHost {
        type Test = FixedTest;
        type Error = String;

        fn load_next_test(&mut self) -> Result<Option<FixedTest>, String> {
            Ok(self.queue.pop_front())
        }

        fn test_did_start(&mut self, test: &FixedTest) {
            self.events.push(format!("start {}", test.name));
        }

        fn test_did_pass(&mut self, test: &FixedTest) {
            self.events.push(format!("pass {}", test.name));
        }

        fn test_did_fail(&mut self, test: &FixedTest, result: OutputTestResult) {
            self.events.push(format!("fail {} {result}", test.name));
        }

        fn save_new_baseline(&mut self, test: &FixedTest) -> Result<(), String> {
            if self.fail_baseline {
                return Err(format!("cannot write {}", test.name));
            }
            self.events.push(format!("rebase {}", test.name));
            Ok(())
        }

        fn testing_did_finish(&mut self, summary: &TestSummary) {
            self.events.push(format!(
                "finish {}/{}/{}",
                summary.passed, summary.failed, summary.rebased
            ));
        }
    }

    fn mixed_host() -> RecordingHost {
        RecordingHost::with_results(&[
            ("a", OutputTestResult::Passed),
            ("b", OutputTestResult::FailedIncorrectResult),
            ("c", OutputTestResult::FailedTimeout),
            ("d", OutputTestResult::FailedThrewError),
        ])
    }

    #[test]
    fn test_tally_without_rebase() {
        let mut host = mixed_host();
        let mut runner = OutputTestRunner::new(RunnerOptions::default());
        let summary = runner.run(&mut host).unwrap();

        assert_eq!(
            summary,
            TestSummary {
                passed: 1,
                failed: 3,
                rebased: 0
            }
        );
        assert!(!summary.all_passed());
        assert_eq!(
            host.events,
            [
                "start a",
                "pass a",
                "start b",
                "fail b failed-incorrect-result",
                "start c",
                "fail c failed-timeout",
                "start d",
                "fail d failed-threw-error",
                "finish 1/3/0",
            ]
        );
    }

    #[test]
    fn test_rebase_only_takes_incorrect_results() {
        let mut host = mixed_host();
        let mut runner = OutputTestRunner::new(RunnerOptions { rebase: true });
        let summary = runner.run(&mut host).unwrap();

        assert_eq!(runner.passed_test_count(), 1);
        assert_eq!(runner.rebased_test_count(), 1);
        assert_eq!(runner.failed_test_count(), 2);
        assert_eq!(summary.rebased, 1);
        assert!(host.events.contains(&"rebase b".to_string()));
        assert!(host.events.contains(&"fail c failed-timeout".to_string()));
    }

    #[test]
    fn test_empty_source() {
        let mut host = RecordingHost::default();
        let summary = OutputTestRunner::default().run(&mut host).unwrap();

        assert_eq!(summary, TestSummary::default());
        assert!(summary.all_passed());
        assert_eq!(host.events, ["finish 0/0/0"]);
    }

    #[test]
    fn test_baseline_error_stops_run() {
        let mut host = mixed_host();
        host.fail_baseline = true;
        let mut runner = OutputTestRunner::new(RunnerOptions { rebase: true });

        assert_eq!(runner.run(&mut host), Err("cannot write b".to_string()));
        assert_eq!(host.queue.len(), 2);
    }
}
