use std::{
    collections::VecDeque,
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use crisp8_harness::{
    Crisp8OutputTest, OutputTest, OutputTestResult, TestHost, TestSummary, DEFAULT_SEED,
};
use log::{debug, info, warn};

pub const TEST_EXTENSION: &str = "test";
pub const EXPECTED_EXTENSION: &str = "expected";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsTestContext {
    pub test_path: PathBuf,
    pub expected_path: PathBuf,
}

pub type FsTest = Crisp8OutputTest<FsTestContext>;

/// Feeds `.test` files from disk to the runner and reports on stdout.
#[derive(Debug)]
pub struct FsTestHost {
    test_paths: VecDeque<PathBuf>,
    seed: u64,
}

impl FsTestHost {
    pub fn new<P: AsRef<Path>>(search_paths: &[P]) -> anyhow::Result<Self> {
        let mut found = Vec::new();
        for path in search_paths {
            let path = path.as_ref();
            discover(path, &mut found)
                .with_context(|| format!("Failed to search '{}' for tests", path.display()))?;
        }
        found.sort();
        Ok(Self {
            test_paths: found.into(),
            seed: DEFAULT_SEED,
        })
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    pub fn remaining(&self) -> usize {
        self.test_paths.len()
    }
}

fn discover(path: &Path, found: &mut Vec<PathBuf>) -> std::io::Result<()> {
    if path.is_dir() {
        for entry in fs::read_dir(path)? {
            discover(&entry?.path(), found)?;
        }
    } else if path.extension() == Some(OsStr::new(TEST_EXTENSION)) {
        found.push(path.to_path_buf());
    }
    Ok(())
}

/// The sibling file holding the golden output of `test_path`.
pub fn expected_path(test_path: &Path) -> PathBuf {
    test_path.with_extension(EXPECTED_EXTENSION)
}

impl TestHost for FsTestHost {
    type Test = FsTest;
    type Error = anyhow::Error;

    fn load_next_test(&mut self) -> anyhow::Result<Option<FsTest>> {
        let Some(test_path) = self.test_paths.pop_front() else {
            return Ok(None);
        };
        let expected_path = expected_path(&test_path);

        let input = fs::read(&test_path)
            .with_context(|| format!("Failed to read test '{}'", test_path.display()))?;
        let expected = fs::read_to_string(&expected_path).unwrap_or_else(|e| {
            warn!(
                "Couldn't read expected output for test {}: {e}",
                test_path.display()
            );
            String::new()
        });

        let context = FsTestContext {
            test_path,
            expected_path,
        };
        Ok(Some(
            Crisp8OutputTest::with_context(input, expected, context).with_seed(self.seed),
        ))
    }

    fn test_did_start(&mut self, test: &FsTest) {
        debug!("Starting test {}", test.context.test_path.display());
    }

    fn test_did_pass(&mut self, test: &FsTest) {
        info!("Test {} passed.", test.context.test_path.display());
    }

    fn test_did_fail(&mut self, test: &FsTest, result: OutputTestResult) {
        println!("Test {} failed.", test.context.test_path.display());
        match result {
            OutputTestResult::FailedTimeout => println!("Timed out."),
            OutputTestResult::FailedIncorrectResult => {
                println!("Expected result is:");
                println!("{}", test.expected_output());
                println!("Actual result was:");
                println!("{}", test.actual_output().unwrap_or_default());
            }
            OutputTestResult::FailedThrewError => {
                if let Some(error) = test.error() {
                    println!("Test threw error: {error}");
                }
            }
            OutputTestResult::Passed => {}
        }
    }

    fn save_new_baseline(&mut self, test: &FsTest) -> anyhow::Result<()> {
        let path = &test.context.expected_path;
        fs::write(path, test.actual_output().unwrap_or_default())
            .with_context(|| format!("Failed to write baseline '{}'", path.display()))?;
        println!("Rebased {}.", path.display());
        Ok(())
    }

    fn testing_did_finish(&mut self, summary: &TestSummary) {
        println!(
            "Testing finished. {} passed / {} failed / {} rebased.",
            summary.passed, summary.failed, summary.rebased
        );
    }
}
