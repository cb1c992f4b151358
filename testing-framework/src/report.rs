// File: testing-framework/src/report.rs
//
// Session reports
//
// A report captures the seed and every recorded failure of a session so a
// failing run can be inspected after the fact and replayed with the same
// fixtures.

use crate::assertions::FailedAssertion;
use crate::orchestrator::TestRng;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Serializable summary of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub test_name: String,
    pub seed: u64,
    /// RFC 3339 timestamp of when the report was taken
    pub generated_at: String,
    pub failures: Vec<FailedAssertion>,
    /// Shell command reproducing this run
    pub replay: String,
}

impl SessionReport {
    pub fn new(test_name: impl Into<String>, seed: u64, failures: &[FailedAssertion]) -> Self {
        let test_name = test_name.into();
        Self {
            replay: Self::replay_command(&test_name, seed),
            test_name,
            seed,
            generated_at: chrono::Utc::now().to_rfc3339(),
            failures: failures.to_vec(),
        }
    }

    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Command that reruns `test_name` with `seed`
    ///
    /// ```rust
    /// use seeded_testing_framework::report::SessionReport;
    ///
    /// assert_eq!(
    ///     SessionReport::replay_command("checkout_flow", 42),
    ///     "FIXTURE_TEST_SEED=0x000000000000002a cargo test checkout_flow"
    /// );
    /// ```
    pub fn replay_command(test_name: &str, seed: u64) -> String {
        format!(
            "{}=0x{:016x} cargo test {}",
            TestRng::SEED_ENV_VAR,
            seed,
            test_name
        )
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize session report")
    }

    /// Write the report as `<test_name>_<timestamp>.json` under `output_dir`
    pub async fn save(&self, output_dir: impl AsRef<Path>) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir)
            .await
            .context("Failed to create report directory")?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let stem: String = self
            .test_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        let filepath = output_dir.join(format!("{}_{}.json", stem, timestamp));

        let json = self.to_json()?;
        let mut file = fs::File::create(&filepath)
            .await
            .context("Failed to create report file")?;
        file.write_all(json.as_bytes())
            .await
            .context("Failed to write report data")?;
        file.flush().await.context("Failed to flush report file")?;

        Ok(filepath)
    }

    /// Print a boxed summary to stdout
    pub fn print_summary(&self) {
        println!("╔════════════════════════════════════════════════════════════════╗");
        println!("║              FIXTURE SESSION REPORT                            ║");
        println!("╠════════════════════════════════════════════════════════════════╣");
        println!("║ Test Name:     {:47} ║", self.test_name);
        println!("║ Generated:     {:47} ║", self.generated_at);
        println!("║ Seed:          {:47} ║", format!("0x{:016x}", self.seed));
        println!(
            "║ Failures:      {:47} ║",
            format!("{} recorded", self.failures.len())
        );

        for failure in &self.failures {
            println!("╠════════════════════════════════════════════════════════════════╣");
            for line in textwrap::wrap(&failure.to_string(), 62) {
                println!("║ {:62} ║", line);
            }
        }

        println!("╠════════════════════════════════════════════════════════════════╣");
        println!("║ REPLAY:                                                        ║");
        for line in textwrap::wrap(&self.replay, 62) {
            println!("║ {:62} ║", line);
        }
        println!("╚════════════════════════════════════════════════════════════════╝");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn failing_report() -> SessionReport {
        let failures = vec![
            FailedAssertion::new(Value::from("x"), Value::from("y"), 0xdeadbeef, "mismatch")
                .at_iteration(0),
        ];
        SessionReport::new("report_test", 0xdeadbeef, &failures)
    }

    #[test]
    fn test_report_json_shape() {
        let report = failing_report();
        assert!(!report.passed());

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["seed"], 0xdeadbeef_u64);
        assert_eq!(json["failures"][0]["actual"], "x");
        assert_eq!(json["failures"][0]["expected"], "y");
        assert_eq!(json["failures"][0]["iteration"], 0);
        assert!(json["replay"]
            .as_str()
            .unwrap()
            .starts_with("FIXTURE_TEST_SEED=0x00000000deadbeef"));
    }

    #[tokio::test]
    async fn test_save_writes_json() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let report = SessionReport::new("module::case", 7, &[]);

        let path = report.save(temp_dir.path()).await?;
        assert!(path.exists());
        assert!(path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("module__case_")));

        let content = fs::read_to_string(&path).await?;
        let json: serde_json::Value = serde_json::from_str(&content)?;
        assert_eq!(json["test_name"], "module::case");
        assert_eq!(json["failures"].as_array().map(Vec::len), Some(0));
        Ok(())
    }

    #[test]
    fn test_print_summary() {
        failing_report().print_summary();
    }
}
