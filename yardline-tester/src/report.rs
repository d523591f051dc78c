//! Report rendering for scenario runs.

use colored::Colorize;
use serde::Serialize;
use std::fmt::Write as _;

use crate::scenario::ScenarioOutcome;

/// A full harness run, serializable for the JSON report format.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub generated_at: String,
    pub seed: u64,
    pub sim_minutes: u64,
    pub scenarios: Vec<ScenarioOutcome>,
}

impl RunReport {
    #[must_use]
    pub fn new(seed: u64, sim_minutes: u64, scenarios: Vec<ScenarioOutcome>) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            seed,
            sim_minutes,
            scenarios,
        }
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.scenarios.iter().all(|outcome| outcome.passed)
    }

    /// Colored console summary.
    #[must_use]
    pub fn render_console(&self) -> String {
        let mut out = String::new();
        for outcome in &self.scenarios {
            let verdict = if outcome.passed {
                "PASS".green().bold()
            } else {
                "FAIL".red().bold()
            };
            let _ = writeln!(
                out,
                "{verdict} {} ({} ms simulated)",
                outcome.scenario.bold(),
                outcome.simulated_millis
            );
            for check in &outcome.checks {
                let mark = if check.passed {
                    "ok".green()
                } else {
                    "failed".red()
                };
                let _ = write!(out, "  - {}: {mark}", check.name);
                if let Some(detail) = &check.detail {
                    let _ = write!(out, " ({detail})");
                }
                let _ = writeln!(out);
            }
        }
        let summary = format!(
            "{}/{} scenarios passed",
            self.scenarios.iter().filter(|o| o.passed).count(),
            self.scenarios.len()
        );
        let _ = writeln!(
            out,
            "{}",
            if self.all_passed() {
                summary.green().to_string()
            } else {
                summary.red().to_string()
            }
        );
        out
    }

    /// Pretty JSON report.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Check;

    fn outcome(passed: bool) -> ScenarioOutcome {
        ScenarioOutcome {
            scenario: "smoke".to_string(),
            passed,
            checks: vec![Check {
                name: "something".to_string(),
                passed,
                detail: None,
            }],
            simulated_millis: 5_000,
        }
    }

    #[test]
    fn console_report_counts_passes() {
        let report = RunReport::new(1, 2, vec![outcome(true), outcome(false)]);
        assert!(!report.all_passed());
        let rendered = report.render_console();
        assert!(rendered.contains("1/2 scenarios passed"));
    }

    #[test]
    fn json_report_round_trips() {
        let report = RunReport::new(1, 2, vec![outcome(true)]);
        let json = report.render_json().expect("serializes");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parses");
        assert_eq!(value["scenarios"][0]["scenario"], "smoke");
    }
}
