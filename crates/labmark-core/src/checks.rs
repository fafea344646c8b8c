//! CI check-run aggregation.

use serde::{Deserialize, Serialize};

use labmark_hosting::{CheckConclusion, CheckRun};

/// Terminal pass/fail symbol written into a grade cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Passed,
    Failed,
}

impl Verdict {
    /// The symbol recorded in the gradebook.
    pub fn symbol(&self) -> &'static str {
        match self {
            Verdict::Passed => "✓",
            Verdict::Failed => "✗",
        }
    }
}

/// Aggregated view of all check runs for a commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    /// One human-readable line per check: status glyph, name, detail link.
    pub summary: Vec<String>,

    /// Number of checks that concluded with success.
    pub passed: usize,

    /// Total number of check runs.
    pub total: usize,
}

impl CheckReport {
    /// Aggregate a commit's check runs.
    pub fn from_runs(runs: &[CheckRun]) -> Self {
        let mut summary = Vec::with_capacity(runs.len());
        let mut passed = 0;

        for run in runs {
            let glyph = match run.conclusion {
                CheckConclusion::Success => {
                    passed += 1;
                    "✅"
                }
                CheckConclusion::Failure => "❌",
                CheckConclusion::Other => "⏳",
            };
            let link = run.details_url.as_deref().unwrap_or("no details");
            summary.push(format!("{glyph} {} - {link}", run.name));
        }

        CheckReport {
            summary,
            passed,
            total: runs.len(),
        }
    }

    /// Final verdict: passed only when every check concluded successfully
    /// and at least one check ran. Callers must treat `total == 0` as the
    /// pending state instead of asking for a verdict.
    pub fn verdict(&self) -> Verdict {
        if self.total > 0 && self.passed == self.total {
            Verdict::Passed
        } else {
            Verdict::Failed
        }
    }

    /// Fraction string, e.g. "2/3".
    pub fn fraction(&self) -> String {
        format!("{}/{}", self.passed, self.total)
    }
}
