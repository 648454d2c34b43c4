//! Conformance flows for the search modal, written as data.
//!
//! A scenario is an ordered list of steps; each step either performs a
//! [`UserAction`] or checks an [`Expectation`] against the current view.

pub mod expect;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{HarnessError, Result};
use crate::widget::{ActionStatus, SearchBackend, SearchSession, SessionSettings, UserAction};

pub use expect::{Expectation, Observed};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Act { act: UserAction },
    Expect { expect: Expectation },
}

impl Scenario {
    pub fn from_yaml(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let source = tokio::fs::read_to_string(path).await?;
        Self::from_yaml(&source).map_err(|e| {
            HarnessError::Application(format!("{}: {e}", path.display()))
        })
    }
}

/// Every `.yaml`/`.yml` file directly inside `dir`, sorted by path.
pub async fn discover(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == "yaml" || e == "yml");
        if is_yaml {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepFailure {
    /// Zero-based step index.
    pub step: usize,
    pub expectation: Expectation,
    pub actual: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    pub name: String,
    pub actions_applied: usize,
    pub actions_ignored: usize,
    pub expectations_checked: usize,
    pub failures: Vec<StepFailure>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Play `scenario` against a freshly opened modal.
pub fn run_scenario(
    scenario: &Scenario,
    backend: &dyn SearchBackend,
    settings: &SessionSettings,
) -> ScenarioReport {
    let mut session = SearchSession::open(settings, backend);
    let mut last_status: Option<ActionStatus> = None;
    let mut report = ScenarioReport {
        name: scenario.name.clone(),
        actions_applied: 0,
        actions_ignored: 0,
        expectations_checked: 0,
        failures: Vec::new(),
    };

    for (index, step) in scenario.steps.iter().enumerate() {
        match step {
            Step::Act { act } => {
                let (next, status) = session.apply(act, backend);
                session = next;
                match status {
                    ActionStatus::Applied => report.actions_applied += 1,
                    ActionStatus::Ignored(_) => report.actions_ignored += 1,
                }
                last_status = Some(status);
            }
            Step::Expect { expect } => {
                report.expectations_checked += 1;
                let view = session.view();
                let observed = Observed {
                    session: &session,
                    view: &view,
                    last_status,
                };
                if let Err(actual) = expect.check(&observed) {
                    tracing::debug!(step = index, ?expect, %actual, "expectation failed");
                    report.failures.push(StepFailure {
                        step: index,
                        expectation: expect.clone(),
                        actual,
                    });
                }
            }
        }
    }

    report
}
