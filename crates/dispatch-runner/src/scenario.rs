use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use dispatch_core::{ErrorKind, PolicyKind};

use crate::{BatchSummary, Config, Dispatcher, ReleaseMode, RosterConfig, SelectionConfig};

/// `scenario.yaml`: a roster, a policy and a batch of raw reports.
#[derive(Debug, Deserialize)]
pub struct ScenarioInput {
    pub responders: Vec<String>,
    #[serde(default)]
    pub policy: PolicyKind,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub release: ReleaseMode,
    pub reports: Vec<Value>,
}

/// `expected.yaml`.
#[derive(Debug, Deserialize)]
pub struct ScenarioExpected {
    pub scenario_id: String,
    pub dispatched: usize,
    pub failed: usize,
    #[serde(default)]
    pub failure_kinds: Vec<ErrorKind>,
    pub final_all_available: bool,
    #[serde(default)]
    pub final_busy: Option<usize>,
}

#[derive(Debug)]
pub struct ScenarioResult {
    pub summary: BatchSummary,
}

impl ScenarioResult {
    pub fn final_all_available(&self) -> bool {
        self.summary.final_statuses.all_available()
    }

    pub fn final_busy(&self) -> usize {
        self.summary.final_statuses.busy_ids().len()
    }
}

impl ScenarioExpected {
    /// Human-readable differences; empty when the run matched.
    pub fn mismatches(&self, res: &ScenarioResult) -> Vec<String> {
        let mut out = Vec::new();
        let s = &res.summary;
        if s.dispatched != self.dispatched {
            out.push(format!("dispatched: expected {} got {}", self.dispatched, s.dispatched));
        }
        if s.failed != self.failed {
            out.push(format!("failed: expected {} got {}", self.failed, s.failed));
        }
        if s.failure_kinds() != self.failure_kinds {
            out.push(format!("failure_kinds: expected {:?} got {:?}", self.failure_kinds, s.failure_kinds()));
        }
        if res.final_all_available() != self.final_all_available {
            out.push(format!(
                "final_all_available: expected {} got {}",
                self.final_all_available,
                res.final_all_available()
            ));
        }
        if let Some(busy) = self.final_busy {
            if res.final_busy() != busy {
                out.push(format!("final_busy: expected {} got {}", busy, res.final_busy()));
            }
        }
        out
    }
}

pub fn load_input(dir: &Path) -> Result<ScenarioInput> {
    let p = dir.join("scenario.yaml");
    let s = std::fs::read_to_string(&p).with_context(|| format!("read scenario.yaml: {}", p.display()))?;
    let input: ScenarioInput = serde_yaml::from_str(&s).with_context(|| "parse scenario.yaml")?;
    Ok(input)
}

pub fn load_expected(dir: &Path) -> Result<ScenarioExpected> {
    let p = dir.join("expected.yaml");
    let s = std::fs::read_to_string(&p).with_context(|| format!("read expected.yaml: {}", p.display()))?;
    let exp: ScenarioExpected = serde_yaml::from_str(&s).with_context(|| "parse expected.yaml")?;
    Ok(exp)
}

/// Replays a fixture directory through a fresh dispatcher.
pub fn simulate(dir: &Path) -> Result<ScenarioResult> {
    let input = load_input(dir)?;
    let cfg = Config {
        roster: RosterConfig { responders: input.responders },
        selection: SelectionConfig { policy: input.policy, seed: input.seed },
        alert: Default::default(),
    };
    let dispatcher = Dispatcher::from_config(&cfg);
    let summary = dispatcher.run_batch(&input.reports, input.release)?;
    Ok(ScenarioResult { summary })
}
