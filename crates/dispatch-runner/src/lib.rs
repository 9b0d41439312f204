pub mod config;
pub mod dispatcher;
pub mod scenario;
pub mod summary;

pub use config::*;
pub use dispatcher::*;
pub use summary::*;

#[cfg(test)]
mod scenario_tests {
    use super::scenario::*;
    use dispatch_core::ErrorKind;
    use std::path::{Path, PathBuf};

    fn dir(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/scenarios").join(name)
    }

    fn run(name: &str) -> ScenarioResult {
        let p = dir(name);
        let res = simulate(&p).unwrap();
        let exp = load_expected(&p).unwrap();
        assert_eq!(exp.scenario_id, name);
        assert!(exp.mismatches(&res).is_empty(), "{name}: {:?}", exp.mismatches(&res));
        res
    }

    #[test]
    fn scenario_sc01_round_trip_restores_roster() {
        let res = run("SC-01-round-trip");
        let responder = res.summary.items[0].responder.clone().unwrap();
        assert!(["A", "B"].contains(&responder.as_str()));
        assert!(res.final_all_available());
    }

    #[test]
    fn scenario_sc02_full_cycle_all_available() {
        let res = run("SC-02-full-cycle");
        assert_eq!(res.summary.dispatched, 3);
        assert!(res.summary.alerts().all(|a| a.starts_with("ALERT: ")));
    }

    #[test]
    fn scenario_sc03_exhaustion_records_failure() {
        let res = run("SC-03-exhaustion");
        assert_eq!(res.summary.failure_kinds(), vec![ErrorKind::NoResponderAvailable]);
        assert_eq!(res.final_busy(), 2);
    }

    #[test]
    fn scenario_sc04_malformed_reports_do_not_abort() {
        let res = run("SC-04-malformed-batch");
        assert_eq!(res.summary.total, 4);
        assert!(res.summary.items[3].is_dispatched());
    }

    #[test]
    fn scenario_sc05_severity_index_is_deterministic() {
        let res = run("SC-05-severity-index");
        let picks: Vec<_> = res.summary.items.iter().map(|i| i.responder.clone().unwrap().0).collect();
        assert_eq!(picks, vec!["Joe", "Josh", "Lamar"]);
    }
}
