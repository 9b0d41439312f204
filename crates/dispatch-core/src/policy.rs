use std::collections::BTreeSet;
use std::fmt;
use std::ops::Bound;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{ids::ResponderId, report::ValidatedReport};

/// Chooses one responder from the currently available set.
///
/// Contract: the returned id must be a member of `available`; returning `None`
/// means "decline", which the engine reports as no responder available.
pub trait SelectionPolicy: Send {
    fn name(&self) -> &str;
    fn select(&mut self, report: &ValidatedReport, available: &BTreeSet<ResponderId>) -> Option<ResponderId>;
}

/// Lowest id in registry order.
#[derive(Clone, Debug, Default)]
pub struct FirstAvailable;

impl SelectionPolicy for FirstAvailable {
    fn name(&self) -> &str {
        "first_available"
    }

    fn select(&mut self, _report: &ValidatedReport, available: &BTreeSet<ResponderId>) -> Option<ResponderId> {
        available.iter().next().cloned()
    }
}

/// Uniform pick; reproducible for a given seed.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl SelectionPolicy for SeededRandom {
    fn name(&self) -> &str {
        "random"
    }

    fn select(&mut self, _report: &ValidatedReport, available: &BTreeSet<ResponderId>) -> Option<ResponderId> {
        if available.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..available.len());
        available.iter().nth(idx).cloned()
    }
}

/// Picks the next available id after the last one handed out, wrapping around.
#[derive(Clone, Debug, Default)]
pub struct RoundRobin {
    last: Option<ResponderId>,
}

impl SelectionPolicy for RoundRobin {
    fn name(&self) -> &str {
        "round_robin"
    }

    fn select(&mut self, _report: &ValidatedReport, available: &BTreeSet<ResponderId>) -> Option<ResponderId> {
        let next = match &self.last {
            Some(last) => available
                .range((Bound::Excluded(last), Bound::Unbounded))
                .next()
                .or_else(|| available.iter().next()),
            None => available.iter().next(),
        }
        .cloned();
        if next.is_some() {
            self.last = next.clone();
        }
        next
    }
}

/// `available[severity mod n]` over the ordered available set.
#[derive(Clone, Debug, Default)]
pub struct SeverityIndex;

impl SelectionPolicy for SeverityIndex {
    fn name(&self) -> &str {
        "severity_index"
    }

    fn select(&mut self, report: &ValidatedReport, available: &BTreeSet<ResponderId>) -> Option<ResponderId> {
        if available.is_empty() {
            return None;
        }
        let idx = report.severity.rem_euclid(available.len() as i64) as usize;
        available.iter().nth(idx).cloned()
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    FirstAvailable,
    #[default]
    Random,
    RoundRobin,
    SeverityIndex,
}

impl PolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::FirstAvailable => "first_available",
            PolicyKind::Random => "random",
            PolicyKind::RoundRobin => "round_robin",
            PolicyKind::SeverityIndex => "severity_index",
        }
    }

    /// `seed` only affects `Random`.
    pub fn build(self, seed: u64) -> Box<dyn SelectionPolicy> {
        match self {
            PolicyKind::FirstAvailable => Box::new(FirstAvailable),
            PolicyKind::Random => Box::new(SeededRandom::new(seed)),
            PolicyKind::RoundRobin => Box::new(RoundRobin::default()),
            PolicyKind::SeverityIndex => Box::new(SeverityIndex),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown selection policy: {0:?}")]
pub struct ParsePolicyError(pub String);

impl FromStr for PolicyKind {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('-', "_").as_str() {
            "first_available" => Ok(PolicyKind::FirstAvailable),
            "random" => Ok(PolicyKind::Random),
            "round_robin" => Ok(PolicyKind::RoundRobin),
            "severity_index" => Ok(PolicyKind::SeverityIndex),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> BTreeSet<ResponderId> {
        ids.iter().map(|s| ResponderId::from(*s)).collect()
    }

    fn report(severity: i64) -> ValidatedReport {
        ValidatedReport { location: "NYC".into(), severity }
    }

    #[test]
    fn first_available_takes_lowest() {
        let got = FirstAvailable.select(&report(1), &set(&["Lamar", "Joe", "Josh"]));
        assert_eq!(got, Some("Joe".into()));
        assert_eq!(FirstAvailable.select(&report(1), &set(&[])), None);
    }

    #[test]
    fn seeded_random_is_reproducible() {
        let avail = set(&["A", "B", "C", "D", "E"]);
        let mut a = SeededRandom::new(7);
        let mut b = SeededRandom::new(7);
        let xs: Vec<_> = (0..20).map(|_| a.select(&report(1), &avail)).collect();
        let ys: Vec<_> = (0..20).map(|_| b.select(&report(1), &avail)).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|x| x.as_ref().is_some_and(|id| avail.contains(id))));
    }

    #[test]
    fn round_robin_rotates_and_wraps() {
        let avail = set(&["A", "B", "C"]);
        let mut rr = RoundRobin::default();
        let picks: Vec<_> = (0..4).map(|_| rr.select(&report(1), &avail).unwrap().0).collect();
        assert_eq!(picks, vec!["A", "B", "C", "A"]);
    }

    #[test]
    fn round_robin_skips_missing_last() {
        let mut rr = RoundRobin::default();
        assert_eq!(rr.select(&report(1), &set(&["A", "B", "C"])), Some("A".into()));
        // A is busy now; the next pick continues after A
        assert_eq!(rr.select(&report(1), &set(&["B", "C"])), Some("B".into()));
        assert_eq!(rr.select(&report(1), &set(&["A"])), Some("A".into()));
    }

    #[test]
    fn severity_index_wraps_negative() {
        let avail = set(&["A", "B", "C"]);
        assert_eq!(SeverityIndex.select(&report(3), &avail), Some("A".into()));
        assert_eq!(SeverityIndex.select(&report(2), &avail), Some("C".into()));
        assert_eq!(SeverityIndex.select(&report(-1), &avail), Some("C".into()));
    }

    #[test]
    fn policy_kind_parses_and_builds() {
        assert_eq!("round-robin".parse::<PolicyKind>().unwrap(), PolicyKind::RoundRobin);
        assert!("fastest".parse::<PolicyKind>().is_err());
        for kind in [PolicyKind::FirstAvailable, PolicyKind::Random, PolicyKind::RoundRobin, PolicyKind::SeverityIndex] {
            assert_eq!(kind.build(1).name(), kind.as_str());
        }
    }
}
