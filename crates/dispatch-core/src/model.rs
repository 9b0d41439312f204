use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Availability of a single responder. Exactly one per registered id.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ResponderStatus {
    Available,
    Busy,
}

impl ResponderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponderStatus::Available => "available",
            ResponderStatus::Busy => "busy",
        }
    }
}

impl fmt::Display for ResponderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown responder status: {0:?} (expected available or busy)")]
pub struct ParseStatusError(pub String);

impl FromStr for ResponderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(ResponderStatus::Available),
            "busy" => Ok(ResponderStatus::Busy),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(" Busy ".parse::<ResponderStatus>().unwrap(), ResponderStatus::Busy);
        assert_eq!("available".parse::<ResponderStatus>().unwrap(), ResponderStatus::Available);
        assert!("offline".parse::<ResponderStatus>().is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        let s = serde_json::to_string(&ResponderStatus::Busy).unwrap();
        assert_eq!(s, "\"busy\"");
        assert_eq!(ResponderStatus::Available.to_string(), "available");
    }
}
