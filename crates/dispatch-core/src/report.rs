use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// An incoming report as received: any JSON object. Only `location` and
/// `severity` are read; other fields are carried but ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawReport(pub Map<String, Value>);

impl RawReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl TryFrom<Value> for RawReport {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ValidationError::NotAnObject),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedReport {
    pub location: String,
    pub severity: i64,
}

pub fn parse_emergency_report(report: &RawReport) -> Result<ValidatedReport, ValidationError> {
    let location = report.get("location").ok_or(ValidationError::MissingField("location"))?;
    let severity = report.get("severity").ok_or(ValidationError::MissingField("severity"))?;
    Ok(ValidatedReport {
        location: render_location(location)?,
        severity: severity_int(severity)?,
    })
}

/// Scalars are accepted as locations and rendered as their JSON text.
pub fn render_location(v: &Value) -> Result<String, ValidationError> {
    match v {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(ValidationError::InvalidLocation(other.to_string())),
    }
}

/// Integer conversion: integers as-is, floats truncated toward zero, booleans
/// as 1/0, strings trimmed and parsed base-10.
fn severity_int(v: &Value) -> Result<i64, ValidationError> {
    let invalid = || ValidationError::InvalidSeverity(v.to_string());
    match v {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                // u64 beyond i64::MAX also lands here and fails the range check
                Some(f) if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f.trunc() as i64),
                _ => Err(invalid()),
            }
        }
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}
