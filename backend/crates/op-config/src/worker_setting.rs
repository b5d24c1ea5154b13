use crate::AUTO_WORKERS;

use std::fmt;
use std::str::FromStr;

/// Requested server worker count.
///
/// `Explicit` keeps the text exactly as configured (`007`, `+3`, `-1`,
/// values beyond any machine integer) and is forwarded to the server
/// untouched; range checks belong to the server.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WorkerSetting {
    /// Derive the count from host parallelism
    #[default]
    Auto,
    Explicit(String),
}

impl FromStr for WorkerSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(AUTO_WORKERS) {
            return Ok(WorkerSetting::Auto);
        }

        if !is_integer_shaped(trimmed) {
            return Err(format!("expected an integer or '{AUTO_WORKERS}'"));
        }

        Ok(WorkerSetting::Explicit(trimmed.to_string()))
    }
}

impl fmt::Display for WorkerSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerSetting::Auto => f.write_str(AUTO_WORKERS),
            WorkerSetting::Explicit(count) => f.write_str(count),
        }
    }
}

/// Optional sign followed by at least one ASCII digit.
fn is_integer_shaped(value: &str) -> bool {
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
