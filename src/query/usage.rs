//! Lenient parsing of "<number> <unit>" usage strings.

use serde::Serialize;

pub const UNKNOWN_UNIT: &str = "Unknown";

/// Result of parsing one forecasted-usage cell.
///
/// `Unparsed` is kept distinct from a genuine zero; only [`Self::magnitude`]
/// and [`Self::unit`] collapse it to `0.0` / `"Unknown"` for display and
/// ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UsageQuantity {
    Parsed { magnitude: f64, unit: Option<String> },
    Unparsed,
}

impl UsageQuantity {
    pub fn magnitude(&self) -> f64 {
        match self {
            Self::Parsed { magnitude, .. } => *magnitude,
            Self::Unparsed => 0.0,
        }
    }

    pub fn unit(&self) -> &str {
        match self {
            Self::Parsed {
                unit: Some(unit), ..
            } => unit,
            _ => UNKNOWN_UNIT,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed { .. })
    }
}

/// Parses a usage cell. `None` stands for a null or non-text cell.
///
/// The value is trimmed and split at its first run of whitespace; the first
/// part must be a finite number and the rest, if any, is the unit. Anything
/// else is [`UsageQuantity::Unparsed`].
pub fn parse_usage(value: Option<&str>) -> UsageQuantity {
    let Some(value) = value else {
        return UsageQuantity::Unparsed;
    };
    let value = value.trim();
    let (number, unit) = match value.split_once(char::is_whitespace) {
        Some((number, rest)) => (number, Some(rest.trim_start())),
        None => (value, None),
    };

    match number.parse::<f64>() {
        Ok(magnitude) if magnitude.is_finite() => UsageQuantity::Parsed {
            magnitude,
            unit: unit.filter(|u| !u.is_empty()).map(str::to_owned),
        },
        _ => UsageQuantity::Unparsed,
    }
}
