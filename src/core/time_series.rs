//! Univariate time series with optional calendar index.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Datelike, Duration, Months, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;

/// Sampling frequency of a regularly spaced series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Yearly,
    Quarterly,
    Monthly,
    Weekly,
    Daily,
    /// Monday to Friday.
    BusinessDaily,
    Hourly,
}

impl Frequency {
    /// Number of observations in one seasonal cycle.
    pub fn period(&self) -> usize {
        match self {
            Frequency::Yearly => 1,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
            Frequency::Weekly => 52,
            Frequency::Daily => 7,
            Frequency::BusinessDaily => 5,
            Frequency::Hourly => 24,
        }
    }

    /// Timestamp one period after `ts`.
    pub fn advance(&self, ts: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Frequency::Yearly => ts.checked_add_months(Months::new(12)),
            Frequency::Quarterly => ts.checked_add_months(Months::new(3)),
            Frequency::Monthly => ts.checked_add_months(Months::new(1)),
            Frequency::Weekly => ts.checked_add_signed(Duration::weeks(1)),
            Frequency::Daily => ts.checked_add_signed(Duration::days(1)),
            Frequency::BusinessDaily => {
                let skip = match ts.weekday() {
                    Weekday::Fri => 3,
                    Weekday::Sat => 2,
                    _ => 1,
                };
                ts.checked_add_signed(Duration::days(skip))
            }
            Frequency::Hourly => ts.checked_add_signed(Duration::hours(1)),
        }
    }

    /// Classify a spacing in seconds.
    fn from_spacing(seconds: i64) -> Option<Self> {
        let days = seconds as f64 / DAY as f64;
        match seconds {
            HOUR => Some(Frequency::Hourly),
            DAY => Some(Frequency::Daily),
            s if s == 7 * DAY => Some(Frequency::Weekly),
            _ if (28.0..=31.0).contains(&days) => Some(Frequency::Monthly),
            _ if (89.0..=92.0).contains(&days) => Some(Frequency::Quarterly),
            _ if (365.0..=366.0).contains(&days) => Some(Frequency::Yearly),
            _ => None,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Frequency::Yearly => "Y",
            Frequency::Quarterly => "Q",
            Frequency::Monthly => "M",
            Frequency::Weekly => "W",
            Frequency::Daily => "D",
            Frequency::BusinessDaily => "B",
            Frequency::Hourly => "H",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for Frequency {
    type Err = ForecastError;

    /// Parse a pandas-style frequency code, e.g. `"M"`, `"QS"`, `"W-SUN"`.
    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        let base = upper.split('-').next().unwrap_or("");
        let base = base.trim_end_matches('S').trim_end_matches('E');
        match base {
            "Y" | "A" | "BY" | "BA" => Ok(Frequency::Yearly),
            "Q" | "BQ" => Ok(Frequency::Quarterly),
            "M" | "BM" => Ok(Frequency::Monthly),
            "W" => Ok(Frequency::Weekly),
            "D" => Ok(Frequency::Daily),
            "B" => Ok(Frequency::BusinessDaily),
            "H" => Ok(Frequency::Hourly),
            _ => Err(ForecastError::FrequencyInference(format!(
                "unrecognized frequency '{}'",
                s
            ))),
        }
    }
}

/// An ordered sequence of finite observations.
///
/// Timestamps are optional. When present they must be strictly increasing
/// and have the same length as the values.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    values: Vec<f64>,
    timestamps: Option<Vec<DateTime<Utc>>>,
    frequency: Option<Frequency>,
    name: Option<String>,
}

impl TimeSeries {
    /// Create a series indexed by timestamps.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: values.len(),
                got: timestamps.len(),
            });
        }
        for i in 1..timestamps.len() {
            if timestamps[i] <= timestamps[i - 1] {
                return Err(ForecastError::TimestampError(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }
        let mut series = Self::from_values(values)?;
        series.timestamps = Some(timestamps);
        Ok(series)
    }

    /// Create a series from values alone, indexed by position.
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::MissingValues);
        }
        Ok(Self {
            values,
            timestamps: None,
            frequency: None,
            name: None,
        })
    }

    /// Attach frequency metadata.
    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn timestamps(&self) -> Option<&[DateTime<Utc>]> {
        self.timestamps.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Frequency set explicitly with [`TimeSeries::with_frequency`].
    pub fn frequency(&self) -> Option<Frequency> {
        self.frequency
    }

    /// Seasonal period from explicit frequency, falling back to the one
    /// inferred from timestamps.
    pub fn seasonal_period(&self) -> Option<usize> {
        self.frequency
            .or_else(|| self.infer_frequency().ok())
            .map(|f| f.period())
    }

    /// Infer the sampling frequency from timestamp spacing.
    ///
    /// The modal spacing determines the frequency. Every spacing must map to
    /// the same frequency, otherwise the index has gaps. A daily modal
    /// spacing whose only other gaps are weekends is business-daily.
    pub fn infer_frequency(&self) -> Result<Frequency> {
        let timestamps = self.timestamps.as_deref().ok_or_else(|| {
            ForecastError::FrequencyInference("series has no timestamps".to_string())
        })?;
        if timestamps.len() < 2 {
            return Err(ForecastError::FrequencyInference(format!(
                "need at least 2 timestamps, got {}",
                timestamps.len()
            )));
        }

        let diffs: Vec<i64> = timestamps
            .windows(2)
            .map(|w| (w[1] - w[0]).num_seconds())
            .collect();

        let mut counts: HashMap<i64, usize> = HashMap::new();
        for &diff in &diffs {
            *counts.entry(diff).or_insert(0) += 1;
        }
        let modal_diff = counts
            .iter()
            .max_by_key(|&(&diff, &count)| (count, -diff))
            .map(|(&diff, _)| diff)
            .ok_or_else(|| ForecastError::FrequencyInference("empty spacing data".to_string()))?;

        let modal = Frequency::from_spacing(modal_diff).ok_or_else(|| {
            ForecastError::FrequencyInference(format!(
                "unsupported spacing of {} seconds",
                modal_diff
            ))
        })?;

        if modal == Frequency::Daily && diffs.iter().any(|&d| d != DAY) {
            let business = timestamps
                .iter()
                .all(|t| !matches!(t.weekday(), Weekday::Sat | Weekday::Sun))
                && timestamps
                    .windows(2)
                    .all(|w| Frequency::BusinessDaily.advance(w[0]) == Some(w[1]));
            if business {
                return Ok(Frequency::BusinessDaily);
            }
        }

        if diffs.iter().any(|&d| Frequency::from_spacing(d) != Some(modal)) {
            return Err(ForecastError::FrequencyInference(
                "timestamps are not regularly spaced".to_string(),
            ));
        }

        Ok(modal)
    }

    /// Timestamps for `horizon` steps after the last observation.
    pub fn future_timestamps(&self, horizon: usize) -> Result<Vec<DateTime<Utc>>> {
        let frequency = match self.frequency {
            Some(f) => f,
            None => self.infer_frequency()?,
        };
        let mut current = self
            .timestamps
            .as_deref()
            .and_then(|t| t.last().copied())
            .ok_or_else(|| {
                ForecastError::FrequencyInference("series has no timestamps".to_string())
            })?;

        let mut out = Vec::with_capacity(horizon);
        for _ in 0..horizon {
            current = frequency.advance(current).ok_or_else(|| {
                ForecastError::TimestampError("timestamp out of range".to_string())
            })?;
            out.push(current);
        }
        Ok(out)
    }
}
