use crate::error::CheckError;
use crate::models::volume::LogicalVolume;
use chrono::{DateTime, FixedOffset, TimeDelta, Utc};

pub const DEFAULT_AGE_WARN_SECS: u64 = 24 * 60 * 60;
pub const DEFAULT_AGE_CRIT_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeThresholds {
    pub warn_secs: u64,
    pub crit_secs: u64,
}

impl AgeThresholds {
    /// With warn above crit, warnings can never fire.
    pub fn is_inverted(&self) -> bool { self.warn_secs > self.crit_secs }

    pub fn warn_if_inverted(&self) {
        if self.is_inverted() {
            tracing::warn!(
                warn = self.warn_secs,
                crit = self.crit_secs,
                "snapshot warn threshold is above the critical one; warnings will never fire"
            );
        }
    }
}

impl Default for AgeThresholds {
    fn default() -> Self {
        Self { warn_secs: DEFAULT_AGE_WARN_SECS, crit_secs: DEFAULT_AGE_CRIT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub severity: Severity,
    pub volume:   String,
    pub message:  String,
}

/// Age verdict for one LV. `Ok(None)` means nothing to report, which is
/// also the answer for anything that is not a snapshot.
pub fn classify(
    lv:  &LogicalVolume,
    now: DateTime<Utc>,
    thr: &AgeThresholds,
) -> Result<Option<Alert>, CheckError> {
    if !lv.is_snapshot() {
        return Ok(None);
    }

    let created = lv.time.as_deref()
        .and_then(parse_lv_time)
        .ok_or_else(|| CheckError::BadTimestamp {
            volume: lv.full_name.clone(),
            value:  lv.time.clone(),
        })?;
    let age = now.signed_duration_since(created);

    // Critical first: an LV past both limits is reported once, as critical.
    let (severity, secs) = if older_than(age, thr.crit_secs) {
        (Severity::Critical, thr.crit_secs)
    } else if older_than(age, thr.warn_secs) {
        (Severity::Warning, thr.warn_secs)
    } else {
        return Ok(None);
    };

    Ok(Some(Alert {
        severity,
        volume:  lv.full_name.clone(),
        message: format!("{} is older than {} seconds", lv.full_name, secs),
    }))
}

/// Thresholds too large for chrono can never be exceeded.
fn older_than(age: TimeDelta, secs: u64) -> bool {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .is_some_and(|limit| age > limit)
}

/// `lv_time` looks like "2016-07-20 10:00:00 +0000"; RFC 3339 is taken too.
pub fn parse_lv_time(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S %z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
}

/// Findings across all snapshots of one run, in record order.
#[derive(Debug, Default)]
pub struct AgeReport {
    pub critical: Vec<String>,
    pub warning:  Vec<String>,
}

impl AgeReport {
    pub fn push(&mut self, alert: Alert) {
        tracing::debug!(volume = %alert.volume, severity = ?alert.severity, "snapshot over age limit");
        match alert.severity {
            Severity::Critical => self.critical.push(alert.message),
            Severity::Warning  => self.warning.push(alert.message),
        }
    }

    pub fn worst(&self) -> Option<Severity> {
        if !self.critical.is_empty() { Some(Severity::Critical) }
        else if !self.warning.is_empty() { Some(Severity::Warning) }
        else { None }
    }

    /// Critical messages, then warning messages, comma separated.
    pub fn message(&self) -> String {
        self.critical.iter()
            .chain(self.warning.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Classify every LV, stopping at the first unreadable snapshot.
pub fn evaluate<'a, I>(lvs: I, now: DateTime<Utc>, thr: &AgeThresholds) -> Result<AgeReport, CheckError>
where
    I: IntoIterator<Item = &'a LogicalVolume>,
{
    let mut report = AgeReport::default();
    for lv in lvs {
        if let Some(alert) = classify(lv, now, thr)? {
            report.push(alert);
        }
    }
    Ok(report)
}
