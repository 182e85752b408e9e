use crate::alerts::{self, Severity};
use crate::collectors::lvm::LvmSource;
use crate::config::{SnapAgeSettings, UsageSettings};
use crate::error::CheckError;
use crate::filter::filter;
use crate::metrics::{self, Metric};
use crate::util::output::{Outcome, Status};
use chrono::{DateTime, Utc};

pub const SNAP_AGE_CHECK: &str = "CheckSnapAge";
pub const USAGE_CHECK: &str    = "LvUsageMetrics";

/// Snapshot age check: fetch LVs, filter, classify, aggregate.
pub fn run_snap_age<S: LvmSource>(src: &S, settings: &SnapAgeSettings, now: DateTime<Utc>) -> Outcome {
    snap_age(src, settings, now).unwrap_or_else(unknown)
}

/// Usage metrics for the selected VGs followed by the selected LVs.
pub fn run_usage<S: LvmSource>(src: &S, settings: &UsageSettings) -> Outcome {
    usage(src, settings).map(Outcome::Metrics).unwrap_or_else(unknown)
}

fn snap_age<S: LvmSource>(src: &S, s: &SnapAgeSettings, now: DateTime<Utc>) -> Result<Outcome, CheckError> {
    let lvs      = src.logical_volumes().map_err(CheckError::Query)?;
    let selected = filter(&lvs, &s.selection)?;
    tracing::debug!(total = lvs.len(), selected = selected.len(), "checking snapshot ages");

    let report = alerts::evaluate(selected, now, &s.thresholds)?;
    Ok(match report.worst() {
        Some(Severity::Critical) => Outcome::check(Status::Critical, report.message()),
        Some(Severity::Warning)  => Outcome::check(Status::Warning, report.message()),
        None => Outcome::check(
            Status::Ok,
            format!("All logical volume snapshots are younger than {} seconds", s.thresholds.warn_secs),
        ),
    })
}

fn usage<S: LvmSource>(src: &S, s: &UsageSettings) -> Result<Vec<Metric>, CheckError> {
    let mut points = Vec::new();

    let vgs = src.volume_groups().map_err(CheckError::Query)?;
    for vg in filter(&vgs, &s.vg_selection)? {
        points.extend(metrics::vg_metrics(&s.scheme, vg)?);
    }

    let lvs = src.logical_volumes().map_err(CheckError::Query)?;
    for lv in filter(&lvs, &s.lv_selection)? {
        points.extend(metrics::lv_metrics(&s.scheme, lv));
    }

    Ok(points)
}

fn unknown(err: CheckError) -> Outcome {
    tracing::warn!(error = %err, "reporting UNKNOWN");
    Outcome::check(Status::Unknown, err.operator_message())
}
