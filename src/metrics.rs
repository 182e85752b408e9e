use crate::error::CheckError;
use crate::models::volume::{LogicalVolume, VolumeGroup};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(u64),
    Float(f64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v)   => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
        }
    }
}

/// One named data point, e.g. `host.vg_usage.vg0.used 1024`.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub name:  String,
    pub value: Value,
}

impl Metric {
    fn new(path: &[&str], value: Value) -> Self {
        Self { name: path.join("."), value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VgUsage {
    pub used_bytes:   u64,
    pub free_bytes:   u64,
    pub used_percent: f64,
}

pub fn vg_usage(vg: &VolumeGroup) -> Result<VgUsage, CheckError> {
    if vg.size_bytes == 0 {
        return Err(CheckError::EmptyVolumeGroup(vg.name.clone()));
    }
    let used = vg.size_bytes.saturating_sub(vg.free_bytes);
    let pct  = used as f64 * 100.0 / vg.size_bytes as f64;
    Ok(VgUsage {
        used_bytes:   used,
        free_bytes:   vg.free_bytes,
        used_percent: (pct * 100.0).round() / 100.0,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LvUsage {
    pub data_used_percent:     u64,
    pub metadata_used_percent: u64,
    pub size_bytes:            u64,
}

/// Percentages are truncated, not rounded: 12.7% reports as 12.
pub fn lv_usage(lv: &LogicalVolume) -> LvUsage {
    LvUsage {
        data_used_percent:     truncate_pct(lv.data_percent),
        metadata_used_percent: truncate_pct(lv.metadata_percent),
        size_bytes:            lv.size_bytes,
    }
}

fn truncate_pct(pct: Option<f64>) -> u64 {
    // `as` saturates: NaN and negatives become 0.
    pct.map(|p| p.trunc() as u64).unwrap_or(0)
}

pub fn vg_metrics(scheme: &str, vg: &VolumeGroup) -> Result<Vec<Metric>, CheckError> {
    let u = vg_usage(vg)?;
    tracing::debug!(vg = %vg.name, used = %crate::util::human::fmt_bytes(u.used_bytes), pct = u.used_percent);
    Ok(vec![
        Metric::new(&[scheme, &vg.name, "used"], Value::Int(u.used_bytes)),
        Metric::new(&[scheme, &vg.name, "avail"], Value::Int(u.free_bytes)),
        Metric::new(&[scheme, &vg.name, "used_percentage"], Value::Float(u.used_percent)),
    ])
}

pub fn lv_metrics(scheme: &str, lv: &LogicalVolume) -> Vec<Metric> {
    let u = lv_usage(lv);
    vec![
        Metric::new(&[scheme, &lv.full_name, "data", "used_percentage"], Value::Int(u.data_used_percent)),
        Metric::new(&[scheme, &lv.full_name, "data", "size"], Value::Int(u.size_bytes)),
        Metric::new(&[scheme, &lv.full_name, "metadata", "used_percentage"], Value::Int(u.metadata_used_percent)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::volume::VolumeType;

    fn vg(size: u64, free: u64) -> VolumeGroup {
        VolumeGroup { name: "vg0".into(), size_bytes: size, free_bytes: free }
    }

    fn pool(data: Option<f64>, meta: Option<f64>) -> LogicalVolume {
        LogicalVolume {
            name:             "pool".into(),
            vg_name:          "docker".into(),
            full_name:        "docker/pool".into(),
            volume_type:      VolumeType::ThinPool,
            time:             None,
            size_bytes:       4096,
            data_percent:     data,
            metadata_percent: meta,
        }
    }

    #[test]
    fn vg_quarter_free() {
        let u = vg_usage(&vg(200, 50)).unwrap();
        assert_eq!(u.used_bytes, 150);
        assert_eq!(u.used_percent, 75.0);
    }

    #[test]
    fn vg_percent_rounds_to_two_places() {
        assert_eq!(vg_usage(&vg(3, 2)).unwrap().used_percent, 33.33);
        assert_eq!(vg_usage(&vg(3, 1)).unwrap().used_percent, 66.67);
    }

    #[test]
    fn vg_of_size_zero_is_an_error() {
        assert!(matches!(vg_usage(&vg(0, 0)), Err(CheckError::EmptyVolumeGroup(_))));
    }

    #[test]
    fn lv_percent_truncates() {
        let u = lv_usage(&pool(Some(12.7), Some(99.99)));
        assert_eq!(u.data_used_percent, 12);
        assert_eq!(u.metadata_used_percent, 99);
        assert_eq!(u.size_bytes, 4096);
        assert_eq!(lv_usage(&pool(None, None)).data_used_percent, 0);
    }

    #[test]
    fn metric_names_join_with_dots() {
        let m = vg_metrics("host.vg_usage", &vg(200, 50)).unwrap();
        let names: Vec<&str> = m.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec![
            "host.vg_usage.vg0.used",
            "host.vg_usage.vg0.avail",
            "host.vg_usage.vg0.used_percentage",
        ]);
        assert_eq!(m[2].value.to_string(), "75");

        let m = lv_metrics("s", &pool(Some(12.7), Some(3.0)));
        assert_eq!(m[0].name, "s.docker/pool.data.used_percentage");
        assert_eq!(m[0].value, Value::Int(12));
        assert_eq!(m[1].name, "s.docker/pool.data.size");
        assert_eq!(m[2].name, "s.docker/pool.metadata.used_percentage");
    }
}
