use serde::Serialize;

/// Anything the filter engine can select by name.
pub trait Named {
    fn name(&self) -> &str;
    fn full_name(&self) -> &str;
}

// ── Volume groups ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeGroup {
    pub name:       String,
    pub size_bytes: u64,
    pub free_bytes: u64,
}

impl Named for VolumeGroup {
    fn name(&self) -> &str { &self.name }
    // A VG has no parent, so its full name is its name.
    fn full_name(&self) -> &str { &self.name }
}

// ── Logical volumes ──────────────────────────────────────────────────

/// LV kind, decoded from the first character of `lv_attr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeType {
    Linear,
    Snapshot,
    InvalidSnapshot,
    Origin,
    ThinPool,
    ThinVolume,
    Mirrored,
    Raid,
    Other(char),
}

impl VolumeType {
    pub fn from_attr(attr: &str) -> Self {
        match attr.chars().next() {
            Some('-')       => VolumeType::Linear,
            Some('s')       => VolumeType::Snapshot,
            Some('S')       => VolumeType::InvalidSnapshot,
            Some('o')       => VolumeType::Origin,
            Some('t')       => VolumeType::ThinPool,
            Some('V')       => VolumeType::ThinVolume,
            Some('m' | 'M') => VolumeType::Mirrored,
            Some('r' | 'R') => VolumeType::Raid,
            Some(c)         => VolumeType::Other(c),
            None            => VolumeType::Other('?'),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicalVolume {
    pub name:             String,
    pub vg_name:          String,
    pub full_name:        String,   // "vg/lv"
    pub volume_type:      VolumeType,
    pub time:             Option<String>,   // raw lv_time, parsed by the age check
    pub size_bytes:       u64,
    pub data_percent:     Option<f64>,
    pub metadata_percent: Option<f64>,
}

impl LogicalVolume {
    pub fn is_snapshot(&self) -> bool { self.volume_type == VolumeType::Snapshot }
}

impl Named for LogicalVolume {
    fn name(&self) -> &str { &self.name }
    fn full_name(&self) -> &str { &self.full_name }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attr_first_char_decides_type() {
        assert_eq!(VolumeType::from_attr("swi-a-s---"), VolumeType::Snapshot);
        assert_eq!(VolumeType::from_attr("twi-aot---"), VolumeType::ThinPool);
        assert_eq!(VolumeType::from_attr("Vwi-a-tz--"), VolumeType::ThinVolume);
        assert_eq!(VolumeType::from_attr("-wi-ao----"), VolumeType::Linear);
        assert_eq!(VolumeType::from_attr("Swi-I-s---"), VolumeType::InvalidSnapshot);
        assert_eq!(VolumeType::from_attr("x"), VolumeType::Other('x'));
        assert_eq!(VolumeType::from_attr(""), VolumeType::Other('?'));
    }

    #[test]
    fn only_valid_snapshots_count() {
        let mut lv = LogicalVolume {
            name:             "snap".into(),
            vg_name:          "vg0".into(),
            full_name:        "vg0/snap".into(),
            volume_type:      VolumeType::Snapshot,
            time:             None,
            size_bytes:       0,
            data_percent:     None,
            metadata_percent: None,
        };
        assert!(lv.is_snapshot());
        lv.volume_type = VolumeType::InvalidSnapshot;
        assert!(!lv.is_snapshot());
    }
}
