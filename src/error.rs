use thiserror::Error;

/// Failures of the core pipeline. Every variant ends the run as UNKNOWN.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("LVM returned an empty list of volumes")]
    NoVolumes,

    #[error("LVM query failed: {0:#}")]
    Query(anyhow::Error),

    #[error("invalid selection pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("{volume} has {}", describe_time(.value))]
    BadTimestamp { volume: String, value: Option<String> },

    #[error("volume group {0} reports a size of zero")]
    EmptyVolumeGroup(String),
}

const EMPTY_VOLUMES_MSG: &str = "An error occurred getting the LVM info: got empty list of volumes. \
Check to ensure the monitoring agent has been configured with appropriate permissions. \
On linux systems it will generally need to allow executing `/sbin/lvm`";

fn describe_time(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(raw) => format!("an unreadable creation time \"{}\"", raw),
        None      => "no creation time".to_string(),
    }
}

impl CheckError {
    /// Operator-facing text for the UNKNOWN line.
    pub fn operator_message(&self) -> String {
        match self {
            CheckError::NoVolumes | CheckError::Query(_) => EMPTY_VOLUMES_MSG.to_string(),
            CheckError::InvalidPattern(_) | CheckError::BadTimestamp { .. } => {
                format!("An error occurred getting the LVM info: {}", self)
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_failure_reads_like_empty_list() {
        let q = CheckError::Query(anyhow::anyhow!("permission denied"));
        assert_eq!(q.operator_message(), CheckError::NoVolumes.operator_message());
        assert!(q.operator_message().contains("appropriate permissions"));
    }

    #[test]
    fn timestamp_error_names_the_volume() {
        let e = CheckError::BadTimestamp { volume: "vg0/snap".into(), value: None };
        assert_eq!(
            e.operator_message(),
            "An error occurred getting the LVM info: vg0/snap has no creation time"
        );
        let e = CheckError::BadTimestamp { volume: "vg0/snap".into(), value: Some("soon".into()) };
        assert_eq!(
            e.operator_message(),
            "An error occurred getting the LVM info: vg0/snap has an unreadable creation time \"soon\""
        );
    }
}
