use crate::metrics::Metric;

/// Sensu / Nagios plugin status. The exit code is the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Ok       => "OK",
            Status::Warning  => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown  => "UNKNOWN",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Status::Ok       => 0,
            Status::Warning  => 1,
            Status::Critical => 2,
            Status::Unknown  => 3,
        }
    }
}

/// The single terminal result of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Check { status: Status, message: String },
    Metrics(Vec<Metric>),
}

impl Outcome {
    pub fn check(status: Status, message: impl Into<String>) -> Self {
        Outcome::Check { status, message: message.into() }
    }

    pub fn status(&self) -> Status {
        match self {
            Outcome::Check { status, .. } => *status,
            Outcome::Metrics(_)           => Status::Ok,
        }
    }
}

/// Render an outcome as stdout text, one line per entry.
/// Metric lines are `<name> <value> <unix_ts>` (Graphite plaintext).
pub fn render(check_name: &str, outcome: &Outcome, timestamp: i64) -> String {
    match outcome {
        Outcome::Check { status, message } => {
            if message.is_empty() {
                format!("{} {}\n", check_name, status.label())
            } else {
                format!("{} {}: {}\n", check_name, status.label(), message)
            }
        }
        Outcome::Metrics(points) => points.iter()
            .map(|m| format!("{} {} {}\n", m.name, m.value, timestamp))
            .collect(),
    }
}
