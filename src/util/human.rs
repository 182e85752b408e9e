/// Format a raw byte count into a human-readable string: "12.5 MB"
pub fn fmt_bytes(bytes: u64) -> String {
    const TB: f64 = 1_099_511_627_776.0;
    const GB: f64 = 1_073_741_824.0;
    const MB: f64 = 1_048_576.0;
    const KB: f64 = 1_024.0;
    let b = bytes as f64;
    if b >= TB      { format!("{:.1} TB", b / TB) }
    else if b >= GB { format!("{:.1} GB", b / GB) }
    else if b >= MB { format!("{:.1} MB", b / MB) }
    else if b >= KB { format!("{:.1} KB", b / KB) }
    else            { format!("{:.0} B",  b) }
}

/// Format an age threshold: "7d", "1d 6h", "90s"
pub fn fmt_secs(secs: u64) -> String {
    let days  = secs / 86_400;
    let hours = secs % 86_400 / 3_600;
    let mins  = secs % 3_600 / 60;
    let rest  = secs % 60;
    let parts: Vec<String> = [(days, "d"), (hours, "h"), (mins, "m"), (rest, "s")]
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, unit)| format!("{}{}", n, unit))
        .collect();
    if parts.is_empty() { "0s".to_string() } else { parts.join(" ") }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes() {
        assert_eq!(fmt_bytes(512), "512 B");
        assert_eq!(fmt_bytes(1_073_741_824), "1.0 GB");
    }

    #[test]
    fn secs() {
        assert_eq!(fmt_secs(86_400), "1d");
        assert_eq!(fmt_secs(604_800), "7d");
        assert_eq!(fmt_secs(93_600), "1d 2h");
        assert_eq!(fmt_secs(90), "1m 30s");
        assert_eq!(fmt_secs(0), "0s");
    }
}
