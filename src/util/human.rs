/// Format a byte count the way MegaCli does, with decimal units: "278.9 GB"
pub fn fmt_bytes(bytes: i64) -> String {
    const PB: f64 = 1e15;
    const TB: f64 = 1e12;
    const GB: f64 = 1e9;
    const MB: f64 = 1e6;
    const KB: f64 = 1e3;
    let b = bytes as f64;
    if b >= PB      { format!("{:.1} PB", b / PB) }
    else if b >= TB { format!("{:.1} TB", b / TB) }
    else if b >= GB { format!("{:.1} GB", b / GB) }
    else if b >= MB { format!("{:.1} MB", b / MB) }
    else if b >= KB { format!("{:.1} KB", b / KB) }
    else            { format!("{} B", bytes) }
}

/// Format a duration in seconds using its largest whole unit: "7d", "36h", "90s"
pub fn fmt_duration(secs: i64) -> String {
    if secs != 0 && secs % 86_400 == 0    { format!("{}d", secs / 86_400) }
    else if secs != 0 && secs % 3_600 == 0 { format!("{}h", secs / 3_600) }
    else if secs != 0 && secs % 60 == 0    { format!("{}m", secs / 60) }
    else                                   { format!("{}s", secs) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_bytes() {
        assert_eq!(fmt_bytes(278_875_000_000), "278.9 GB");
        assert_eq!(fmt_bytes(3_500_000_000_000), "3.5 TB");
        assert_eq!(fmt_bytes(512), "512 B");
    }

    #[test]
    fn test_fmt_duration() {
        assert_eq!(fmt_duration(604_800), "7d");
        assert_eq!(fmt_duration(129_600), "36h");
        assert_eq!(fmt_duration(1_800), "30m");
        assert_eq!(fmt_duration(90), "90s");
        assert_eq!(fmt_duration(0), "0s");
    }
}
