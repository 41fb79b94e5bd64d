//! Time display helpers shared by status lines and listings.

/// `MM:SS`, minutes unbounded.
pub fn format_time(total_seconds: u32) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// `H:MM:SS` once an hour is reached, `MM:SS` below that.
pub fn format_time_with_hours(total_seconds: u32) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Compact duration for listings: "45m", "1h", "1h 30m".
pub fn format_minutes(minutes: u32) -> String {
    if minutes >= 60 {
        let hours = minutes / 60;
        let rest = minutes % 60;
        if rest > 0 {
            format!("{hours}h {rest}m")
        } else {
            format!("{hours}h")
        }
    } else {
        format!("{minutes}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mm_ss() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(59), "00:59");
        assert_eq!(format_time(117), "01:57");
        assert_eq!(format_time(3600), "60:00");
    }

    #[test]
    fn with_hours() {
        assert_eq!(format_time_with_hours(59), "00:59");
        assert_eq!(format_time_with_hours(3600), "01:00:00");
        assert_eq!(format_time_with_hours(7325), "02:02:05");
    }

    #[test]
    fn compact_minutes() {
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(60), "1h");
        assert_eq!(format_minutes(90), "1h 30m");
    }
}
