/// Formats a duration in seconds as `m:ss` (or `h:mm:ss` from one hour up).
#[must_use]
pub fn format_duration(total_secs: u32) -> String {
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    if minutes >= 60 {
        format!("{}:{:02}:{seconds:02}", minutes / 60, minutes % 60)
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Formats the backend's aggregate percentage for display.
#[must_use]
pub fn format_percent(percent: f32) -> String {
    format!("{}%", percent.round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_durations_use_minute_second() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(59), "0:59");
        assert_eq!(format_duration(300), "5:00");
        assert_eq!(format_duration(754), "12:34");
    }

    #[test]
    fn long_durations_include_hours() {
        assert_eq!(format_duration(3600), "1:00:00");
        assert_eq!(format_duration(3725), "1:02:05");
    }

    #[test]
    fn percent_is_rounded_for_display() {
        assert_eq!(format_percent(0.0), "0%");
        assert_eq!(format_percent(33.4), "33%");
        assert_eq!(format_percent(66.67), "67%");
        assert_eq!(format_percent(100.0), "100%");
    }
}
