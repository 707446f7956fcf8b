//! Formatting helpers shared across UIs.

/// Format a minute count for display (e.g., "45 min", "2 hrs", "1 hr 30 min").
pub fn format_study_time(minutes: u64) -> String {
    if minutes < 60 {
        return format!("{} min", minutes);
    }

    let hours = minutes / 60;
    let rest = minutes % 60;
    let unit = if hours > 1 { "hrs" } else { "hr" };

    if rest == 0 {
        format!("{} {}", hours, unit)
    } else {
        format!("{} {} {} min", hours, unit, rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_study_time() {
        assert_eq!(format_study_time(0), "0 min");
        assert_eq!(format_study_time(45), "45 min");
        assert_eq!(format_study_time(60), "1 hr");
        assert_eq!(format_study_time(90), "1 hr 30 min");
        assert_eq!(format_study_time(120), "2 hrs");
        assert_eq!(format_study_time(150), "2 hrs 30 min");
    }
}
