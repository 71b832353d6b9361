/// HH:MM:SS
pub fn format_hms(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTier {
    Normal,
    /// 15 minutes or less
    Caution,
    /// 5 minutes or less
    Critical,
}

pub fn timer_tier(secs: u64) -> TimerTier {
    match secs {
        0..=300 => TimerTier::Critical,
        301..=900 => TimerTier::Caution,
        _ => TimerTier::Normal,
    }
}

/// "60 Minutes", "1 Minute", "90 Seconds"
pub fn time_limit_label(secs: u64) -> String {
    match (secs / 60, secs % 60) {
        (1, 0) => "1 Minute".to_string(),
        (m, 0) => format!("{} Minutes", m),
        _ if secs == 1 => "1 Second".to_string(),
        _ => format!("{} Seconds", secs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(3600), "01:00:00");
        assert_eq!(format_hms(3599), "00:59:59");
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(61), "00:01:01");
    }

    #[test]
    fn test_format_hms_beyond_a_day() {
        assert_eq!(format_hms(100 * 3600 + 5), "100:00:05");
    }

    #[test]
    fn test_timer_tier_boundaries() {
        assert_eq!(timer_tier(3600), TimerTier::Normal);
        assert_eq!(timer_tier(901), TimerTier::Normal);
        assert_eq!(timer_tier(900), TimerTier::Caution);
        assert_eq!(timer_tier(301), TimerTier::Caution);
        assert_eq!(timer_tier(300), TimerTier::Critical);
        assert_eq!(timer_tier(0), TimerTier::Critical);
    }

    #[test]
    fn test_time_limit_label() {
        assert_eq!(time_limit_label(3600), "60 Minutes");
        assert_eq!(time_limit_label(60), "1 Minute");
        assert_eq!(time_limit_label(90), "90 Seconds");
        assert_eq!(time_limit_label(1), "1 Second");
    }
}
