use std::time::Duration;

/// Characters per "word" in the classic WPM definition
pub const CHARS_PER_WORD: f64 = 5.0;

/// Elapsed time as `MM:SS`; minutes keep growing past 99
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Words per minute from correct keystrokes only
pub fn wpm(correct: u32, elapsed: Duration) -> u32 {
    let ms = elapsed.as_secs_f64() * 1000.0;
    if ms <= 0.0 {
        return 0;
    }
    let minutes = ms / 60_000.0;
    ((correct as f64 / CHARS_PER_WORD) / minutes).max(0.0).round() as u32
}

/// Percentage of correct keystrokes, 100 when nothing was typed yet
pub fn accuracy(correct: u32, wrong: u32) -> u32 {
    let total = correct + wrong;
    if total == 0 {
        return 100;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u32
}

pub fn format_accuracy(correct: u32, wrong: u32) -> String {
    format!("{}%", accuracy(correct, wrong))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::ZERO), "00:00");
        assert_eq!(format_elapsed(Duration::from_millis(999)), "00:00");
        assert_eq!(format_elapsed(Duration::from_millis(61_500)), "01:01");
        assert_eq!(format_elapsed(Duration::from_secs(6_000)), "100:00");
    }

    #[test]
    fn test_wpm_zero_elapsed() {
        assert_eq!(wpm(42, Duration::ZERO), 0);
    }

    #[test]
    fn test_wpm_no_correct_chars() {
        assert_eq!(wpm(0, Duration::from_secs(12)), 0);
        assert_eq!(wpm(0, Duration::ZERO), 0);
    }

    #[test]
    fn test_wpm_one_minute() {
        assert_eq!(wpm(30, Duration::from_millis(60_000)), 6);
    }

    #[test]
    fn test_wpm_rounds_half_up() {
        // 2.5 words in one minute
        assert_eq!(wpm(25, Duration::from_secs(120)), 3);
        // 34 chars in 20 seconds = 20.4
        assert_eq!(wpm(34, Duration::from_secs(20)), 20);
    }

    #[test]
    fn test_accuracy_defaults_to_hundred() {
        assert_eq!(accuracy(0, 0), 100);
        assert_eq!(format_accuracy(0, 0), "100%");
    }

    #[test]
    fn test_accuracy_ratio() {
        assert_eq!(accuracy(18, 2), 90);
        assert_eq!(format_accuracy(18, 2), "90%");
        assert_eq!(accuracy(0, 3), 0);
        assert_eq!(accuracy(2, 1), 67);
    }
}
