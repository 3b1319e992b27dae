//! Countdown formatting.

/// Formats seconds as `m:ss`.
///
/// ```
/// use spyx_missions::format_time;
/// assert_eq!(format_time(330), "5:30");
/// assert_eq!(format_time(9), "0:09");
/// ```
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
