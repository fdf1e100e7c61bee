/// Format an elapsed duration in whole seconds as `H:MM:SS`.
///
/// # Examples
///
/// ```
/// use cell_core::formatting::format_elapsed;
///
/// assert_eq!(format_elapsed(0),     "0:00:00");
/// assert_eq!(format_elapsed(5),     "0:00:05");
/// assert_eq!(format_elapsed(65),    "0:01:05");
/// assert_eq!(format_elapsed(3725),  "1:02:05");
/// assert_eq!(format_elapsed(90061), "25:01:01");
/// ```
pub fn format_elapsed(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}

/// Format an integer count with thousands separators.
///
/// # Examples
///
/// ```
/// use cell_core::formatting::format_count;
///
/// assert_eq!(format_count(0),         "0");
/// assert_eq!(format_count(999),       "999");
/// assert_eq!(format_count(1234),      "1,234");
/// assert_eq!(format_count(1234567),   "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Insert a comma between every group of three digits, right to left.
fn group_thousands(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, &b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(b as char);
    }
    out
}
