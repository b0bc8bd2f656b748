// crates/lingloop-core/src/helpers/time.rs
//
// Shared time-formatting utilities for log lines, region tooltips, and any
// future crate that needs human-readable subtitle timestamps.

/// Format a subtitle timestamp as `MM:SS.mmm`.
///
/// Millisecond precision matters here — segment boundaries are routinely
/// 50 ms apart.
///
/// ```
/// use lingloop_core::helpers::time::format_timestamp;
/// assert_eq!(format_timestamp(0.0),    "00:00.000");
/// assert_eq!(format_timestamp(61.5),   "01:01.500");
/// assert_eq!(format_timestamp(599.05), "09:59.050");
/// ```
pub fn format_timestamp(s: f64) -> String {
    let total_ms = (s.max(0.0) * 1000.0).round() as u64;
    let m  = total_ms / 60_000;
    let sc = (total_ms % 60_000) / 1000;
    let ms = total_ms % 1000;
    format!("{m:02}:{sc:02}.{ms:03}")
}

/// Format a media duration compactly for playlist entries and logs: hour-long
/// media as `H:MM:SS`, the typical lesson clip as `M:SS`, and anything under
/// a minute with one decimal.
///
/// ```
/// use lingloop_core::helpers::time::format_duration;
/// assert_eq!(format_duration(42.5),   "42.5s");
/// assert_eq!(format_duration(605.0),  "10:05");
/// assert_eq!(format_duration(7325.0), "2:02:05");
/// ```
pub fn format_duration(secs: f64) -> String {
    let whole = secs as u64;
    let (h, m, s) = (whole / 3600, (whole % 3600) / 60, whole % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else if m > 0 {
        format!("{m}:{s:02}")
    } else {
        format!("{secs:.1}s")
    }
}
