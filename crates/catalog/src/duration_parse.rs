// ABOUTME: Duration string parsing for episode card lengths.
// ABOUTME: Supports colon-delimited SS, MM:SS, and HH:MM:SS formats.

/// Parses a colon-delimited duration string into seconds.
/// Supports 1 to 3 components:
/// - "SS" (plain seconds)
/// - "MM:SS"
/// - "HH:MM:SS"
/// Returns None for empty input or when any component fails to parse.
pub fn parse_duration_seconds(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let parts: Vec<&str> = s.split(':').collect();

    match parts.len() {
        1 => {
            let secs: u64 = parts[0].parse().ok()?;
            u32::try_from(secs).ok()
        }
        2 => {
            let mins: u64 = parts[0].parse().ok()?;
            let secs: u64 = parts[1].parse().ok()?;
            u32::try_from(mins * 60 + secs).ok()
        }
        3 => {
            let hours: u64 = parts[0].parse().ok()?;
            let mins: u64 = parts[1].parse().ok()?;
            let secs: u64 = parts[2].parse().ok()?;
            u32::try_from(hours * 3600 + mins * 60 + secs).ok()
        }
        _ => None,
    }
}
