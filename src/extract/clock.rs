//! Clock values shared by CSS time tokens and SMIL `dur`/`begin` attributes.

/// Parse a SMIL clock value into seconds.
///
/// Accepts `Ns`, `Nms`, `Nmin`, `Nh`, bare numbers (seconds), `mm:ss(.f)` and `hh:mm:ss(.f)`.
/// Negative and non-finite values are rejected.
pub fn parse_clock(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if raw.contains(':') {
        let parts = raw
            .split(':')
            .map(|p| p.trim().parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0))
            .collect::<Option<Vec<_>>>()?;
        return match parts[..] {
            [m, s] => Some(m * 60.0 + s),
            [h, m, s] => Some(h * 3600.0 + m * 60.0 + s),
            _ => None,
        };
    }

    let (num, scale) = if let Some(n) = raw.strip_suffix("ms") {
        (n, 0.001)
    } else if let Some(n) = raw.strip_suffix("min") {
        (n, 60.0)
    } else if let Some(n) = raw.strip_suffix('h') {
        (n, 3600.0)
    } else if let Some(n) = raw.strip_suffix('s') {
        (n, 1.0)
    } else {
        (raw, 1.0)
    };
    let v = num.trim().parse::<f64>().ok()?;
    (v.is_finite() && v >= 0.0).then_some(v * scale)
}

/// Parse a CSS `<time>` token (`2s`, `150ms`). Unlike SMIL clocks, a unit is required and the
/// value may be negative (delays).
pub fn parse_css_time(raw: &str) -> Option<f64> {
    let raw = raw.trim().to_ascii_lowercase();
    let (num, scale) = if let Some(n) = raw.strip_suffix("ms") {
        (n, 0.001)
    } else if let Some(n) = raw.strip_suffix('s') {
        (n, 1.0)
    } else {
        return None;
    };
    let v = num.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(v * scale)
}

/// Resolve a SMIL `begin` list (`"1s; click"`) to the first plain offset, or 0.
pub fn parse_begin(raw: Option<&str>) -> f64 {
    raw.into_iter()
        .flat_map(|r| r.split(';'))
        .find_map(|part| {
            let part = part.trim();
            let part = part.strip_prefix('+').unwrap_or(part);
            parse_clock(part)
        })
        .unwrap_or(0.0)
}

#[cfg(test)]
#[path = "../../tests/unit/extract/clock.rs"]
mod tests;
