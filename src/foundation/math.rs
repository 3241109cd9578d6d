pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Undo alpha premultiplication of one channel, rounding to nearest.
pub(crate) fn demul_u8(c: u8, a: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    let v = (u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a);
    v.min(255) as u8
}

/// Linear interpolation between two scalars.
pub(crate) fn lerp_f64(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Format a float compactly for markup: integral values lose the fraction and long fractions are
/// trimmed to 6 decimals.
pub(crate) fn fmt_num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_owned();
    }
    let rounded = (v * 1_000_000.0).round() / 1_000_000.0;
    if rounded == rounded.trunc() {
        return format!("{}", rounded as i64);
    }
    let s = format!("{rounded:.6}");
    s.trim_end_matches('0').trim_end_matches('.').to_owned()
}
