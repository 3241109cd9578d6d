use super::*;

fn close(a: Option<f64>, b: f64) {
    let a = a.unwrap();
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

#[test]
fn clock_units() {
    close(parse_clock("2s"), 2.0);
    close(parse_clock("500ms"), 0.5);
    close(parse_clock("1.5"), 1.5);
    close(parse_clock("2min"), 120.0);
    close(parse_clock("1h"), 3600.0);
    close(parse_clock(" 0.25s "), 0.25);
}

#[test]
fn clock_colon_forms() {
    close(parse_clock("01:30"), 90.0);
    close(parse_clock("00:00:02.5"), 2.5);
    close(parse_clock("1:00:00"), 3600.0);
    assert_eq!(parse_clock("1:2:3:4"), None);
}

#[test]
fn clock_rejects_garbage() {
    assert_eq!(parse_clock(""), None);
    assert_eq!(parse_clock("indefinite"), None);
    assert_eq!(parse_clock("-1s"), None);
    assert_eq!(parse_clock("fast"), None);
}

#[test]
fn css_time_requires_a_unit() {
    close(parse_css_time("2s"), 2.0);
    close(parse_css_time("150MS"), 0.15);
    close(parse_css_time("-0.5s"), -0.5);
    assert_eq!(parse_css_time("2"), None);
    assert_eq!(parse_css_time("ease"), None);
}

#[test]
fn begin_lists_take_first_offset() {
    assert_eq!(parse_begin(None), 0.0);
    assert_eq!(parse_begin(Some("click")), 0.0);
    close(Some(parse_begin(Some("click; 1.5s"))), 1.5);
    close(Some(parse_begin(Some("250ms;2s"))), 0.25);
    close(Some(parse_begin(Some("+3s"))), 3.0);
    assert_eq!(parse_begin(Some("a.end")), 0.0);
}
