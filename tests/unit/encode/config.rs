use super::*;

#[test]
fn validate_bounds() {
    assert!(EncodeConfig::new(10, 10).validate().is_ok());
    assert!(EncodeConfig::new(0, 10).validate().is_err());
    assert!(EncodeConfig::new(70_000, 10).validate().is_err());
    let mut cfg = EncodeConfig::new(10, 10);
    cfg.quality = 31;
    assert!(cfg.validate().is_err());
    cfg.quality = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn delay_rounds_to_centiseconds() {
    let mut cfg = EncodeConfig::new(1, 1);
    cfg.frame_delay_ms = 33;
    assert_eq!(cfg.delay_centis(), 3);
    cfg.frame_delay_ms = 0;
    assert_eq!(cfg.delay_centis(), 1);
    cfg.frame_delay_ms = 500;
    assert_eq!(cfg.delay_centis(), 50);
}

#[test]
fn dither_names() {
    assert_eq!(Dither::parse("none"), Some(None));
    assert_eq!(Dither::parse("FloydSteinberg"), Some(Some(Dither::FloydSteinberg)));
    assert_eq!(Dither::parse("false_floyd_steinberg"), Some(Some(Dither::FalseFloydSteinberg)));
    assert_eq!(Dither::parse("atkinson"), Some(Some(Dither::Atkinson)));
    assert_eq!(Dither::parse("sparkle"), None);
    let json = serde_json::to_string(&Dither::Stucki).unwrap();
    assert_eq!(json, "\"stucki\"");
}
