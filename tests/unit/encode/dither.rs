use super::*;

const BW: [u8; 6] = [0, 0, 0, 255, 255, 255];

fn gray(width: usize, height: usize, level: u8) -> Vec<u8> {
    (0..width * height).flat_map(|_| [level, level, level, 255]).collect()
}

#[test]
fn mid_gray_diffuses_into_a_mix() {
    for kind in [
        Dither::FloydSteinberg,
        Dither::FalseFloydSteinberg,
        Dither::Stucki,
        Dither::Atkinson,
    ] {
        let idx = dither_indices(&gray(16, 16, 128), 16, 16, &BW, None, kind);
        let white = idx.iter().filter(|i| **i == 1).count();
        assert!(white > 32 && white < 224, "{kind:?}: {white}");
    }
}

#[test]
fn exact_palette_colors_are_kept() {
    let idx = dither_indices(&gray(4, 4, 255), 4, 4, &BW, None, Dither::FloydSteinberg);
    assert!(idx.iter().all(|i| *i == 1));
}

#[test]
fn transparent_pixels_keep_transparent_index() {
    let mut px = gray(2, 1, 0);
    px[7] = 0;
    let palette = [0, 0, 0, 255, 255, 255, 9, 9, 9];
    let idx = dither_indices(&px, 2, 1, &palette, Some(2), Dither::Atkinson);
    assert_eq!(idx, [0, 2]);
}
