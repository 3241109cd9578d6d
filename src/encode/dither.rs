//! Error-diffusion re-indexing of straight RGBA pixels against a fixed palette.

use crate::encode::config::Dither;

/// `(dx, dy, weight)` taps and the kernel divisor.
fn kernel(kind: Dither) -> (&'static [(i32, i32, f32)], f32) {
    match kind {
        Dither::FloydSteinberg => (&[(1, 0, 7.0), (-1, 1, 3.0), (0, 1, 5.0), (1, 1, 1.0)], 16.0),
        Dither::FalseFloydSteinberg => (&[(1, 0, 3.0), (0, 1, 3.0), (1, 1, 2.0)], 8.0),
        Dither::Stucki => (
            &[
                (1, 0, 8.0),
                (2, 0, 4.0),
                (-2, 1, 2.0),
                (-1, 1, 4.0),
                (0, 1, 8.0),
                (1, 1, 4.0),
                (2, 1, 2.0),
                (-2, 2, 1.0),
                (-1, 2, 2.0),
                (0, 2, 4.0),
                (1, 2, 2.0),
                (2, 2, 1.0),
            ],
            42.0,
        ),
        Dither::Atkinson => (
            &[
                (1, 0, 1.0),
                (2, 0, 1.0),
                (-1, 1, 1.0),
                (0, 1, 1.0),
                (1, 1, 1.0),
                (0, 2, 1.0),
            ],
            8.0,
        ),
    }
}

/// Re-index `rgba` (straight alpha) against `palette` (packed RGB triplets) with error diffusion.
///
/// Pixels with zero alpha map to `transparent` when given; that entry is never chosen for opaque
/// pixels.
pub fn dither_indices(
    rgba: &[u8],
    width: usize,
    height: usize,
    palette: &[u8],
    transparent: Option<u8>,
    kind: Dither,
) -> Vec<u8> {
    let colors = palette
        .chunks_exact(3)
        .enumerate()
        .filter(|(i, _)| transparent != Some(*i as u8))
        .map(|(i, c)| (i as u8, [f32::from(c[0]), f32::from(c[1]), f32::from(c[2])]))
        .collect::<Vec<_>>();

    let mut work = rgba
        .chunks_exact(4)
        .map(|p| [f32::from(p[0]), f32::from(p[1]), f32::from(p[2])])
        .collect::<Vec<_>>();
    let mut out = vec![transparent.unwrap_or(0); width * height];
    if colors.is_empty() {
        return out;
    }

    let (taps, divisor) = kernel(kind);
    for y in 0..height {
        for x in 0..width {
            let i = y * width + x;
            if rgba[i * 4 + 3] == 0 && transparent.is_some() {
                continue;
            }
            let want = work[i].map(|c| c.clamp(0.0, 255.0));
            let (index, got) = nearest(&colors, want);
            out[i] = index;

            let err = [want[0] - got[0], want[1] - got[1], want[2] - got[2]];
            for &(dx, dy, weight) in taps {
                let nx = x as i64 + i64::from(dx);
                let ny = y as i64 + i64::from(dy);
                if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                    continue;
                }
                let j = ny as usize * width + nx as usize;
                let f = weight / divisor;
                for c in 0..3 {
                    work[j][c] += err[c] * f;
                }
            }
        }
    }
    out
}

fn nearest(colors: &[(u8, [f32; 3])], want: [f32; 3]) -> (u8, [f32; 3]) {
    let mut best = colors[0];
    let mut best_d = f32::INFINITY;
    for &(i, c) in colors {
        let d = (c[0] - want[0]).powi(2) + (c[1] - want[1]).powi(2) + (c[2] - want[2]).powi(2);
        if d < best_d {
            best_d = d;
            best = (i, c);
        }
    }
    best
}

#[cfg(test)]
#[path = "../../tests/unit/encode/dither.rs"]
mod tests;
