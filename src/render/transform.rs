//! CSS transform values rewritten as SVG `transform` attribute syntax.

use crate::animation::interpolate::{Dim, TransformFn, parse_transform_list};
use crate::foundation::math::fmt_num;

/// Rewrite a CSS transform list in SVG user units.
///
/// Angles become degrees (`rad`, `turn`, `grad` converted), lengths drop their unit, and the CSS
/// single-axis functions (`translateX`, `scaleY`, `rotateZ`, `skew`, ...) are expanded. Values
/// that do not parse as a transform list are returned unchanged.
pub fn normalize_transform(css: &str) -> String {
    if css.trim() == "none" {
        return String::new();
    }
    let Some(list) = parse_transform_list(css) else {
        return css.trim().to_owned();
    };
    list.iter()
        .flat_map(svg_functions)
        .collect::<Vec<_>>()
        .join(" ")
}

fn svg_functions(f: &TransformFn) -> Vec<String> {
    let lens = f.args.iter().map(length).collect::<Vec<_>>();
    let arg = |i: usize| lens.get(i).copied().unwrap_or(0.0);
    let angle0 = f.args.first().map(angle).unwrap_or(0.0);

    let call = |name: &str, args: &[f64]| {
        let args = args.iter().map(|v| fmt_num(*v)).collect::<Vec<_>>().join(" ");
        format!("{name}({args})")
    };

    match f.name.as_str() {
        "translate" => vec![call("translate", &lens)],
        "translateX" => vec![call("translate", &[arg(0), 0.0])],
        "translateY" => vec![call("translate", &[0.0, arg(0)])],
        "scale" => vec![call("scale", &lens)],
        "scaleX" => vec![call("scale", &[arg(0), 1.0])],
        "scaleY" => vec![call("scale", &[1.0, arg(0)])],
        "rotate" | "rotateZ" => {
            // SVG rotate takes an optional center: rotate(a cx cy).
            let mut args = vec![angle0];
            args.extend(lens.iter().skip(1).copied());
            vec![call("rotate", &args)]
        }
        "skewX" => vec![call("skewX", &[angle0])],
        "skewY" => vec![call("skewY", &[angle0])],
        "skew" => {
            let mut out = vec![call("skewX", &[angle0])];
            if let Some(ay) = f.args.get(1) {
                out.push(call("skewY", &[angle(ay)]));
            }
            out
        }
        "matrix" => vec![call("matrix", &lens)],
        other => {
            tracing::debug!(function = other, "transform function has no SVG equivalent");
            Vec::new()
        }
    }
}

fn length(d: &Dim) -> f64 {
    d.value
}

fn angle(d: &Dim) -> f64 {
    match d.unit.as_str() {
        "rad" => d.value.to_degrees(),
        "turn" => d.value * 360.0,
        "grad" => d.value * 0.9,
        _ => d.value,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/transform.rs"]
mod tests;
