use crate::animation::model::{Keyframe, PropertyMap, Value};
use crate::foundation::color::Rgb8;
use crate::foundation::math::{fmt_num, lerp_f64};

/// Interpolate a keyframe track at `progress` (already eased by the descriptor timing).
///
/// The bounding pair `[i, i + 1]` is the first whose upper offset is `>= progress`, clamped to the
/// first/last pair. Local progress within the pair is clamped to `[0, 1]`, so values never
/// leave the keyframe range. The upper keyframe's easing, when present, reshapes the local progress.
pub fn interpolate(keyframes: &[Keyframe], progress: f64) -> PropertyMap {
    match keyframes {
        [] => PropertyMap::new(),
        [only] => only.values.clone(),
        _ => {
            let last_pair = keyframes.len() - 2;
            let i = (0..=last_pair)
                .find(|&i| progress <= keyframes[i + 1].offset)
                .unwrap_or(last_pair);
            let from = &keyframes[i];
            let to = &keyframes[i + 1];

            let span = to.offset - from.offset;
            let local = if span > 0.0 {
                (progress - from.offset) / span
            } else if progress >= to.offset {
                1.0
            } else {
                0.0
            }
            .clamp(0.0, 1.0);
            let local = match to.easing {
                Some(easing) => easing.evaluate(local),
                None => local,
            };

            let mut out = PropertyMap::new();
            for (prop, a) in &from.values {
                let v = match to.values.get(prop) {
                    Some(b) => lerp_value(a, b, local),
                    None => a.clone(),
                };
                out.insert(prop.clone(), v);
            }
            for (prop, b) in &to.values {
                out.entry(prop.clone()).or_insert_with(|| b.clone());
            }
            out
        }
    }
}

/// Interpolate a single property value by kind.
///
/// Numbers and same-unit lengths lerp, hex colors blend per channel, matching transform lists lerp
/// argument-wise. Anything else snaps: `from` below 0.5, `to` at or above.
pub fn lerp_value(from: &Value, to: &Value, t: f64) -> Value {
    if let (Value::Number(a), Value::Number(b)) = (from, to) {
        return Value::Number(lerp_f64(*a, *b, t));
    }

    let a = from.to_string();
    let b = to.to_string();

    if let (Some(ca), Some(cb)) = (Rgb8::parse_hex(&a), Rgb8::parse_hex(&b)) {
        return Value::Text(Rgb8::lerp(ca, cb, t).to_string());
    }

    if a.contains('(') && b.contains('(') {
        if let Some(v) = lerp_transform_list(&a, &b, t) {
            return Value::Text(v);
        }
        return snap(from, to, t);
    }

    if let (Some(da), Some(db)) = (Dim::parse(&a), Dim::parse(&b)) {
        let unit = match (da.unit.as_str(), db.unit.as_str()) {
            (ua, ub) if ua == ub => Some(ua),
            ("", ub) => Some(ub),
            (ua, "") => Some(ua),
            _ => None,
        };
        if let Some(unit) = unit {
            let v = lerp_f64(da.value, db.value, t);
            return Value::Text(format!("{}{unit}", fmt_num(v)));
        }
    }

    snap(from, to, t)
}

fn snap(from: &Value, to: &Value, t: f64) -> Value {
    if t < 0.5 { from.clone() } else { to.clone() }
}

/// A number with an optional unit suffix (`12px`, `45deg`, `50%`, `3`).
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Dim {
    pub(crate) value: f64,
    pub(crate) unit: String,
}

impl Dim {
    pub(crate) fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        for end in (1..=s.len()).rev() {
            if !s.is_char_boundary(end) {
                continue;
            }
            let (num, unit) = s.split_at(end);
            if !unit.chars().all(|c| c.is_ascii_alphabetic() || c == '%') {
                continue;
            }
            if let Ok(value) = num.parse::<f64>()
                && value.is_finite()
            {
                return Some(Self {
                    value,
                    unit: unit.to_owned(),
                });
            }
        }
        None
    }
}

/// One `name(args...)` entry of a transform list.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TransformFn {
    pub(crate) name: String,
    pub(crate) args: Vec<Dim>,
}

/// Parse a whitespace-separated list of transform functions.
pub(crate) fn parse_transform_list(s: &str) -> Option<Vec<TransformFn>> {
    let mut out = Vec::new();
    let mut rest = s.trim();
    while !rest.is_empty() {
        let open = rest.find('(')?;
        let name = rest[..open].trim().trim_start_matches(',').trim();
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return None;
        }
        let close = open + rest[open..].find(')')?;
        let args = rest[open + 1..close]
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|a| !a.is_empty())
            .map(Dim::parse)
            .collect::<Option<Vec<_>>>()?;
        out.push(TransformFn {
            name: name.to_owned(),
            args,
        });
        rest = rest[close + 1..].trim_start().trim_start_matches(',').trim_start();
    }
    if out.is_empty() { None } else { Some(out) }
}

pub(crate) fn format_transform_list(list: &[TransformFn]) -> String {
    list.iter()
        .map(|f| {
            let args = f
                .args
                .iter()
                .map(|d| format!("{}{}", fmt_num(d.value), d.unit))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}({args})", f.name)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn lerp_transform_list(a: &str, b: &str, t: f64) -> Option<String> {
    let la = parse_transform_list(a)?;
    let lb = parse_transform_list(b)?;
    if la.len() != lb.len() {
        return None;
    }

    let mut out = Vec::with_capacity(la.len());
    for (fa, fb) in la.iter().zip(&lb) {
        if fa.name != fb.name || fa.args.len() != fb.args.len() {
            return None;
        }
        let args = fa
            .args
            .iter()
            .zip(&fb.args)
            .map(|(x, y)| Dim {
                value: lerp_f64(x.value, y.value, t),
                unit: if x.unit.is_empty() {
                    y.unit.clone()
                } else {
                    x.unit.clone()
                },
            })
            .collect();
        out.push(TransformFn {
            name: fa.name.clone(),
            args,
        });
    }
    Some(format_transform_list(&out))
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interpolate.rs"]
mod tests;
