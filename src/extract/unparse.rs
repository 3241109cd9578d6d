use std::fmt::Write as _;

use crate::animation::interpolate::parse_transform_list;
use crate::animation::model::{AnimationDescriptor, FillMode, Iterations, Origin, Value};
use crate::animation::timing::TimingFunction;
use crate::document::selector::Selector;
use crate::foundation::math::fmt_num;

struct Block {
    offset: f64,
    decls: Vec<(String, String)>,
    timing: Option<TimingFunction>,
}

/// Regenerate a style sheet (`@keyframes` blocks plus one rule per target and name).
///
/// Descriptors that target parse-time node references have no CSS spelling and are skipped.
pub fn to_css(descriptors: &[AnimationDescriptor]) -> String {
    let mut names = Vec::<&str>::new();
    for d in descriptors {
        if !names.contains(&d.name.as_str()) {
            names.push(&d.name);
        }
    }

    let mut out = String::new();
    for name in &names {
        let blocks = merged_blocks(descriptors.iter().filter(|d| d.name == *name));
        if blocks.is_empty() {
            continue;
        }
        let _ = writeln!(out, "@keyframes {name} {{");
        for block in blocks {
            let mut decls = block
                .decls
                .iter()
                .map(|(k, v)| format!("{k}: {v};"))
                .collect::<Vec<_>>();
            if let Some(t) = block.timing {
                decls.push(format!("animation-timing-function: {t};"));
            }
            let _ = writeln!(out, "  {}% {{ {} }}", fmt_num(block.offset * 100.0), decls.join(" "));
        }
        out.push_str("}\n");
    }

    let mut rules = Vec::<(&Selector, &str)>::new();
    for d in descriptors {
        if matches!(d.target, Selector::Node(_)) {
            tracing::debug!(name = %d.name, "node targets have no CSS selector; skipping");
            continue;
        }
        if rules.iter().any(|(t, n)| *t == &d.target && *n == d.name) {
            continue;
        }
        rules.push((&d.target, d.name.as_str()));
        let _ = writeln!(out, "{} {{ animation: {}; }}", d.target, shorthand(d));
    }
    out
}

fn merged_blocks<'a>(group: impl Iterator<Item = &'a AnimationDescriptor>) -> Vec<Block> {
    let mut blocks = Vec::<Block>::new();
    for d in group {
        for (i, kf) in d.keyframes.iter().enumerate() {
            let idx = match blocks.iter().position(|b| b.offset == kf.offset) {
                Some(idx) => idx,
                None => {
                    blocks.push(Block {
                        offset: kf.offset,
                        decls: Vec::new(),
                        timing: None,
                    });
                    blocks.len() - 1
                }
            };
            for (prop, value) in &kf.values {
                if !blocks[idx].decls.iter().any(|(p, _)| p == prop) {
                    blocks[idx].decls.push((prop.clone(), value.to_string()));
                }
            }
            // A keyframe easing belongs to the block that starts its segment.
            if let Some(easing) = kf.easing
                && i > 0
            {
                let prev = d.keyframes[i - 1].offset;
                if let Some(b) = blocks.iter_mut().find(|b| b.offset == prev) {
                    b.timing = Some(easing);
                }
            }
        }
    }
    blocks.sort_by(|a, b| a.offset.total_cmp(&b.offset));
    blocks
}

fn shorthand(d: &AnimationDescriptor) -> String {
    let mut parts = vec![
        d.name.clone(),
        format!("{}s", fmt_num(d.duration)),
        d.timing.to_string(),
        format!("{}s", fmt_num(d.delay)),
        d.iterations.to_string(),
        d.direction.as_css().to_owned(),
    ];
    if d.fill != FillMode::None {
        parts.push(d.fill.as_css().to_owned());
    }
    parts.join(" ")
}

/// Regenerate one SMIL element for a descriptor.
///
/// Transform tracks whose keyframes are all the same single function become `<animateTransform>`;
/// instantaneous frozen tracks become `<set>`; everything else is `<animate>`. Id targets are
/// written as `href`, other targets rely on the element being placed inside the target.
pub fn to_smil(d: &AnimationDescriptor) -> String {
    let mut out = String::new();
    let href = match &d.target {
        Selector::Id(id) => format!(" href=\"#{id}\""),
        _ => String::new(),
    };

    let raw = d
        .keyframes
        .iter()
        .map(|k| k.values.get(&d.property).map(Value::to_string).unwrap_or_default())
        .collect::<Vec<_>>();

    if d.duration == 0.0 && d.fill.holds_end() && raw.len() == 1 {
        let _ = write!(
            out,
            "<set{href} attributeName=\"{}\" to=\"{}\"{}/>",
            d.property,
            raw[0],
            begin_attr(d.delay)
        );
        return out;
    }

    let (element, type_attr, values) = match single_transform_kind(&d.property, &raw) {
        Some((kind, args)) => ("animateTransform", format!(" type=\"{kind}\""), args),
        None => ("animate", String::new(), raw),
    };

    let key_times = d
        .keyframes
        .iter()
        .map(|k| fmt_num(k.offset))
        .collect::<Vec<_>>()
        .join(";");

    let _ = write!(
        out,
        "<{element}{href} attributeName=\"{}\"{type_attr} values=\"{}\" keyTimes=\"{key_times}\" dur=\"{}s\"{}",
        d.property,
        values.join(";"),
        fmt_num(d.duration),
        begin_attr(d.delay),
    );
    if d.iterations != Iterations::Count(1) {
        let count = match d.iterations {
            Iterations::Infinite => "indefinite".to_owned(),
            Iterations::Count(n) => n.to_string(),
        };
        let _ = write!(out, " repeatCount=\"{count}\"");
    }
    out.push_str(&calc_mode_attrs(d));
    if d.fill.holds_end() {
        out.push_str(" fill=\"freeze\"");
    }
    if d.origin == Origin::Css && d.timing != TimingFunction::Linear {
        tracing::debug!(name = %d.name, timing = %d.timing, "SMIL output drops descriptor timing");
    }
    out.push_str("/>");
    out
}

fn begin_attr(delay: f64) -> String {
    if delay > 0.0 {
        format!(" begin=\"{}s\"", fmt_num(delay))
    } else {
        String::new()
    }
}

fn calc_mode_attrs(d: &AnimationDescriptor) -> String {
    let easings = d.keyframes.iter().skip(1).map(|k| k.easing).collect::<Vec<_>>();
    if easings.is_empty() || easings.iter().all(Option::is_none) {
        return String::new();
    }
    if easings.iter().all(|e| *e == Some(TimingFunction::STEP_END)) {
        return " calcMode=\"discrete\"".to_owned();
    }
    let splines = easings
        .iter()
        .map(|e| match e {
            Some(TimingFunction::CubicBezier { x1, y1, x2, y2 }) => format!(
                "{} {} {} {}",
                fmt_num(*x1),
                fmt_num(*y1),
                fmt_num(*x2),
                fmt_num(*y2)
            ),
            _ => "0 0 1 1".to_owned(),
        })
        .collect::<Vec<_>>()
        .join(";");
    format!(" calcMode=\"spline\" keySplines=\"{splines}\"")
}

/// When every value is the same single transform function, return its name and the raw args.
fn single_transform_kind(property: &str, values: &[String]) -> Option<(String, Vec<String>)> {
    if property != "transform" || values.is_empty() {
        return None;
    }
    let mut kind = None::<String>;
    let mut args = Vec::with_capacity(values.len());
    for v in values {
        let list = parse_transform_list(v)?;
        let [f] = &list[..] else {
            return None;
        };
        if !matches!(
            f.name.as_str(),
            "translate" | "scale" | "rotate" | "skewX" | "skewY"
        ) {
            return None;
        }
        match &kind {
            Some(k) if *k != f.name => return None,
            Some(_) => {}
            None => kind = Some(f.name.clone()),
        }
        let inner = v.trim().strip_prefix(f.name.as_str())?.trim_start();
        let inner = inner.strip_prefix('(')?.strip_suffix(')')?;
        args.push(inner.trim().to_owned());
    }
    Some((kind?, args))
}

#[cfg(test)]
#[path = "../../tests/unit/extract/unparse.rs"]
mod tests;
