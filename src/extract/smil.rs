use std::collections::HashMap;

use crate::animation::model::{
    AnimationDescriptor, Direction, FillMode, Iterations, Keyframe, Origin, Value,
};
use crate::animation::timing::TimingFunction;
use crate::document::selector::Selector;
use crate::document::tree::{Document, NodeId};
use crate::extract::clock::{parse_begin, parse_clock};
use crate::foundation::math::fmt_num;

/// Extract descriptors from SMIL animation elements, in document order.
pub fn extract_smil(doc: &Document) -> Vec<AnimationDescriptor> {
    let mut seen = HashMap::<String, usize>::new();
    let mut out = Vec::new();

    for id in doc.elements() {
        let kind = doc.name(id);
        if !matches!(kind, "animate" | "animateTransform" | "animateMotion" | "set") {
            continue;
        }
        let Some(mut desc) = smil_descriptor(doc, id, kind) else {
            continue;
        };

        let count = seen.entry(desc.name.clone()).or_insert(0);
        *count += 1;
        if *count > 1 {
            desc.name = format!("{}_{}", desc.name, count);
        }
        out.push(desc);
    }
    out
}

fn smil_descriptor(doc: &Document, id: NodeId, kind: &str) -> Option<AnimationDescriptor> {
    let attr = |name: &str| doc.attr(id, name).map(str::trim).filter(|v| !v.is_empty());

    let property = match kind {
        "animateMotion" => "transform".to_owned(),
        "animateTransform" => attr("attributeName").unwrap_or("transform").to_owned(),
        _ => match attr("attributeName") {
            Some(a) => a.to_owned(),
            None => {
                tracing::debug!(element = kind, node = id.0, "animation without attributeName");
                return None;
            }
        },
    };

    let dur = attr("dur").and_then(parse_clock).filter(|d| *d > 0.0);
    let (duration, forced_fill) = match (kind, dur) {
        (_, Some(d)) => (d, None),
        ("set", None) => (0.0, Some(FillMode::Forwards)),
        _ => {
            tracing::debug!(element = kind, node = id.0, "skipping animation without usable dur");
            return None;
        }
    };

    let raw_values = if kind == "set" {
        attr("to").map(|v| vec![v.to_owned()])
    } else {
        raw_values(&attr)
    };
    let Some(raw_values) = raw_values.filter(|v| !v.is_empty()) else {
        tracing::debug!(element = kind, node = id.0, "animation without values");
        return None;
    };

    let values: Vec<String> = match kind {
        "animateTransform" => {
            let ty = attr("type").unwrap_or("translate");
            raw_values.iter().map(|v| format!("{ty}({v})")).collect()
        }
        "animateMotion" => {
            if attr("path").is_some() && attr("values").is_none() && attr("from").is_none() {
                tracing::debug!(node = id.0, "animateMotion paths are not supported");
                return None;
            }
            raw_values
                .iter()
                .map(|v| motion_point(v))
                .collect::<Option<Vec<_>>>()?
        }
        _ => raw_values,
    };

    let mut keyframes = values
        .iter()
        .zip(offsets(attr("keyTimes"), values.len()))
        .map(|(v, offset)| Keyframe::single(offset, &property, Value::parse(v)))
        .collect::<Vec<_>>();

    match attr("calcMode") {
        Some("discrete") => {
            for kf in keyframes.iter_mut().skip(1) {
                kf.easing = Some(TimingFunction::STEP_END);
            }
        }
        Some("spline") => {
            let splines = attr("keySplines").map(key_splines).unwrap_or_default();
            for (kf, spline) in keyframes.iter_mut().skip(1).zip(splines) {
                kf.easing = spline;
            }
        }
        _ => {}
    }

    let fill = forced_fill.unwrap_or(if attr("fill") == Some("freeze") {
        FillMode::Forwards
    } else {
        FillMode::None
    });

    Some(AnimationDescriptor {
        name: format!("smil_{kind}_{property}"),
        target: smil_target(doc, id, attr("href").or(attr("xlink:href"))),
        property,
        duration,
        delay: parse_begin(attr("begin")),
        iterations: attr("repeatCount")
            .and_then(Iterations::parse)
            .unwrap_or_default(),
        direction: Direction::Normal,
        timing: TimingFunction::Linear,
        fill,
        origin: Origin::Smil,
        keyframes,
    })
}

fn raw_values<'a>(attr: &impl Fn(&str) -> Option<&'a str>) -> Option<Vec<String>> {
    if let Some(values) = attr("values") {
        let mut list = values
            .split(';')
            .map(|v| v.trim().to_owned())
            .collect::<Vec<_>>();
        while list.last().is_some_and(String::is_empty) {
            list.pop();
        }
        return Some(list);
    }
    match (attr("from"), attr("to"), attr("by")) {
        (Some(from), Some(to), _) => Some(vec![from.to_owned(), to.to_owned()]),
        (Some(from), None, Some(by)) => Some(vec![from.to_owned(), add_by(from, by)?]),
        (None, Some(to), _) => Some(vec![to.to_owned()]),
        _ => None,
    }
}

/// `from + by`, argument-wise for space/comma separated number lists.
fn add_by(from: &str, by: &str) -> Option<String> {
    let nums = |s: &str| {
        s.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .map(|p| p.parse::<f64>().ok())
            .collect::<Option<Vec<_>>>()
    };
    let a = nums(from)?;
    let b = nums(by)?;
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    Some(
        a.iter()
            .zip(&b)
            .map(|(x, y)| fmt_num(x + y))
            .collect::<Vec<_>>()
            .join(" "),
    )
}

fn motion_point(raw: &str) -> Option<String> {
    let parts = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .map(|p| p.parse::<f64>().ok())
        .collect::<Option<Vec<_>>>()?;
    match parts[..] {
        [x, y] => Some(format!("translate({}, {})", fmt_num(x), fmt_num(y))),
        [x] => Some(format!("translate({})", fmt_num(x))),
        _ => None,
    }
}

/// Keyframe offsets from `keyTimes` when it matches the value count, else evenly spaced.
fn offsets(key_times: Option<&str>, n: usize) -> Vec<f64> {
    if let Some(raw) = key_times {
        let parsed = raw
            .split(';')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| p.parse::<f64>().ok().filter(|v| (0.0..=1.0).contains(v)))
            .collect::<Option<Vec<_>>>();
        if let Some(times) = parsed
            && times.len() == n
            && times.windows(2).all(|w| w[0] <= w[1])
        {
            return times;
        }
        tracing::debug!(key_times = raw, "ignoring keyTimes that do not match values");
    }
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => (0..n).map(|i| i as f64 / (n - 1) as f64).collect(),
    }
}

fn key_splines(raw: &str) -> Vec<Option<TimingFunction>> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let args = s
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|p| !p.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            TimingFunction::parse(&format!("cubic-bezier({args})"))
        })
        .collect()
}

fn smil_target(doc: &Document, id: NodeId, href: Option<&str>) -> Selector {
    if let Some(target) = href.and_then(|h| h.strip_prefix('#')) {
        return Selector::Id(target.to_owned());
    }
    match doc.parent(id) {
        Some(parent) => match doc.attr(parent, "id") {
            Some(pid) if Selector::parse(&format!("#{pid}")).is_some() => {
                Selector::Id(pid.to_owned())
            }
            _ => Selector::Node(parent),
        },
        None => Selector::Node(id),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/extract/smil.rs"]
mod tests;
