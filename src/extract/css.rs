use std::collections::HashMap;

use crate::animation::model::{
    AnimationDescriptor, Direction, FillMode, Iterations, Keyframe, Origin, Value,
};
use crate::animation::timing::TimingFunction;
use crate::document::selector::Selector;
use crate::document::tree::parse_style;
use crate::extract::clock::parse_css_time;

/// Duration used when a CSS animation omits it (or writes `0s`).
pub const DEFAULT_CSS_DURATION: f64 = 2.0;

const KEYFRAME_TIMING: &str = "animation-timing-function";

/// One keyframe selector block after offset resolution and merging.
#[derive(Clone, Debug)]
struct KeyframeBlock {
    offset: f64,
    /// Properties in declaration order.
    values: Vec<(String, Value)>,
    /// Easing for the segment that starts at this block.
    timing: Option<TimingFunction>,
}

/// One entry of an `animation` list, before defaults are applied.
#[derive(Clone, Debug, Default)]
struct AnimationProps {
    name: Option<String>,
    duration: Option<f64>,
    delay: Option<f64>,
    iterations: Option<Iterations>,
    direction: Option<Direction>,
    timing: Option<TimingFunction>,
    fill: Option<FillMode>,
}

/// Extract descriptors from style sheet text (the concatenated `<style>` contents).
pub fn extract_css(style_text: &str) -> Vec<AnimationDescriptor> {
    let css = strip_comments(style_text);

    let mut keyframes = HashMap::<String, Vec<KeyframeBlock>>::new();
    let mut rules = Vec::<(&str, &str)>::new();
    collect_rules(&css, &mut keyframes, &mut rules);

    let mut out = Vec::new();
    for (prelude, body) in rules {
        let entries = animation_props(body);
        if entries.is_empty() {
            continue;
        }

        for raw_selector in prelude.split(',') {
            let Some(target) = Selector::parse(raw_selector) else {
                tracing::debug!(selector = raw_selector.trim(), "skipping unsupported selector");
                continue;
            };
            for props in &entries {
                let Some(name) = props.name.as_deref() else {
                    continue;
                };
                let blocks = keyframes.get(name).map(Vec::as_slice).unwrap_or_default();
                out.extend(descriptors_for(name, &target, props, blocks));
            }
        }
    }
    out
}

fn descriptors_for(
    name: &str,
    target: &Selector,
    props: &AnimationProps,
    blocks: &[KeyframeBlock],
) -> Vec<AnimationDescriptor> {
    let duration = match props.duration {
        Some(d) if d > 0.0 => d,
        _ => DEFAULT_CSS_DURATION,
    };
    let base = AnimationDescriptor {
        name: name.to_owned(),
        target: target.clone(),
        property: "transform".to_owned(),
        duration,
        delay: props.delay.unwrap_or(0.0),
        iterations: props.iterations.unwrap_or_default(),
        direction: props.direction.unwrap_or_default(),
        timing: props.timing.unwrap_or_default(),
        fill: props.fill.unwrap_or_default(),
        origin: Origin::Css,
        keyframes: Vec::new(),
    };

    let mut properties = Vec::<&str>::new();
    for block in blocks {
        for (prop, _) in &block.values {
            if !properties.contains(&prop.as_str()) {
                properties.push(prop);
            }
        }
    }
    if properties.is_empty() {
        tracing::debug!(name, "animation has no keyframes; emitting a no-op descriptor");
        return vec![base];
    }

    properties
        .into_iter()
        .map(|prop| {
            let mut track = Vec::new();
            let mut prev_timing = None;
            for block in blocks {
                let Some((_, value)) = block.values.iter().find(|(p, _)| p == prop) else {
                    continue;
                };
                let mut kf = Keyframe::single(block.offset, prop, value.clone());
                kf.easing = if track.is_empty() { None } else { prev_timing };
                track.push(kf);
                prev_timing = block.timing;
            }
            AnimationDescriptor {
                property: prop.to_owned(),
                keyframes: track,
                ..base.clone()
            }
        })
        .collect()
}

fn collect_rules<'a>(
    css: &'a str,
    keyframes: &mut HashMap<String, Vec<KeyframeBlock>>,
    rules: &mut Vec<(&'a str, &'a str)>,
) {
    for (prelude, body) in blocks(css) {
        let lower = prelude.to_ascii_lowercase();
        if let Some(name) = lower
            .strip_prefix("@keyframes")
            .or_else(|| lower.strip_prefix("@-webkit-keyframes"))
        {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            // Names are case-sensitive; recover the original spelling.
            let name = &prelude[prelude.len() - name.len()..];
            keyframes.insert(name.to_owned(), parse_keyframes(body));
        } else if lower.starts_with("@media") || lower.starts_with("@supports") {
            collect_rules(body, keyframes, rules);
        } else if !lower.starts_with('@') {
            rules.push((prelude, body));
        }
    }
}

fn parse_keyframes(body: &str) -> Vec<KeyframeBlock> {
    let mut out = Vec::<KeyframeBlock>::new();
    for (prelude, decls) in blocks(body) {
        let mut values = Vec::new();
        let mut timing = None;
        for (prop, raw) in declarations(decls) {
            if prop == KEYFRAME_TIMING {
                timing = TimingFunction::parse(&raw);
            } else {
                values.push((prop, Value::parse(&raw)));
            }
        }

        for sel in prelude.split(',') {
            let Some(offset) = keyframe_offset(sel) else {
                tracing::debug!(selector = sel.trim(), "skipping invalid keyframe selector");
                continue;
            };
            match out.iter_mut().find(|b| b.offset == offset) {
                Some(existing) => {
                    for (prop, v) in &values {
                        match existing.values.iter_mut().find(|(p, _)| p == prop) {
                            Some(slot) => slot.1 = v.clone(),
                            None => existing.values.push((prop.clone(), v.clone())),
                        }
                    }
                    if timing.is_some() {
                        existing.timing = timing;
                    }
                }
                None => out.push(KeyframeBlock {
                    offset,
                    values: values.clone(),
                    timing,
                }),
            }
        }
    }
    out.sort_by(|a, b| a.offset.total_cmp(&b.offset));
    out
}

fn keyframe_offset(sel: &str) -> Option<f64> {
    let sel = sel.trim().to_ascii_lowercase();
    match sel.as_str() {
        "from" => Some(0.0),
        "to" => Some(1.0),
        _ => {
            let pct = sel.strip_suffix('%')?.trim().parse::<f64>().ok()?;
            (0.0..=100.0).contains(&pct).then_some(pct / 100.0)
        }
    }
}

fn animation_props(body: &str) -> Vec<AnimationProps> {
    let decls = declarations(body);

    let mut entries = Vec::new();
    for (prop, value) in &decls {
        if prop == "animation" {
            entries = split_top_level(value, |c| c == ',')
                .iter()
                .map(|entry| parse_shorthand_entry(entry))
                .collect();
        }
    }

    // `animation-name` decides how many entries the list has.
    let mut longhands = decls
        .iter()
        .filter_map(|(prop, value)| Some((prop.strip_prefix("animation-")?, value)))
        .collect::<Vec<_>>();
    longhands.sort_by_key(|(longhand, _)| *longhand != "name");

    for (longhand, value) in longhands {
        let items = split_top_level(value, |c| c == ',');
        if items.is_empty() {
            continue;
        }
        if longhand == "name" && entries.len() < items.len() {
            entries.resize_with(items.len(), AnimationProps::default);
        }
        for (i, props) in entries.iter_mut().enumerate() {
            let item = items[i % items.len()].trim();
            match longhand {
                "name" => props.name = (item != "none").then(|| item.to_owned()),
                "duration" => props.duration = parse_css_time(item),
                "delay" => props.delay = parse_css_time(item),
                "iteration-count" => props.iterations = Iterations::parse(item),
                "direction" => props.direction = Direction::parse(item),
                "timing-function" => props.timing = Some(timing_or_identity(item)),
                "fill-mode" => props.fill = FillMode::parse(item),
                _ => {}
            }
        }
    }
    entries
}

fn parse_shorthand_entry(entry: &str) -> AnimationProps {
    let mut props = AnimationProps::default();
    for token in split_top_level(entry, char::is_whitespace) {
        let lower = token.to_ascii_lowercase();
        if let Some(t) = parse_css_time(&lower) {
            if props.duration.is_none() {
                props.duration = Some(t);
            } else if props.delay.is_none() {
                props.delay = Some(t);
            }
        } else if lower == "infinite" || lower.parse::<f64>().is_ok() {
            props.iterations = Iterations::parse(&lower).or(props.iterations);
        } else if let Some(d) = Direction::parse(&lower) {
            props.direction = Some(d);
        } else if let Some(f) = FillMode::parse(&lower) {
            props.fill = Some(f);
        } else if matches!(lower.as_str(), "running" | "paused") {
            // play state has no effect on export
        } else if let Some(t) = TimingFunction::parse(&lower) {
            props.timing = Some(t);
        } else if lower.contains('(') {
            props.timing = Some(timing_or_identity(&lower));
        } else if props.name.is_none() {
            props.name = Some(token);
        }
    }
    props
}

/// A present but malformed timing function degrades to the identity curve, never to `ease`.
fn timing_or_identity(raw: &str) -> TimingFunction {
    TimingFunction::parse(raw).unwrap_or_else(|| {
        tracing::debug!(timing = raw, "malformed timing function; using linear");
        TimingFunction::Linear
    })
}

/// Declarations of a rule body, with vendor prefixes and `!important` removed.
fn declarations(body: &str) -> Vec<(String, String)> {
    parse_style(body)
        .into_iter()
        .map(|(prop, value)| {
            let prop = prop.strip_prefix("-webkit-").map(str::to_owned).unwrap_or(prop);
            let value = value
                .strip_suffix("!important")
                .map(|v| v.trim().to_owned())
                .unwrap_or(value);
            (prop, value)
        })
        .collect()
}

/// Split `(prelude, body)` pairs of top-level `{}` blocks. Stray statements (`@import ...;`) are
/// skipped.
fn blocks(css: &str) -> Vec<(&str, &str)> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut prelude_start = 0usize;
    let mut body_start = 0usize;
    let mut prelude = "";
    for (i, c) in css.char_indices() {
        match c {
            '{' => {
                if depth == 0 {
                    prelude = css[prelude_start..i].trim();
                    body_start = i + 1;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    out.push((prelude, &css[body_start..i]));
                    prelude_start = i + 1;
                }
            }
            ';' if depth == 0 => prelude_start = i + 1,
            _ => {}
        }
    }
    out
}

/// Split on `is_sep` outside parentheses, dropping empty pieces.
pub(crate) fn split_top_level(s: &str, is_sep: impl Fn(char) -> bool) -> Vec<String> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut cur = String::new();
    for c in s.chars() {
        match c {
            '(' => {
                depth += 1;
                cur.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                cur.push(c);
            }
            c if depth == 0 && is_sep(c) => {
                if !cur.trim().is_empty() {
                    out.push(cur.trim().to_owned());
                }
                cur.clear();
            }
            c => cur.push(c),
        }
    }
    if !cur.trim().is_empty() {
        out.push(cur.trim().to_owned());
    }
    out
}

fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => {
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/extract/css.rs"]
mod tests;
