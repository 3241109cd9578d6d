use crate::animation::interpolate::interpolate;
use crate::animation::model::AnimationDescriptor;
use crate::document::tree::{Document, NodeId, NodeOverrides, OverrideTable};
use crate::eval::progress::local_progress;
use crate::foundation::error::SvgifResult;
use crate::render::surface::{RasterBuffer, RasterSurface};
use crate::render::transform::normalize_transform;

/// Properties written as SVG attributes rather than inline style.
pub const GEOMETRY_ATTRIBUTES: [&str; 17] = [
    "x", "y", "cx", "cy", "r", "rx", "ry", "width", "height", "x1", "y1", "x2", "y2", "d", "points",
    "offset", "viewBox",
];

/// Descriptor targets resolved to node ids once per export.
#[derive(Clone, Debug)]
pub struct FramePlan {
    targets: Vec<Vec<NodeId>>,
}

impl FramePlan {
    /// Resolve every descriptor's selector against `doc`.
    pub fn new(doc: &Document, descriptors: &[AnimationDescriptor]) -> Self {
        let targets = descriptors
            .iter()
            .map(|d| {
                let ids = doc.select(&d.target);
                if ids.is_empty() {
                    tracing::debug!(name = %d.name, target = %d.target, "animation target matches nothing");
                }
                ids
            })
            .collect();
        Self { targets }
    }

    /// Node ids targeted by descriptor `index`.
    pub fn targets(&self, index: usize) -> &[NodeId] {
        self.targets.get(index).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Per-node overrides for every descriptor live at `timestamp`.
///
/// Descriptors are applied in order, so later descriptors win for a property they share with an
/// earlier one; other properties accumulate.
pub fn frame_overrides(
    descriptors: &[AnimationDescriptor],
    plan: &FramePlan,
    timestamp: f64,
) -> OverrideTable {
    let mut table = OverrideTable::new();
    for (i, desc) in descriptors.iter().enumerate() {
        let targets = plan.targets(i);
        if targets.is_empty() || desc.keyframes.is_empty() {
            continue;
        }
        let Some(progress) = local_progress(desc, timestamp) else {
            continue;
        };
        let values = interpolate(&desc.keyframes, desc.timing.evaluate(progress));

        for &node in targets {
            let entry = table.entry(node).or_default();
            for (prop, value) in &values {
                apply_property(entry, prop, &value.to_string());
            }
        }
    }
    table
}

fn apply_property(entry: &mut NodeOverrides, prop: &str, value: &str) {
    if prop == "transform" {
        entry.attrs.insert(prop.to_owned(), normalize_transform(value));
    } else if GEOMETRY_ATTRIBUTES.contains(&prop) {
        entry.attrs.insert(prop.to_owned(), value.to_owned());
    } else {
        entry.style.insert(prop.to_owned(), value.to_owned());
    }
}

/// Renders frames of one document through a [`RasterSurface`].
pub struct FrameRenderer<'a, S: RasterSurface> {
    doc: &'a Document,
    descriptors: &'a [AnimationDescriptor],
    plan: FramePlan,
    surface: S,
    width: u32,
    height: u32,
}

impl<'a, S: RasterSurface> FrameRenderer<'a, S> {
    /// Prepare a renderer; selectors are resolved here.
    pub fn new(
        doc: &'a Document,
        descriptors: &'a [AnimationDescriptor],
        surface: S,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            doc,
            descriptors,
            plan: FramePlan::new(doc, descriptors),
            surface,
            width,
            height,
        }
    }

    /// Serialized markup of the frame at `timestamp`.
    pub fn markup_at(&self, timestamp: f64) -> String {
        let overrides = frame_overrides(self.descriptors, &self.plan, timestamp);
        self.doc.to_markup(&overrides)
    }

    /// Rasterize the frame at `timestamp`.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn render_frame(&mut self, timestamp: f64) -> SvgifResult<RasterBuffer> {
        let markup = self.markup_at(timestamp);
        self.surface.rasterize(&markup, self.width, self.height)
    }

    /// Output size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
