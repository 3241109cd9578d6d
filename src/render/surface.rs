use std::sync::Arc;

use crate::foundation::error::{SvgifError, SvgifResult};
use crate::foundation::math::demul_u8;

/// Largest raster edge accepted by [`ResvgSurface`].
pub const MAX_DIM: u32 = 16_384;

/// A rasterized frame: premultiplied RGBA8, row-major, no padding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: Vec<u8>,
}

impl RasterBuffer {
    /// Fully transparent buffer.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    /// RGBA of the pixel at `(x, y)`, still premultiplied.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// `true` when the data length matches the dimensions.
    pub fn is_well_formed(&self) -> bool {
        self.data.len() == (self.width as usize) * (self.height as usize) * 4
    }

    /// Copy of the pixels with premultiplication undone.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        self.data
            .chunks_exact(4)
            .flat_map(|p| {
                let a = p[3];
                [demul_u8(p[0], a), demul_u8(p[1], a), demul_u8(p[2], a), a]
            })
            .collect()
    }
}

/// Rasterization backend: turns serialized SVG markup into pixels.
pub trait RasterSurface {
    /// Rasterize `markup`, stretched to `width` x `height`.
    fn rasterize(&mut self, markup: &str, width: u32, height: u32) -> SvgifResult<RasterBuffer>;
}

impl<S: RasterSurface + ?Sized> RasterSurface for &mut S {
    fn rasterize(&mut self, markup: &str, width: u32, height: u32) -> SvgifResult<RasterBuffer> {
        (**self).rasterize(markup, width, height)
    }
}

/// Default surface backed by `usvg` + `resvg`.
///
/// The font database is loaded once and shared by every frame.
pub struct ResvgSurface {
    opts: usvg::Options<'static>,
}

impl ResvgSurface {
    /// Build a surface with system fonts loaded.
    pub fn new() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        Self::with_fontdb(Arc::new(db))
    }

    /// Build a surface that resolves text against `fontdb`.
    pub fn with_fontdb(fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self {
            opts: usvg::Options {
                fontdb,
                ..Default::default()
            },
        }
    }
}

impl Default for ResvgSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResvgSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResvgSurface")
            .field("fonts", &self.opts.fontdb.len())
            .finish()
    }
}

impl RasterSurface for ResvgSurface {
    fn rasterize(&mut self, markup: &str, width: u32, height: u32) -> SvgifResult<RasterBuffer> {
        if width == 0 || height == 0 || width > MAX_DIM || height > MAX_DIM {
            return Err(SvgifError::render(format!(
                "raster size {width}x{height} is outside 1..={MAX_DIM}"
            )));
        }

        let tree = usvg::Tree::from_str(markup, &self.opts)
            .map_err(|e| SvgifError::render(format!("parse frame svg: {e}")))?;
        let data = rasterize_tree_to_premul_rgba8(&tree, width, height)?;
        Ok(RasterBuffer {
            width,
            height,
            data,
        })
    }
}

fn rasterize_tree_to_premul_rgba8(tree: &usvg::Tree, width: u32, height: u32) -> SvgifResult<Vec<u8>> {
    let size = tree.size();
    if !size.width().is_finite() || size.width() <= 0.0 || size.height() <= 0.0 {
        return Err(SvgifError::render("svg has invalid width/height"));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| SvgifError::render("failed to allocate frame pixmap"))?;

    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
