//! Procedurally drawn glyphs for control item buttons.
//!
//! Every glyph is drawn in black on a transparent background and flagged as a
//! template image, so the platform tints it to match the menu bar appearance.

use std::sync::OnceLock;
use stow_core::{Result, StowError};
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Backing scale of cached images (Retina).
pub const DEFAULT_SCALE: f32 = 2.0;

/// A glyph that can appear on a control item's button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Glyph {
    /// Hidden section divider.
    LargeChevron,
    /// Always-hidden section divider.
    SmallChevron,
    /// Always-visible item while items are hidden.
    CircleFilled,
    /// Always-visible item while items are shown.
    CircleStroked,
}

impl Glyph {
    pub const ALL: [Glyph; 4] = [
        Glyph::LargeChevron,
        Glyph::SmallChevron,
        Glyph::CircleFilled,
        Glyph::CircleStroked,
    ];

    /// Size in points.
    pub fn size(self) -> (f32, f32) {
        match self {
            Self::LargeChevron => (12.0, 12.0),
            Self::SmallChevron => (9.0, 9.0),
            Self::CircleFilled | Self::CircleStroked => (8.0, 8.0),
        }
    }

    fn index(self) -> usize {
        match self {
            Self::LargeChevron => 0,
            Self::SmallChevron => 1,
            Self::CircleFilled => 2,
            Self::CircleStroked => 3,
        }
    }
}

/// A rendered glyph.
#[derive(Clone)]
pub struct Image {
    pub glyph: Glyph,
    /// Backing scale factor the pixmap was rendered at.
    pub scale: f32,
    /// Template images are tinted by the platform.
    pub is_template: bool,
    pixmap: Pixmap,
}

impl Image {
    /// Size in points.
    pub fn size(&self) -> (f32, f32) {
        self.glyph.size()
    }

    pub fn pixel_width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn pixel_height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Premultiplied RGBA pixels, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Alpha of the pixel at (`x`, `y`), or `None` outside the image.
    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        self.pixmap.pixel(x, y).map(|p| p.alpha())
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| StowError::Icon(format!("PNG encode failed: {e}")))
    }
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("glyph", &self.glyph)
            .field("scale", &self.scale)
            .field("pixels", &(self.pixel_width(), self.pixel_height()))
            .finish()
    }
}

/// Draw `glyph` at `scale` (pixels per point).
pub fn render(glyph: Glyph, scale: f32) -> Result<Image> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(StowError::Icon(format!("invalid scale {scale}")));
    }

    let (width, height) = glyph.size();
    let pixel = |points: f32| (points * scale).ceil() as u32;
    let mut pixmap = Pixmap::new(pixel(width), pixel(height))
        .ok_or_else(|| StowError::Icon(format!("cannot allocate pixmap for {glyph:?}")))?;

    let mut paint = Paint::default();
    paint.set_color_rgba8(0, 0, 0, 255);
    paint.anti_alias = true;
    let transform = Transform::from_scale(scale, scale);

    match glyph {
        Glyph::LargeChevron => {
            let path = chevron(&[(7.75, 2.5), (4.25, 6.0), (7.75, 9.5)])?;
            pixmap.stroke_path(&path, &paint, &round_stroke(2.0), transform, None);
        }
        Glyph::SmallChevron => {
            let path = chevron(&[(5.75, 1.75), (3.25, 4.5), (5.75, 7.25)])?;
            pixmap.stroke_path(&path, &paint, &round_stroke(1.5), transform, None);
        }
        Glyph::CircleFilled => {
            let path = circle(4.0, 4.0, 3.5)?;
            pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
        }
        Glyph::CircleStroked => {
            let path = circle(4.0, 4.0, 3.0)?;
            pixmap.stroke_path(&path, &paint, &round_stroke(1.5), transform, None);
        }
    }

    Ok(Image {
        glyph,
        scale,
        is_template: true,
        pixmap,
    })
}

/// Cached 2x rendering of `glyph`. `None` if rendering failed.
pub fn image(glyph: Glyph) -> Option<&'static Image> {
    static CACHE: [OnceLock<Option<Image>>; 4] = [const { OnceLock::new() }; 4];

    CACHE[glyph.index()]
        .get_or_init(|| match render(glyph, DEFAULT_SCALE) {
            Ok(image) => Some(image),
            Err(e) => {
                tracing::warn!("Failed to render {glyph:?}: {e}");
                None
            }
        })
        .as_ref()
}

fn round_stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    }
}

fn chevron(points: &[(f32, f32)]) -> Result<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for (i, &(x, y)) in points.iter().enumerate() {
        if i == 0 {
            builder.move_to(x, y);
        } else {
            builder.line_to(x, y);
        }
    }
    builder
        .finish()
        .ok_or_else(|| StowError::Icon("empty chevron path".into()))
}

fn circle(cx: f32, cy: f32, radius: f32) -> Result<tiny_skia::Path> {
    PathBuilder::from_circle(cx, cy, radius)
        .ok_or_else(|| StowError::Icon(format!("invalid circle radius {radius}")))
}
