//! Raster drawing backend.
//!
//! The check pipeline never touches pixels directly: it loads, draws and
//! saves through [`RasterBackend`], so tests can substitute a recording
//! implementation and the drawing stack stays swappable. The production
//! implementation is [`ImageBackend`] on `image` + `imageproc`.

use std::fs;
use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_line_segment_mut, draw_text_mut};

use crate::error::LabelprepError;

/// An RGB color triple.
pub type Color = [u8; 3];

/// Drawing surface used by the check pipeline.
pub trait RasterBackend {
    type Canvas;

    /// Decodes the image at `path` into a canvas.
    fn load(&self, path: &Path) -> Result<Self::Canvas, LabelprepError>;

    /// Pixel dimensions of a loaded canvas, `(width, height)`.
    fn dimensions(&self, canvas: &Self::Canvas) -> (u32, u32);

    /// Draws a hollow rectangle between two opposite corners.
    ///
    /// Corners may be given in any order and may lie outside the canvas;
    /// implementations must clip rather than fail, since invalid records
    /// are rendered deliberately.
    fn draw_rect(
        &self,
        canvas: &mut Self::Canvas,
        corner1: (i32, i32),
        corner2: (i32, i32),
        color: Color,
        thickness: u32,
    );

    /// Draws a text label with its top-left corner at `origin`.
    fn draw_label(
        &self,
        canvas: &mut Self::Canvas,
        text: &str,
        origin: (i32, i32),
        scale: f32,
        color: Color,
    );

    /// Encodes the canvas to `path`.
    fn save(&self, canvas: &Self::Canvas, path: &Path) -> Result<(), LabelprepError>;

    /// Whether this backend can actually render label text.
    fn supports_labels(&self) -> bool {
        true
    }
}

/// Well-known TrueType font locations tried by [`ImageBackend::discover`].
const FONT_SEARCH_PATHS: [&str; 6] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Production backend on the `image`/`imageproc` stack.
///
/// Label text needs a TrueType font. When none is supplied and none of the
/// well-known locations exists, rectangles are still drawn and label
/// drawing becomes a no-op; the CLI warns once in that case.
pub struct ImageBackend {
    font: Option<FontVec>,
}

impl ImageBackend {
    /// Creates a backend, loading the font at `path`.
    pub fn with_font(path: &Path) -> Result<Self, LabelprepError> {
        let bytes = fs::read(path).map_err(LabelprepError::Io)?;
        let font = FontVec::try_from_vec(bytes).map_err(|_| LabelprepError::FontLoad {
            path: path.to_path_buf(),
            message: "not a parseable TrueType/OpenType font".to_string(),
        })?;

        Ok(Self { font: Some(font) })
    }

    /// Creates a backend with the first font found in well-known system
    /// locations, or no font if none exists.
    pub fn discover() -> Self {
        for candidate in FONT_SEARCH_PATHS {
            let path = Path::new(candidate);
            if path.is_file() {
                if let Ok(backend) = Self::with_font(path) {
                    return backend;
                }
            }
        }

        Self::without_font()
    }

    /// Creates a backend that draws rectangles only.
    pub fn without_font() -> Self {
        Self { font: None }
    }
}

impl RasterBackend for ImageBackend {
    type Canvas = RgbImage;

    fn load(&self, path: &Path) -> Result<RgbImage, LabelprepError> {
        let decoded = image::open(path).map_err(|source| LabelprepError::ImageRead {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(decoded.to_rgb8())
    }

    fn dimensions(&self, canvas: &RgbImage) -> (u32, u32) {
        canvas.dimensions()
    }

    fn draw_rect(
        &self,
        canvas: &mut RgbImage,
        corner1: (i32, i32),
        corner2: (i32, i32),
        color: Color,
        thickness: u32,
    ) {
        // Four clipped line segments per ring, expanding outward. This
        // keeps inverted and out-of-frame corners drawable, which a
        // width/height rectangle type would reject.
        let pixel = Rgb(color);
        for ring in 0..thickness.max(1) {
            let ring = ring as i32;
            let (x1, y1) = (corner1.0 - ring, corner1.1 - ring);
            let (x2, y2) = (corner2.0 + ring, corner2.1 + ring);

            let tl = (x1 as f32, y1 as f32);
            let tr = (x2 as f32, y1 as f32);
            let br = (x2 as f32, y2 as f32);
            let bl = (x1 as f32, y2 as f32);

            draw_line_segment_mut(canvas, tl, tr, pixel);
            draw_line_segment_mut(canvas, tr, br, pixel);
            draw_line_segment_mut(canvas, br, bl, pixel);
            draw_line_segment_mut(canvas, bl, tl, pixel);
        }
    }

    fn draw_label(
        &self,
        canvas: &mut RgbImage,
        text: &str,
        origin: (i32, i32),
        scale: f32,
        color: Color,
    ) {
        if let Some(font) = &self.font {
            draw_text_mut(
                canvas,
                Rgb(color),
                origin.0,
                origin.1,
                PxScale::from(scale),
                font,
                text,
            );
        }
    }

    fn save(&self, canvas: &RgbImage, path: &Path) -> Result<(), LabelprepError> {
        canvas.save(path).map_err(|source| LabelprepError::ImageWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    fn supports_labels(&self) -> bool {
        self.font.is_some()
    }
}
