use anyhow::Result;
use va_core::charset::GlyphRamp;
use va_core::config::Resample;
use va_core::frame::{CharGrid, GridSize, RawFrame};

use crate::glyph::frame_to_grid;
use crate::resize::Resizer;

/// Frame renderer : resize vers la grille cible, puis conversion en glyphes.
///
/// La géométrie est fixée à la construction et ne change plus pendant la session.
///
/// # Example
/// ```
/// use va_ascii::FrameRenderer;
/// use va_core::config::Resample;
/// use va_core::frame::{GridSize, RawFrame};
///
/// let size = GridSize::for_source(320, 240, 40, 2.0);
/// let mut renderer = FrameRenderer::new(size, Resample::Area);
/// let grid = renderer.render(&RawFrame::new(320, 240)).unwrap();
/// assert_eq!((grid.width(), grid.height()), (40, 15));
/// ```
pub struct FrameRenderer {
    size: GridSize,
    ramp: GlyphRamp,
    resizer: Resizer,
    /// Buffer réutilisé pour la frame redimensionnée.
    scaled: RawFrame,
}

impl FrameRenderer {
    /// Create a renderer producing `size` grids with the default glyph ramp.
    #[must_use]
    pub fn new(size: GridSize, resample: Resample) -> Self {
        log::debug!(
            "Renderer : grille {}x{}, resample {resample:?}",
            size.width,
            size.height
        );
        Self {
            size,
            ramp: GlyphRamp::default(),
            resizer: Resizer::new(resample),
            scaled: RawFrame::new(u32::from(size.width), u32::from(size.height)),
        }
    }

    /// Grid geometry of every frame this renderer produces.
    #[must_use]
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Glyph ramp in use.
    #[must_use]
    pub fn ramp(&self) -> &GlyphRamp {
        &self.ramp
    }

    /// Resize `raw` to the grid, then map every sample to a glyph.
    ///
    /// # Errors
    /// Returns an error if the raw buffer does not match its declared
    /// dimensions.
    pub fn render(&mut self, raw: &RawFrame) -> Result<CharGrid> {
        self.resizer.resize_into(raw, &mut self.scaled)?;
        Ok(frame_to_grid(&self.scaled, &self.ramp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use va_core::frame::GlyphCell;

    #[test]
    fn every_frame_has_session_geometry() {
        let size = GridSize::for_source(640, 480, 100, 2.0);
        let mut renderer = FrameRenderer::new(size, Resample::Area);
        for shade in [0u8, 90, 255] {
            let grid = renderer
                .render(&RawFrame::filled(640, 480, [shade, shade, shade]))
                .unwrap();
            assert_eq!(grid.width(), 100);
            assert_eq!(grid.height(), 38);
            assert_eq!(grid.rows().count(), 38);
        }
    }

    #[test]
    fn black_frame_renders_underscores() {
        let size = GridSize {
            width: 8,
            height: 3,
        };
        let mut renderer = FrameRenderer::new(size, Resample::Nearest);
        let grid = renderer.render(&RawFrame::new(16, 12)).unwrap();
        assert!(grid.rows().flatten().all(|c| *c
            == GlyphCell::Glyph {
                ch: '_',
                color: (0, 0, 0)
            }));
    }

    #[test]
    fn mismatched_buffer_is_an_error() {
        let size = GridSize {
            width: 4,
            height: 2,
        };
        let mut renderer = FrameRenderer::new(size, Resample::Area);
        let broken = RawFrame {
            data: vec![0; 5],
            width: 10,
            height: 10,
        };
        assert!(renderer.render(&broken).is_err());
    }

    #[test]
    fn mismatched_buffer_at_grid_size_is_an_error() {
        let size = GridSize {
            width: 4,
            height: 2,
        };
        let mut renderer = FrameRenderer::new(size, Resample::Area);
        let broken = RawFrame {
            data: vec![0; 5],
            width: 4,
            height: 2,
        };
        assert!(renderer.render(&broken).is_err());
    }
}
