use va_core::charset::GlyphRamp;
use va_core::frame::{CharGrid, GlyphCell, RawFrame};

/// Au-delà de cette luminance, la cellule reste vide (espace sans couleur).
pub const BLANK_THRESHOLD: f64 = 230.0;

/// Luminance BT.601 appliquée à l'ordre natif des canaux (c0, c1, c2).
///
/// Avec un décodeur BGR, c0 = B, c1 = G, c2 = R.
///
/// # Example
/// ```
/// use va_ascii::glyph::luminance;
/// assert!((luminance([10, 200, 50]) - 133.49).abs() < 1e-9);
/// ```
#[inline(always)]
#[must_use]
pub fn luminance(sample: [u8; 3]) -> f64 {
    0.114 * f64::from(sample[0]) + 0.587 * f64::from(sample[1]) + 0.299 * f64::from(sample[2])
}

/// Cellule pour une luminance déjà calculée. Seuil strict : `> 230` → vide.
#[inline(always)]
#[must_use]
pub fn cell_for_luminance(lum: f64, color: (u8, u8, u8), ramp: &GlyphRamp) -> GlyphCell {
    if lum > BLANK_THRESHOLD {
        return GlyphCell::Blank;
    }
    GlyphCell::Glyph {
        ch: ramp.glyph_for(lum),
        color,
    }
}

/// Convertit un échantillon (c0, c1, c2) en cellule colorée.
///
/// La couleur est l'échantillon relu en ordre inverse : (c2, c1, c0) → (r, g, b).
///
/// # Example
/// ```
/// use va_ascii::glyph::to_glyph;
/// use va_core::charset::GlyphRamp;
/// use va_core::frame::GlyphCell;
///
/// let ramp = GlyphRamp::default();
/// assert_eq!(
///     to_glyph([10, 200, 50], &ramp),
///     GlyphCell::Glyph { ch: '=', color: (50, 200, 10) }
/// );
/// ```
#[inline(always)]
#[must_use]
pub fn to_glyph(sample: [u8; 3], ramp: &GlyphRamp) -> GlyphCell {
    let [c0, c1, c2] = sample;
    cell_for_luminance(luminance(sample), (c2, c1, c0), ramp)
}

/// Applique `to_glyph` à chaque échantillon, row-major.
///
/// La grille a exactement les dimensions de la frame (déjà redimensionnée).
///
/// # Example
/// ```
/// use va_ascii::glyph::frame_to_grid;
/// use va_core::charset::GlyphRamp;
/// use va_core::frame::RawFrame;
///
/// let grid = frame_to_grid(&RawFrame::new(4, 3), &GlyphRamp::default());
/// assert_eq!((grid.width(), grid.height()), (4, 3));
/// ```
#[must_use]
pub fn frame_to_grid(frame: &RawFrame, ramp: &GlyphRamp) -> CharGrid {
    let width = frame.width.min(u32::from(u16::MAX)) as u16;
    let height = frame.height.min(u32::from(u16::MAX)) as u16;
    let mut grid = CharGrid::new(width, height);

    for (y, row) in frame.rows().take(height as usize).enumerate() {
        for (x, px) in row.chunks_exact(3).take(width as usize).enumerate() {
            grid.set(x as u16, y as u16, to_glyph([px[0], px[1], px[2]], ramp));
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_maps_to_first_glyph() {
        let ramp = GlyphRamp::default();
        assert_eq!(
            to_glyph([0, 0, 0], &ramp),
            GlyphCell::Glyph {
                ch: '_',
                color: (0, 0, 0)
            }
        );
    }

    #[test]
    fn white_is_blank() {
        assert_eq!(to_glyph([255, 255, 255], &GlyphRamp::default()), GlyphCell::Blank);
    }

    #[test]
    fn threshold_is_strict() {
        let ramp = GlyphRamp::default();
        assert!(matches!(
            cell_for_luminance(230.0, (1, 2, 3), &ramp),
            GlyphCell::Glyph { ch: ':', .. }
        ));
        assert_eq!(cell_for_luminance(230.001, (1, 2, 3), &ramp), GlyphCell::Blank);
    }

    #[test]
    fn luminance_weights_follow_channel_position() {
        // Le poids 0.587 porte sur c1, quel que soit le canal qu'il représente.
        assert!((luminance([0, 100, 0]) - 58.7).abs() < 1e-9);
        assert!((luminance([100, 0, 0]) - 11.4).abs() < 1e-9);
        assert!((luminance([0, 0, 100]) - 29.9).abs() < 1e-9);
    }

    #[test]
    fn color_is_reversed_channel_order() {
        let ramp = GlyphRamp::default();
        let GlyphCell::Glyph { color, .. } = to_glyph([1, 2, 3], &ramp) else {
            panic!("expected glyph");
        };
        assert_eq!(color, (3, 2, 1));
    }

    #[test]
    fn to_glyph_is_deterministic() {
        let ramp = GlyphRamp::default();
        for sample in [[0, 0, 0], [10, 200, 50], [123, 45, 67], [255, 255, 255]] {
            assert_eq!(to_glyph(sample, &ramp), to_glyph(sample, &ramp));
        }
    }

    #[test]
    fn frame_to_grid_is_row_major() {
        let ramp = GlyphRamp::default();
        let mut frame = RawFrame::filled(3, 2, [255, 255, 255]);
        frame.set_sample(2, 1, [10, 200, 50]);
        let grid = frame_to_grid(&frame, &ramp);

        assert_eq!(grid.get(0, 0), GlyphCell::Blank);
        assert_eq!(
            grid.get(2, 1),
            GlyphCell::Glyph {
                ch: '=',
                color: (50, 200, 10)
            }
        );
        assert_eq!(grid, frame_to_grid(&frame, &ramp));
    }
}
