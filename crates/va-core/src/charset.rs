/// 9 caractères, de l'aspect le plus sombre au plus clair. Le dernier est un espace.
pub const GLYPH_RAMP: &str = "_%*-=+#: ";

/// Nombre d'entrées de la rampe.
pub const RAMP_LEN: usize = 9;

/// Rampe de glyphes indexée par luminance.
///
/// # Example
/// ```
/// use va_core::charset::GlyphRamp;
/// let ramp = GlyphRamp::default();
/// assert_eq!(ramp.glyph_for(0.0), '_');
/// assert_eq!(ramp.len(), 9);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphRamp {
    chars: [char; RAMP_LEN],
}

impl Default for GlyphRamp {
    fn default() -> Self {
        let mut chars = [' '; RAMP_LEN];
        for (slot, ch) in chars.iter_mut().zip(GLYPH_RAMP.chars()) {
            *slot = ch;
        }
        Self { chars }
    }
}

impl GlyphRamp {
    /// Nombre d'entrées (toujours 9).
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always `false`: a ramp has a fixed, non-zero length.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Index de la rampe pour une luminance [0, 255] : `floor(lum / 255 * (len - 1))`.
    ///
    /// Le résultat est borné à `len - 1`, les valeurs négatives ou NaN à 0.
    ///
    /// # Example
    /// ```
    /// use va_core::charset::GlyphRamp;
    /// let ramp = GlyphRamp::default();
    /// assert_eq!(ramp.index_for(133.49), 4);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn index_for(&self, luminance: f64) -> usize {
        let last = self.chars.len() - 1;
        let idx = ((luminance / 255.0) * last as f64).floor();
        if idx.is_nan() || idx < 0.0 {
            0
        } else {
            (idx as usize).min(last)
        }
    }

    /// Caractère pour une luminance donnée.
    #[inline(always)]
    #[must_use]
    pub fn glyph_for(&self, luminance: f64) -> char {
        self.chars[self.index_for(luminance)]
    }

    /// Caractère à l'index `i`, borné.
    #[must_use]
    pub fn get(&self, i: usize) -> char {
        self.chars[i.min(self.chars.len() - 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_has_nine_entries_ending_in_space() {
        let ramp = GlyphRamp::default();
        assert_eq!(ramp.len(), RAMP_LEN);
        assert_eq!(ramp.get(0), '_');
        assert_eq!(ramp.get(4), '=');
        assert_eq!(ramp.get(8), ' ');
    }

    #[test]
    fn index_stays_in_bounds() {
        let ramp = GlyphRamp::default();
        assert_eq!(ramp.index_for(-5.0), 0);
        assert_eq!(ramp.index_for(f64::NAN), 0);
        assert_eq!(ramp.index_for(255.0), 8);
        assert_eq!(ramp.index_for(10_000.0), 8);
        assert_eq!(ramp.get(42), ' ');
    }

    #[test]
    fn index_monotonic() {
        let ramp = GlyphRamp::default();
        let mut prev = 0usize;
        for lum in 0..=255u8 {
            let idx = ramp.index_for(f64::from(lum));
            assert!(idx >= prev, "rampe non monotone à luminance {lum}");
            prev = idx;
        }
    }

    #[test]
    fn threshold_luminance_maps_to_colon() {
        // floor(230 / 255 * 8) = floor(7.21) = 7
        assert_eq!(GlyphRamp::default().glyph_for(230.0), ':');
    }
}
