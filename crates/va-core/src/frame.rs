/// Nombre de canaux par échantillon (ordre natif du décodeur : B, G, R).
pub const CHANNELS: usize = 3;

/// Buffer de pixels brut, 3 bytes par échantillon, row-major, sans padding.
///
/// L'ordre des canaux est celui du décodeur et n'est jamais réordonné ici.
///
/// # Example
/// ```
/// use va_core::frame::RawFrame;
/// let frame = RawFrame::new(10, 10);
/// assert_eq!(frame.data.len(), 300);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawFrame {
    /// Samples, row-major, 3 bytes per sample.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl RawFrame {
    /// Crée un buffer noir aux dimensions données.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; Self::byte_len(width, height)],
            width,
            height,
        }
    }

    /// Crée une frame uniforme, pratique pour les tests et les mires.
    ///
    /// # Example
    /// ```
    /// use va_core::frame::RawFrame;
    /// let frame = RawFrame::filled(2, 2, [1, 2, 3]);
    /// assert_eq!(frame.sample(1, 1), [1, 2, 3]);
    /// ```
    #[must_use]
    pub fn filled(width: u32, height: u32, sample: [u8; CHANNELS]) -> Self {
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            data.extend_from_slice(&sample);
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Taille en bytes d'une frame `width × height`.
    #[inline]
    #[must_use]
    pub fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * CHANNELS
    }

    /// Accès à l'échantillon (x, y) dans l'ordre natif des canaux.
    ///
    /// Hors limites → noir.
    #[inline(always)]
    #[must_use]
    pub fn sample(&self, x: u32, y: u32) -> [u8; CHANNELS] {
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        match self.data.get(idx..idx + CHANNELS) {
            Some(s) => [s[0], s[1], s[2]],
            None => [0, 0, 0],
        }
    }

    /// Écrit l'échantillon (x, y).
    #[inline]
    pub fn set_sample(&mut self, x: u32, y: u32, sample: [u8; CHANNELS]) {
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        if let Some(dst) = self.data.get_mut(idx..idx + CHANNELS) {
            dst.copy_from_slice(&sample);
        }
    }

    /// Itère sur les lignes d'échantillons.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        let stride = (self.width as usize * CHANNELS).max(1);
        self.data.chunks_exact(stride)
    }
}

/// Une cellule rendue : espace nu, ou caractère avec couleur truecolor.
///
/// # Example
/// ```
/// use va_core::frame::GlyphCell;
/// let cell = GlyphCell::default();
/// assert_eq!(cell, GlyphCell::Blank);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GlyphCell {
    /// Espace sans séquence de couleur.
    #[default]
    Blank,
    /// Glyphe coloré.
    Glyph {
        /// Caractère à afficher.
        ch: char,
        /// Couleur foreground (r, g, b).
        color: (u8, u8, u8),
    },
}

/// Dimensions de la grille de caractères d'une session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSize {
    /// Colonnes.
    pub width: u16,
    /// Lignes.
    pub height: u16,
}

impl GridSize {
    /// Dérive la hauteur cible depuis la géométrie native.
    ///
    /// `height = round(native_h * (width / native_w) / aspect_ratio)`, jamais 0.
    /// Avec l'aspect par défaut (2.0) le facteur vaut 0.5 : une cellule de
    /// terminal est environ deux fois plus haute que large.
    ///
    /// # Example
    /// ```
    /// use va_core::frame::GridSize;
    /// let size = GridSize::for_source(1920, 1080, 100, 2.0);
    /// assert_eq!(size.height, 28);
    /// ```
    #[must_use]
    pub fn for_source(native_width: u32, native_height: u32, width: u16, aspect_ratio: f32) -> Self {
        let scale = f64::from(width) / f64::from(native_width.max(1));
        let factor = 1.0 / f64::from(aspect_ratio).max(f64::EPSILON);
        let height = (f64::from(native_height) * scale * factor).round();
        Self {
            width,
            height: height.clamp(1.0, f64::from(u16::MAX)) as u16,
        }
    }
}

/// Grille de sortie : `height` lignes de `width` cellules, row-major.
///
/// # Example
/// ```
/// use va_core::frame::{CharGrid, GlyphCell};
/// let mut grid = CharGrid::new(80, 24);
/// grid.set(0, 0, GlyphCell::Glyph { ch: '#', color: (255, 0, 0) });
/// assert_eq!(grid.rows().count(), 24);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharGrid {
    cells: Vec<GlyphCell>,
    width: u16,
    height: u16,
}

impl CharGrid {
    /// Crée une grille vide (toutes les cellules `Blank`).
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            cells: vec![GlyphCell::Blank; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Width in characters.
    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in characters.
    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Dimensions de la grille.
    #[must_use]
    pub fn size(&self) -> GridSize {
        GridSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Set a cell at position (x, y).
    #[inline(always)]
    pub fn set(&mut self, x: u16, y: u16, cell: GlyphCell) {
        self.cells[y as usize * self.width as usize + x as usize] = cell;
    }

    /// Get a cell at position (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> GlyphCell {
        self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Cellules de la ligne `y`.
    #[must_use]
    pub fn row(&self, y: u16) -> &[GlyphCell] {
        let start = y as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    /// Itère sur les lignes, de haut en bas.
    pub fn rows(&self) -> impl Iterator<Item = &[GlyphCell]> {
        (0..self.height).map(move |y| self.row(y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_size_follows_half_height_formula() {
        // 640×480 @ 100 colonnes : 480 * (100/640) * 0.5 = 37.5 → 38
        assert_eq!(GridSize::for_source(640, 480, 100, 2.0).height, 38);
        // 1280×720 @ 80 : 720 * 0.0625 * 0.5 = 22.5 → 23
        assert_eq!(GridSize::for_source(1280, 720, 80, 2.0).height, 23);
        assert_eq!(GridSize::for_source(100, 100, 100, 2.0).height, 50);
    }

    #[test]
    fn grid_size_never_zero() {
        let size = GridSize::for_source(10_000, 1, 10, 2.0);
        assert_eq!(size.height, 1);
        assert_eq!(size.width, 10);
    }

    #[test]
    fn raw_frame_sample_roundtrip_and_rows() {
        let mut frame = RawFrame::new(3, 2);
        frame.set_sample(2, 1, [9, 8, 7]);
        assert_eq!(frame.sample(2, 1), [9, 8, 7]);
        assert_eq!(frame.sample(0, 0), [0, 0, 0]);
        assert_eq!(frame.rows().count(), 2);
        assert!(frame.rows().all(|r| r.len() == 9));
    }

    #[test]
    fn grid_rows_have_width_cells() {
        let grid = CharGrid::new(7, 4);
        assert_eq!(grid.rows().count(), 4);
        assert!(grid.rows().all(|r| r.len() == 7));
        assert_eq!(grid.size(), GridSize { width: 7, height: 4 });
    }
}
