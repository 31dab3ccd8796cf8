use std::io::{self, Write};

use va_core::frame::CharGrid;

use crate::ansi;

/// Présentateur différentiel : ne réécrit que les lignes qui ont changé.
///
/// Les lignes sont comparées sous leur forme texte rendue : une seule cellule
/// différente suffit à réécrire toute la ligne.
///
/// # Example
/// ```
/// use va_core::frame::CharGrid;
/// use va_render::TerminalPresenter;
///
/// let mut presenter = TerminalPresenter::new(Vec::new());
/// let grid = CharGrid::new(4, 2);
/// assert_eq!(presenter.present(&grid, true).unwrap(), 2);
/// assert_eq!(presenter.present(&grid, false).unwrap(), 0);
/// ```
pub struct TerminalPresenter<W: Write> {
    out: W,
    /// Lignes rendues de la frame précédente (une seule génération retenue).
    previous: Vec<String>,
    /// Buffer de sortie réutilisé entre frames.
    scratch: String,
}

impl<W: Write> TerminalPresenter<W> {
    /// Create a presenter writing to `out`, with no previous frame.
    pub fn new(out: W) -> Self {
        Self {
            out,
            previous: Vec::new(),
            scratch: String::new(),
        }
    }

    /// Présente `grid` et retourne le nombre de lignes réécrites.
    ///
    /// Si `is_first_frame`, toutes les lignes sont écrites quel que soit
    /// l'état précédent. Chaque réécriture est `ESC[{row};0H` + contenu.
    /// La sortie est écrite en un bloc puis flushée.
    ///
    /// # Errors
    /// Propagates write/flush errors from the underlying writer.
    pub fn present(&mut self, grid: &CharGrid, is_first_frame: bool) -> io::Result<usize> {
        self.scratch.clear();
        let mut rewritten = 0usize;
        let mut rendered = Vec::with_capacity(grid.height() as usize);

        for (i, cells) in grid.rows().enumerate() {
            let row = ansi::render_row(cells);
            let changed = is_first_frame || self.previous.get(i) != Some(&row);
            if changed {
                ansi::push_move_to_row(&mut self.scratch, i + 1);
                self.scratch.push_str(&row);
                rewritten += 1;
            }
            rendered.push(row);
        }

        if rewritten > 0 {
            self.out.write_all(self.scratch.as_bytes())?;
            self.out.flush()?;
        }
        self.previous = rendered;
        Ok(rewritten)
    }

    /// Accès au writer sous-jacent.
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Récupère le writer sous-jacent.
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use va_core::frame::GlyphCell;

    fn glyph(ch: char) -> GlyphCell {
        GlyphCell::Glyph {
            ch,
            color: (10, 20, 30),
        }
    }

    fn output(presenter: &mut TerminalPresenter<Vec<u8>>) -> String {
        let bytes = std::mem::take(presenter.writer_mut());
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn first_frame_rewrites_every_row() {
        let mut presenter = TerminalPresenter::new(Vec::new());
        let grid = CharGrid::new(3, 4);
        assert_eq!(presenter.present(&grid, true).unwrap(), 4);
        let out = output(&mut presenter);
        for row in 1..=4 {
            assert!(out.contains(&format!("\x1b[{row};0H   ")));
        }
    }

    #[test]
    fn first_frame_flag_ignores_previous_state() {
        let mut presenter = TerminalPresenter::new(Vec::new());
        let grid = CharGrid::new(3, 4);
        presenter.present(&grid, true).unwrap();
        assert_eq!(presenter.present(&grid, true).unwrap(), 4);
    }

    #[test]
    fn identical_frame_emits_nothing() {
        let mut presenter = TerminalPresenter::new(Vec::new());
        let mut grid = CharGrid::new(5, 3);
        grid.set(1, 1, glyph('#'));
        presenter.present(&grid, true).unwrap();
        let _ = output(&mut presenter);

        assert_eq!(presenter.present(&grid.clone(), false).unwrap(), 0);
        assert!(output(&mut presenter).is_empty());
    }

    #[test]
    fn single_cell_change_rewrites_whole_row() {
        let mut presenter = TerminalPresenter::new(Vec::new());
        let grid = CharGrid::new(3, 3);
        presenter.present(&grid, true).unwrap();
        let _ = output(&mut presenter);

        let mut next = grid.clone();
        next.set(2, 1, glyph('+'));
        assert_eq!(presenter.present(&next, false).unwrap(), 1);
        assert_eq!(
            output(&mut presenter),
            "\x1b[2;0H  \x1b[38;2;10;20;30m+\x1b[0m"
        );
    }

    #[test]
    fn diff_is_against_last_presented_frame() {
        let mut presenter = TerminalPresenter::new(Vec::new());
        let a = CharGrid::new(2, 2);
        let mut b = a.clone();
        b.set(0, 0, glyph('_'));

        presenter.present(&a, true).unwrap();
        assert_eq!(presenter.present(&b, false).unwrap(), 1);
        assert_eq!(presenter.present(&b, false).unwrap(), 0);
        assert_eq!(presenter.present(&a, false).unwrap(), 1);
    }

    #[test]
    fn without_previous_every_row_differs() {
        let mut presenter = TerminalPresenter::new(Vec::new());
        assert_eq!(presenter.present(&CharGrid::new(2, 3), false).unwrap(), 3);
    }
}
