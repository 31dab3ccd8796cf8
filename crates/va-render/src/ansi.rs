//! ANSI escape sequences used by the presenter.

use std::fmt::Write;

use va_core::frame::GlyphCell;

/// Reset de tous les attributs.
pub const RESET: &str = "\x1b[0m";

/// Ajoute `ESC[{row};0H` : curseur en colonne 0 de la ligne `row` (1-indexée).
///
/// # Example
/// ```
/// let mut out = String::new();
/// va_render::ansi::push_move_to_row(&mut out, 3);
/// assert_eq!(out, "\x1b[3;0H");
/// ```
pub fn push_move_to_row(out: &mut String, row: usize) {
    let _ = write!(out, "\x1b[{row};0H");
}

/// Ajoute une cellule : espace littéral, ou couleur 24 bits + glyphe + reset.
///
/// # Example
/// ```
/// use va_core::frame::GlyphCell;
/// let mut out = String::new();
/// va_render::ansi::push_cell(&mut out, GlyphCell::Glyph { ch: '#', color: (1, 2, 3) });
/// assert_eq!(out, "\x1b[38;2;1;2;3m#\x1b[0m");
/// ```
pub fn push_cell(out: &mut String, cell: GlyphCell) {
    match cell {
        GlyphCell::Blank => out.push(' '),
        GlyphCell::Glyph {
            ch,
            color: (r, g, b),
        } => {
            let _ = write!(out, "\x1b[38;2;{r};{g};{b}m{ch}{RESET}");
        }
    }
}

/// Forme texte complète d'une ligne de cellules.
#[must_use]
pub fn render_row(cells: &[GlyphCell]) -> String {
    let mut out = String::with_capacity(cells.len() * 20);
    for &cell in cells {
        push_cell(&mut out, cell);
    }
    out
}
