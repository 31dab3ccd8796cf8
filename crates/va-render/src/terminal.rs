use std::io::{self, Write};

use crossterm::{cursor, execute, terminal};
use va_core::frame::GridSize;

use crate::ansi::RESET;

/// Restaure l'état du terminal (couleurs, curseur) quel que soit le chemin de sortie.
///
/// À la restauration : reset des attributs, curseur sous la grille, curseur visible.
///
/// # Example
/// ```
/// use va_core::frame::GridSize;
/// use va_render::terminal::TerminalGuard;
///
/// let size = GridSize { width: 10, height: 4 };
/// let mut guard = TerminalGuard::enter(Vec::new(), size, true).unwrap();
/// guard.restore();
/// ```
pub struct TerminalGuard<W: Write> {
    out: W,
    rows: u16,
    cursor_hidden: bool,
    restored: bool,
}

impl<W: Write> TerminalGuard<W> {
    /// Prépare le terminal pour une grille `size`.
    ///
    /// # Errors
    /// Propagates write errors from the underlying writer.
    pub fn enter(mut out: W, size: GridSize, hide_cursor: bool) -> io::Result<Self> {
        if hide_cursor {
            execute!(out, cursor::Hide)?;
        }
        Ok(Self {
            out,
            rows: size.height,
            cursor_hidden: hide_cursor,
            restored: false,
        })
    }

    /// Restaure le terminal. Idempotent.
    pub fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        let _ = self.out.write_all(RESET.as_bytes());
        let _ = execute!(self.out, cursor::MoveTo(0, self.rows));
        if self.cursor_hidden {
            let _ = execute!(self.out, cursor::Show);
        }
        let _ = self.out.write_all(b"\n");
        let _ = self.out.flush();
    }

    /// Writer sous-jacent.
    pub fn writer(&self) -> &W {
        &self.out
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        self.restore();
    }
}

/// Avertit si le terminal est plus petit que la grille (pas de reflow pendant la lecture).
pub fn warn_if_too_small(size: GridSize) {
    match terminal::size() {
        Ok((cols, rows)) if cols < size.width || rows < size.height => {
            log::warn!(
                "Terminal {cols}x{rows} plus petit que la grille {}x{} : affichage tronqué.",
                size.width,
                size.height
            );
        }
        Ok(_) => {}
        Err(e) => log::debug!("Taille du terminal inconnue : {e}"),
    }
}
