use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use va_ascii::FrameRenderer;
use va_core::config::PlaybackConfig;
use va_core::frame::{CharGrid, GridSize, RawFrame};
use va_core::traits::{CloseOnDrop, FrameSource};
use va_render::TerminalPresenter;
use va_render::fps::PlaybackStats;
use va_source::VideoSource;

/// Issue normale d'une lecture. Les échecs passent par `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// La source est épuisée.
    Exhausted,
    /// Interruption utilisateur : sortie normale.
    Cancelled,
}

/// États de la boucle de lecture entre deux vérifications d'annulation.
enum State {
    Reading,
    Rendering(RawFrame),
    Presenting(CharGrid),
}

/// Ouvre la vidéo et dérive la géométrie de la session.
///
/// # Errors
/// Open failures (`CoreError::Open` / `CoreError::InvalidDimensions`),
/// with the path as context.
pub fn open_video(path: &Path, config: &PlaybackConfig) -> Result<(VideoSource, GridSize)> {
    let source = VideoSource::open(path)
        .with_context(|| format!("Impossible de lire la vidéo {}", path.display()))?;
    let (w, h) = source.native_size();
    let size = GridSize::for_source(w, h, config.width, config.aspect_ratio);
    log::info!(
        "Session : {w}x{h} → grille {}x{}, pacing {:?}",
        size.width,
        size.height,
        config.frame_interval()
    );
    Ok((source, size))
}

/// Session de lecture : renderer, présentateur, pacing et statistiques.
///
/// La géométrie est fixée à la construction pour toute la session.
pub struct PlaybackSession<W: Write> {
    renderer: FrameRenderer,
    presenter: TerminalPresenter<W>,
    frame_interval: Duration,
    stats: PlaybackStats,
}

impl<W: Write> PlaybackSession<W> {
    /// Prépare une session pour une grille `size`, sortie vers `out`.
    pub fn new(size: GridSize, config: &PlaybackConfig, out: W) -> Self {
        Self {
            renderer: FrameRenderer::new(size, config.resample),
            presenter: TerminalPresenter::new(out),
            frame_interval: config.frame_interval(),
            stats: PlaybackStats::new(),
        }
    }

    /// Géométrie de la grille.
    #[cfg(test)]
    #[must_use]
    pub fn size(&self) -> GridSize {
        self.renderer.size()
    }

    /// Statistiques cumulées.
    #[must_use]
    pub fn stats(&self) -> &PlaybackStats {
        &self.stats
    }

    /// Récupère le writer de sortie.
    #[cfg(test)]
    pub fn into_writer(self) -> W {
        self.presenter.into_inner()
    }

    /// Boucle principale : Reading → Rendering → Presenting → Reading…
    ///
    /// `cancel` est vérifié à chaque transition. La source est fermée une
    /// seule fois, quel que soit le chemin de sortie.
    ///
    /// # Errors
    /// Decode failures, resize failures, and terminal write errors. The
    /// source is closed before the error is returned.
    pub fn run<S: FrameSource>(&mut self, source: S, cancel: &AtomicBool) -> Result<PlaybackOutcome> {
        let mut source = CloseOnDrop::new(source);
        let mut state = State::Reading;

        loop {
            if cancel.load(Ordering::Relaxed) {
                log::info!("Lecture interrompue après {} frames.", self.stats.frames());
                return Ok(PlaybackOutcome::Cancelled);
            }

            state = match state {
                State::Reading => match source.next_frame() {
                    Ok(Some(raw)) => State::Rendering(raw),
                    Ok(None) => {
                        log::info!("Source épuisée après {} frames.", self.stats.frames());
                        return Ok(PlaybackOutcome::Exhausted);
                    }
                    // Une interruption pendant la lecture l'emporte sur l'erreur de décodage.
                    Err(e) if cancel.load(Ordering::Relaxed) => {
                        log::debug!("Erreur de décodage ignorée après interruption : {e}");
                        log::info!("Lecture interrompue après {} frames.", self.stats.frames());
                        return Ok(PlaybackOutcome::Cancelled);
                    }
                    Err(e) => return Err(e.into()),
                },
                State::Rendering(raw) => State::Presenting(
                    self.renderer
                        .render(&raw)
                        .context("Échec du rendu de la frame")?,
                ),
                State::Presenting(grid) => {
                    let first = self.stats.frames() == 0;
                    let rows = self
                        .presenter
                        .present(&grid, first)
                        .context("Écriture terminal impossible")?;
                    self.stats.record(rows);
                    if !self.frame_interval.is_zero() {
                        thread::sleep(self.frame_interval);
                    }
                    State::Reading
                }
            };
        }
    }
}
