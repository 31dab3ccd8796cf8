use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use clap::Parser;
use va_core::config::PlaybackConfig;
use va_render::terminal::{self, TerminalGuard};

pub mod cli;
pub mod playback;

use playback::{PlaybackOutcome, PlaybackSession};

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config, puis les overrides CLI
    let mut config = resolve_config(&cli)?;
    cli.apply_overrides(&mut config);

    // 4. Ouvrir la vidéo (avant de toucher au terminal)
    let (source, size) = playback::open_video(&cli.video, &config)?;

    // 5. Audio compagnon, détaché : aucune erreur ne remonte ici
    if config.audio_enabled {
        let audio = cli.audio_path();
        if let Err(e) = va_audio::spawn_detached(va_audio::CpalPlayer, audio.clone()) {
            log::warn!("Thread audio non démarré pour {} : {e}", audio.display());
        }
    } else {
        log::info!("Audio désactivé.");
    }

    // 6. Ctrl+C → annulation coopérative
    let cancel = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancel);
    ctrlc::set_handler(move || handler_flag.store(true, Ordering::Relaxed))
        .context("Impossible d'installer le gestionnaire Ctrl+C")?;

    // 7. Préparer le terminal
    terminal::warn_if_too_small(size);
    let mut guard = TerminalGuard::enter(io::stdout(), size, config.hide_cursor)
        .context("Initialisation du terminal impossible")?;

    // 8. Boucle principale
    let mut session = PlaybackSession::new(size, &config, io::stdout());
    let result = session.run(source, &cancel);

    // 9. Restaurer le terminal (TOUJOURS, même en cas d'erreur)
    guard.restore();

    let stats = session.stats();
    log::info!(
        "{} frames, {} lignes réécrites, {:.1} fps.",
        stats.frames(),
        stats.rows_rewritten(),
        stats.fps()
    );

    match result? {
        PlaybackOutcome::Exhausted => log::info!("Lecture terminée."),
        PlaybackOutcome::Cancelled => log::info!("Lecture interrompue par l'utilisateur."),
    }
    Ok(())
}

/// Config file if present, defaults otherwise.
fn resolve_config(cli: &cli::Cli) -> Result<PlaybackConfig> {
    if cli.config.exists() {
        va_core::config::load_config(&cli.config)
    } else {
        log::info!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(PlaybackConfig::default())
    }
}
