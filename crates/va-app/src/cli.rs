use std::path::PathBuf;

use clap::Parser;
use va_core::config::PlaybackConfig;

/// Vidéo par défaut quand aucun chemin n'est donné.
pub const DEFAULT_VIDEO: &str = "cat.mp4";

/// vidascii: colored ASCII video playback in the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier vidéo à lire. L'audio compagnon est le même chemin en `.mp3`.
    #[arg(default_value = DEFAULT_VIDEO)]
    pub video: PathBuf,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Largeur de la grille en colonnes.
    #[arg(long)]
    pub width: Option<u16>,

    /// Pause entre deux frames, en millisecondes.
    #[arg(long)]
    pub frame_interval_ms: Option<f64>,

    /// Ne pas lancer l'audio compagnon.
    #[arg(long, default_value_t = false)]
    pub no_audio: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Chemin de l'audio compagnon : même nom de base, extension `mp3`.
    #[must_use]
    pub fn audio_path(&self) -> PathBuf {
        self.video.with_extension("mp3")
    }

    /// Applique les overrides CLI sur la config chargée.
    pub fn apply_overrides(&self, config: &mut PlaybackConfig) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(ms) = self.frame_interval_ms {
            config.frame_interval_ms = ms;
        }
        if self.no_audio {
            config.audio_enabled = false;
        }
        config.clamp_all();
    }
}
