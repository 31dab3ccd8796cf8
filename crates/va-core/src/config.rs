use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Intervalle de pacing par défaut entre deux frames, en millisecondes.
pub const DEFAULT_FRAME_INTERVAL_MS: f64 = 10.9;

/// Largeur de grille par défaut, en colonnes.
pub const DEFAULT_WIDTH: u16 = 100;

/// Configuration d'une session de lecture.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use va_core::config::PlaybackConfig;
/// let config = PlaybackConfig::default();
/// assert_eq!(config.width, 100);
/// assert_eq!(config.frame_interval().as_micros(), 10_900);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct PlaybackConfig {
    /// Largeur cible de la grille en colonnes.
    pub width: u16,
    /// Pause fixe après chaque frame présentée (ms).
    pub frame_interval_ms: f64,
    /// Correction aspect ratio des cellules terminal (2.0 = deux fois plus hautes que larges).
    pub aspect_ratio: f32,
    /// Politique de rééchantillonnage.
    pub resample: Resample,
    /// Cacher le curseur pendant la lecture.
    pub hide_cursor: bool,
    /// Lancer la lecture audio compagnon.
    pub audio_enabled: bool,
}

/// Resampling policy used when scaling a frame to the grid.
///
/// # Example
/// ```
/// use va_core::config::Resample;
/// assert_eq!(Resample::default(), Resample::Area);
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum Resample {
    /// Moyenne sur la surface couverte (convolution box).
    #[default]
    Area,
    /// Plus proche voisin.
    Nearest,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            aspect_ratio: 2.0,
            resample: Resample::Area,
            hide_cursor: true,
            audio_enabled: true,
        }
    }
}

impl PlaybackConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization and CLI overrides.
    pub fn clamp_all(&mut self) {
        self.width = self.width.clamp(1, 1000);
        if !self.frame_interval_ms.is_finite() {
            self.frame_interval_ms = DEFAULT_FRAME_INTERVAL_MS;
        }
        self.frame_interval_ms = self.frame_interval_ms.clamp(0.0, 1000.0);
        if !self.aspect_ratio.is_finite() {
            self.aspect_ratio = 2.0;
        }
        self.aspect_ratio = self.aspect_ratio.clamp(0.5, 4.0);
    }

    /// Intervalle de pacing sous forme de `Duration`.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_micros((self.frame_interval_ms.max(0.0) * 1000.0).round() as u64)
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    playback: Option<PlaybackSection>,
    audio: Option<AudioSection>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PlaybackSection {
    width: Option<u16>,
    frame_interval_ms: Option<f64>,
    aspect_ratio: Option<f32>,
    resample: Option<Resample>,
    hide_cursor: Option<bool>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AudioSection {
    enabled: Option<bool>,
}

/// Parse un document TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns `CoreError::Config` if the document is not valid TOML or has
/// unknown keys.
///
/// # Example
/// ```
/// use va_core::config::parse_config;
/// let config = parse_config("[playback]\nwidth = 60\n").unwrap();
/// assert_eq!(config.width, 60);
/// ```
pub fn parse_config(content: &str) -> Result<PlaybackConfig, CoreError> {
    let file: ConfigFile =
        toml::from_str(content).map_err(|e| CoreError::Config(e.to_string()))?;

    let mut config = PlaybackConfig::default();

    if let Some(p) = file.playback {
        if let Some(v) = p.width {
            config.width = v;
        }
        if let Some(v) = p.frame_interval_ms {
            config.frame_interval_ms = v;
        }
        if let Some(v) = p.aspect_ratio {
            config.aspect_ratio = v;
        }
        if let Some(v) = p.resample {
            config.resample = v;
        }
        if let Some(v) = p.hide_cursor {
            config.hide_cursor = v;
        }
    }

    if let Some(a) = file.audio
        && let Some(v) = a.enabled
    {
        config.audio_enabled = v;
    }

    config.clamp_all();
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use va_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<PlaybackConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;

    let config = parse_config(&content)
        .with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))?;

    log::debug!("Config chargée depuis {} : {config:?}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, PlaybackConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = parse_config("[playback]\nresample = \"Nearest\"\n[audio]\nenabled = false\n")
            .unwrap();
        assert_eq!(config.resample, Resample::Nearest);
        assert!(!config.audio_enabled);
        assert_eq!(config.width, DEFAULT_WIDTH);
        assert!((config.frame_interval_ms - DEFAULT_FRAME_INTERVAL_MS).abs() < f64::EPSILON);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config =
            parse_config("[playback]\nwidth = 0\nframe_interval_ms = -4.0\naspect_ratio = 9.0\n")
                .unwrap();
        assert_eq!(config.width, 1);
        assert!(config.frame_interval_ms.abs() < f64::EPSILON);
        assert!((config.aspect_ratio - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn unknown_key_is_a_config_error() {
        let err = parse_config("[playback]\nspeed = 2\n").unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn load_config_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[playback]\nwidth = 42\nframe_interval_ms = 20.0").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.width, 42);
        assert_eq!(config.frame_interval().as_millis(), 20);
    }

    #[test]
    fn shipped_default_matches_builtin_defaults() {
        let config = parse_config(include_str!("../../../config/default.toml")).unwrap();
        assert_eq!(config, PlaybackConfig::default());
    }

    #[test]
    fn load_config_missing_file_errors() {
        assert!(load_config(Path::new("/nonexistent/vidascii.toml")).is_err());
    }
}
