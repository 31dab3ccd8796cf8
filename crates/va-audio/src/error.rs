use thiserror::Error;

/// Errors originating from the audio module.
///
/// Toujours récupérées localement par la tâche audio : elles n'atteignent
/// jamais la boucle vidéo.
#[derive(Error, Debug)]
pub enum AudioError {
    /// The audio file could not be opened.
    #[error("Impossible d'ouvrir le fichier audio {path} : {reason}")]
    Open {
        /// Requested path.
        path: String,
        /// Human-readable cause.
        reason: String,
    },

    /// No audio output device found.
    #[error("Aucun périphérique audio de sortie trouvé")]
    NoOutputDevice,

    /// Audio decode error.
    #[error("Erreur de décodage : {0}")]
    Decode(String),

    /// The file decoded to zero samples.
    #[error("Fichier audio vide : {0}")]
    Empty(String),

    /// Audio stream error.
    #[error("Erreur de stream audio : {0}")]
    Stream(String),

    /// Playback did not report completion in time.
    #[error("La lecture audio n'a pas signalé sa fin")]
    Timeout,
}
