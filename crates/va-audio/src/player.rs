use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::decode;
use crate::error::AudioError;

/// Marge ajoutée à la durée de la piste avant d'abandonner l'attente de fin.
const COMPLETION_GRACE: Duration = Duration::from_secs(5);

/// Lecteur audio bloquant : `play` rend la main quand la piste est terminée.
///
/// # Example
/// ```
/// use std::path::Path;
/// use va_audio::{AudioError, AudioPlayer};
///
/// struct Silent;
/// impl AudioPlayer for Silent {
///     fn play(&mut self, _path: &Path) -> Result<(), AudioError> { Ok(()) }
/// }
/// assert!(Silent.play(Path::new("cat.mp3")).is_ok());
/// ```
pub trait AudioPlayer: Send + 'static {
    /// Joue `path` jusqu'au bout.
    ///
    /// # Errors
    /// Toute erreur d'ouverture, de décodage ou de périphérique.
    fn play(&mut self, path: &Path) -> Result<(), AudioError>;
}

/// Lecture sur le périphérique de sortie par défaut via cpal.
///
/// Le fichier est décodé entièrement (symphonia), puis joué en stéréo
/// (mono dupliqué) une seule fois. Le démarrage du son est donc décalé de
/// la durée du décodage par rapport à la première frame vidéo.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpalPlayer;

impl AudioPlayer for CpalPlayer {
    fn play(&mut self, path: &Path) -> Result<(), AudioError> {
        // Décodage complet avant l'ouverture du stream : le son démarre après
        // ce délai, proportionnel à la longueur de la piste.
        let audio = decode::decode_file(path)?;
        if audio.samples.is_empty() {
            return Err(AudioError::Empty(path.display().to_string()));
        }
        let timeout = Duration::from_secs_f64(audio.duration_secs()) + COMPLETION_GRACE;
        let sample_rate = audio.sample_rate;

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        let config = cpal::StreamConfig {
            channels: 2,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let samples = Arc::new(audio.samples);
        let pos = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicBool::new(false));
        let (done_tx, done_rx) = flume::bounded::<()>(1);

        let cb_samples = Arc::clone(&samples);
        let cb_pos = Arc::clone(&pos);
        let cb_finished = Arc::clone(&finished);

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let total = cb_samples.len();
                    let mut p = cb_pos.load(Ordering::Relaxed);
                    for frame in data.chunks_mut(2) {
                        let sample = cb_samples.get(p).copied().unwrap_or(0.0);
                        frame.fill(sample);
                        p = (p + 1).min(total);
                    }
                    cb_pos.store(p, Ordering::Relaxed);
                    if p >= total && !cb_finished.swap(true, Ordering::Relaxed) {
                        let _ = done_tx.try_send(());
                    }
                },
                |err| {
                    log::error!("Audio output error: {err}");
                },
                None,
            )
            .map_err(|e| AudioError::Stream(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::Stream(e.to_string()))?;
        log::debug!("Audio playback started @ {sample_rate}Hz : {}", path.display());

        let result = done_rx.recv_timeout(timeout).map_err(|_| AudioError::Timeout);
        drop(stream);
        log::info!(
            "Audio terminé ({} / {} samples).",
            pos.load(Ordering::Relaxed),
            samples.len()
        );
        result
    }
}

/// Lance `player.play(path)` sur un thread détaché, sans attente ni retour.
///
/// Les erreurs de lecture sont journalisées et n'atteignent jamais l'appelant.
///
/// # Errors
/// Only if the OS refuses to spawn the thread.
pub fn spawn_detached<P: AudioPlayer>(mut player: P, path: PathBuf) -> std::io::Result<()> {
    thread::Builder::new()
        .name("va-audio".to_string())
        .spawn(move || {
            if let Err(e) = player.play(&path) {
                log::error!("Erreur de lecture audio : {e}");
            }
        })?;
    Ok(())
}
