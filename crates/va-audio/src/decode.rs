use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::AudioError;

/// Piste décodée : échantillons mono f32 normalisés [-1, 1].
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Mono samples.
    pub samples: Vec<f32>,
    /// Sample rate of `samples`, in Hz.
    pub sample_rate: u32,
}

impl DecodedAudio {
    /// Durée de la piste en secondes.
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}

/// Decode an audio file into mono f32 samples at the file's native rate.
///
/// Supports WAV, MP3, FLAC, OGG, AAC via symphonia.
///
/// # Errors
/// `AudioError::Open` if the file cannot be opened, `AudioError::Decode` if
/// the format cannot be probed or no decoder is available.
///
/// # Example
/// ```no_run
/// use va_audio::decode::decode_file;
/// let audio = decode_file("cat.mp3").unwrap();
/// println!("{:.1}s", audio.duration_secs());
/// ```
pub fn decode_file(path: impl AsRef<Path>) -> Result<DecodedAudio, AudioError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| AudioError::Open {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let mss = MediaSourceStream::new(
        Box::new(file),
        symphonia::core::io::MediaSourceStreamOptions::default(),
    );

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AudioError::Decode(format!("format non reconnu : {e}")))?;

    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| AudioError::Decode("aucune piste audio".to_string()))?;

    let sample_rate = track.codec_params.sample_rate.unwrap_or(44100);
    let channels = track
        .codec_params
        .channels
        .map_or(1, symphonia::core::audio::Channels::count)
        .max(1);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AudioError::Decode(format!("décodeur indisponible : {e}")))?;

    let track_id = track.id;
    let mut all_samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut max_sample_frames: usize = 0;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                log::warn!("Audio decode packet error: {e}");
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(e) => {
                log::warn!("Audio decode frame error: {e}");
                continue;
            }
        };

        let spec = *decoded.spec();
        let num_frames = decoded.capacity();
        // Réalloue seulement si ce paquet dépasse la capacité courante
        if sample_buf.is_none() || num_frames > max_sample_frames {
            sample_buf = Some(SampleBuffer::<f32>::new(num_frames as u64, spec));
            max_sample_frames = num_frames;
        }
        let Some(buf) = sample_buf.as_mut() else {
            continue;
        };
        buf.copy_interleaved_ref(decoded);

        // Downmix mono
        for chunk in buf.samples().chunks(channels) {
            let mono: f32 = chunk.iter().sum::<f32>() / channels as f32;
            all_samples.push(mono);
        }
    }

    log::info!(
        "Decoded {} samples @ {}Hz from {}",
        all_samples.len(),
        sample_rate,
        path.display()
    );

    Ok(DecodedAudio {
        samples: all_samples,
        sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    /// WAV PCM 16 bits stéréo, `frames` trames (gauche = `left`, droite = 0).
    fn wav_bytes(sample_rate: u32, frames: u32, left: i16) -> Vec<u8> {
        let channels: u16 = 2;
        let data_len = frames * u32::from(channels) * 2;
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVEfmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&channels.to_le_bytes());
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&(sample_rate * u32::from(channels) * 2).to_le_bytes());
        out.extend_from_slice(&(channels * 2).to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        for _ in 0..frames {
            out.extend_from_slice(&left.to_le_bytes());
            out.extend_from_slice(&0i16.to_le_bytes());
        }
        out
    }

    #[test]
    fn decodes_stereo_wav_to_mono() {
        let mut file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        file.write_all(&wav_bytes(8000, 400, 16384)).unwrap();
        file.flush().unwrap();

        let audio = decode_file(file.path()).unwrap();
        assert_eq!(audio.sample_rate, 8000);
        assert_eq!(audio.samples.len(), 400);
        // (0.5 + 0.0) / 2
        assert!((audio.samples[0] - 0.25).abs() < 0.01);
        assert!((audio.duration_secs() - 0.05).abs() < 1e-9);
    }

    #[test]
    fn missing_file_is_open_error() {
        let err = decode_file("/nonexistent/cat.mp3").unwrap_err();
        assert!(matches!(err, AudioError::Open { .. }));
    }

    #[test]
    fn garbage_is_decode_error() {
        let mut file = tempfile::Builder::new().suffix(".mp3").tempfile().unwrap();
        file.write_all(&[0u8; 64]).unwrap();
        file.flush().unwrap();
        assert!(matches!(
            decode_file(file.path()).unwrap_err(),
            AudioError::Decode(_)
        ));
    }
}
