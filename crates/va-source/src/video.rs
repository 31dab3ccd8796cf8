// Décodage vidéo via ffmpeg en subprocess (std::process::Command).
// Prérequis : `ffmpeg` et `ffprobe` accessibles dans PATH.
//
// Architecture :
//   - `probe_video`   : interroge ffprobe pour obtenir width/height/fps
//   - `spawn_decoder` : lance ffmpeg → flux raw BGR24 sur stdout, taille native
//   - `FramePipe`     : découpe un flux d'octets en `RawFrame`s
//   - `VideoSource`   : possède le processus, implémente `FrameSource`

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use va_core::error::CoreError;
use va_core::frame::RawFrame;
use va_core::traits::FrameSource;

/// Format pixel demandé à ffmpeg. B, G, R : l'ordre natif attendu par le renderer.
pub const PIXEL_FORMAT: &str = "bgr24";

/// Métadonnées extraites via ffprobe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    /// Images par seconde (ex: 23.976, 24.0, 30.0). Informatif : le pacing ne s'en sert pas.
    pub fps: f64,
}

/// Interprète la sortie `default=noprint_wrappers=1` de ffprobe.
///
/// Les champs absents ou illisibles valent 0 (dimensions) ou 0.0 (fps).
///
/// # Example
/// ```
/// use va_source::video::parse_probe_output;
/// let info = parse_probe_output("width=640\nheight=360\nr_frame_rate=30000/1001\n");
/// assert_eq!((info.width, info.height), (640, 360));
/// assert!((info.fps - 29.97).abs() < 0.01);
/// ```
#[must_use]
pub fn parse_probe_output(text: &str) -> VideoInfo {
    let mut width: u32 = 0;
    let mut height: u32 = 0;
    let mut fps: f64 = 0.0;

    for line in text.lines() {
        if let Some(val) = line.strip_prefix("width=") {
            width = val.trim().parse().unwrap_or(0);
        } else if let Some(val) = line.strip_prefix("height=") {
            height = val.trim().parse().unwrap_or(0);
        } else if let Some(val) = line.strip_prefix("r_frame_rate=") {
            // Format: "24/1" ou "30000/1001"
            let mut parts = val.trim().splitn(2, '/');
            let num: f64 = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0.0);
            let den: f64 = parts.next().and_then(|s| s.parse().ok()).unwrap_or(1.0);
            if den > 0.0 {
                fps = num / den;
            }
        }
    }

    VideoInfo { width, height, fps }
}

fn open_error(path: &Path, reason: impl Into<String>) -> CoreError {
    CoreError::Open {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

/// Interroge `ffprobe` pour obtenir les métadonnées du flux vidéo principal.
///
/// # Errors
/// `CoreError::Open` si le fichier est absent, si `ffprobe` est introuvable
/// ou si aucun flux vidéo n'est trouvé ; `CoreError::InvalidDimensions` si
/// la largeur ou la hauteur vaut 0.
pub fn probe_video(path: &Path) -> Result<VideoInfo, CoreError> {
    if !path.is_file() {
        return Err(open_error(path, "fichier introuvable"));
    }
    let path_str = path
        .to_str()
        .ok_or_else(|| open_error(path, "chemin non-UTF8"))?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,r_frame_rate",
            "-of",
            "default=noprint_wrappers=1",
            "-i",
            path_str,
        ])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .map_err(|e| open_error(path, format!("impossible de lancer ffprobe ({e})")))?;

    if !output.status.success() {
        return Err(open_error(
            path,
            format!("ffprobe a échoué ({})", output.status),
        ));
    }

    let text = String::from_utf8_lossy(&output.stdout);
    if text.trim().is_empty() {
        return Err(open_error(path, "aucun flux vidéo"));
    }

    let info = parse_probe_output(&text);
    if info.width == 0 || info.height == 0 {
        return Err(CoreError::InvalidDimensions {
            width: info.width,
            height: info.height,
        });
    }

    log::info!(
        "probe_video: {}x{} @ {:.3}fps ({})",
        info.width,
        info.height,
        info.fps,
        path.display()
    );

    Ok(info)
}

/// Lance un processus `ffmpeg` qui écrit des frames BGR24 brutes, taille native, sur stdout.
///
/// Chaque frame = `width × height × 3` bytes, sans padding.
/// `-an` supprime l'audio (joué séparément).
///
/// # Errors
/// `CoreError::Open` si le spawn échoue.
pub fn spawn_decoder(path: &Path) -> Result<Child, CoreError> {
    let path_str = path
        .to_str()
        .ok_or_else(|| open_error(path, "chemin non-UTF8"))?;

    let mut command = Command::new("ffmpeg");
    command
        .args([
            "-nostdin",
            "-i",
            path_str,
            "-map",
            "0:v:0",
            "-f",
            "rawvideo",
            "-pix_fmt",
            PIXEL_FORMAT,
            "-an",
            "-hide_banner",
            "-loglevel",
            "error",
            "pipe:1",
        ])
        .stdout(Stdio::piped())
        .stdin(Stdio::null())
        .stderr(Stdio::null());

    // Groupe de processus propre : Ctrl+C n'atteint pas ffmpeg, fermé par `close()`.
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    let child = command
        .spawn()
        .map_err(|e| open_error(path, format!("impossible de lancer ffmpeg ({e})")))?;

    log::debug!("ffmpeg spawné (pid {}) pour {}", child.id(), path.display());
    Ok(child)
}

/// Résultat d'une lecture de frame complète.
#[derive(Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Le buffer a été rempli.
    Full,
    /// EOF propre, aucun octet lu.
    Eof,
    /// EOF après `n` octets : frame tronquée.
    Truncated(usize),
}

/// Lit exactement `buf.len()` bytes depuis `reader`, en distinguant EOF propre et frame tronquée.
///
/// # Errors
/// Erreur I/O fatale (hors `Interrupted`).
///
/// # Example
/// ```
/// use va_source::video::{read_exact_or_eof, ReadOutcome};
/// let mut input: &[u8] = &[1, 2, 3];
/// let mut buf = [0u8; 2];
/// assert_eq!(read_exact_or_eof(&mut input, &mut buf).unwrap(), ReadOutcome::Full);
/// assert_eq!(read_exact_or_eof(&mut input, &mut buf).unwrap(), ReadOutcome::Truncated(1));
/// ```
pub fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<ReadOutcome> {
    let mut total = 0usize;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) if total == 0 => return Ok(ReadOutcome::Eof),
            Ok(0) => return Ok(ReadOutcome::Truncated(total)),
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(ReadOutcome::Full)
}

/// Découpe un flux d'octets bruts en frames de taille fixe.
///
/// # Example
/// ```
/// use va_source::video::FramePipe;
/// let bytes = vec![7u8; 2 * 2 * 3 * 2];
/// let mut pipe = FramePipe::new(&bytes[..], 2, 2);
/// assert!(pipe.read_frame().unwrap().is_some());
/// assert!(pipe.read_frame().unwrap().is_some());
/// assert!(pipe.read_frame().unwrap().is_none());
/// ```
pub struct FramePipe<R: Read> {
    reader: R,
    width: u32,
    height: u32,
    frames_read: u64,
}

impl<R: Read> FramePipe<R> {
    /// Wrap `reader`, which yields `width × height` BGR24 frames back to back.
    pub fn new(reader: R, width: u32, height: u32) -> Self {
        Self {
            reader,
            width,
            height,
            frames_read: 0,
        }
    }

    /// Nombre de frames complètes lues jusqu'ici.
    #[must_use]
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Lit la frame suivante. `Ok(None)` sur EOF propre.
    ///
    /// # Errors
    /// `CoreError::Decode` sur frame tronquée ou erreur I/O.
    pub fn read_frame(&mut self) -> Result<Option<RawFrame>, CoreError> {
        let mut frame = RawFrame::new(self.width, self.height);
        match read_exact_or_eof(&mut self.reader, &mut frame.data) {
            Ok(ReadOutcome::Full) => {
                self.frames_read += 1;
                Ok(Some(frame))
            }
            Ok(ReadOutcome::Eof) => Ok(None),
            Ok(ReadOutcome::Truncated(n)) => Err(CoreError::Decode {
                frame: self.frames_read,
                reason: format!("frame tronquée ({n}/{} octets)", frame.data.len()),
            }),
            Err(e) => Err(CoreError::Decode {
                frame: self.frames_read,
                reason: e.to_string(),
            }),
        }
    }
}

/// Source vidéo fichier : un processus ffmpeg et son pipe de frames.
///
/// Le processus est tué et récolté par `close()`, appelé aussi par `Drop`.
pub struct VideoSource {
    path: PathBuf,
    info: VideoInfo,
    child: Option<Child>,
    pipe: Option<FramePipe<ChildStdout>>,
}

impl VideoSource {
    /// Ouvre `path` : probe puis spawn du décodeur.
    ///
    /// # Errors
    /// `CoreError::Open` ou `CoreError::InvalidDimensions` (voir `CoreError::is_open`).
    ///
    /// # Example
    /// ```
    /// use va_source::VideoSource;
    /// let err = VideoSource::open("/nonexistent/clip.mp4").err().unwrap();
    /// assert!(err.is_open());
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let info = probe_video(path)?;
        let mut child = spawn_decoder(path)?;
        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(open_error(path, "stdout ffmpeg indisponible"));
        };
        Ok(Self {
            path: path.to_path_buf(),
            info,
            child: Some(child),
            pipe: Some(FramePipe::new(stdout, info.width, info.height)),
        })
    }

    /// Métadonnées du flux.
    #[must_use]
    pub fn info(&self) -> VideoInfo {
        self.info
    }

    /// Chemin du fichier source.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Vérifie le code de sortie de ffmpeg après EOF.
    fn finish(&mut self, frames: u64) -> Result<Option<RawFrame>, CoreError> {
        let Some(mut child) = self.child.take() else {
            return Ok(None);
        };
        match child.wait() {
            Ok(status) if status.success() => {
                log::info!("Fin du flux vidéo après {frames} frames.");
                Ok(None)
            }
            Ok(status) => Err(CoreError::Decode {
                frame: frames,
                reason: format!("ffmpeg s'est terminé avec {status}"),
            }),
            Err(e) => Err(CoreError::Decode {
                frame: frames,
                reason: e.to_string(),
            }),
        }
    }
}

impl FrameSource for VideoSource {
    fn next_frame(&mut self) -> Result<Option<RawFrame>, CoreError> {
        let Some(pipe) = self.pipe.as_mut() else {
            return Ok(None);
        };
        match pipe.read_frame() {
            Ok(Some(frame)) => Ok(Some(frame)),
            Ok(None) => {
                let frames = pipe.frames_read();
                self.pipe = None;
                self.finish(frames)
            }
            Err(e) => {
                // Erreur remontée une seule fois ; la source est ensuite épuisée.
                self.close();
                Err(e)
            }
        }
    }

    fn native_size(&self) -> (u32, u32) {
        (self.info.width, self.info.height)
    }

    fn close(&mut self) {
        self.pipe = None;
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
            log::debug!("Décodeur fermé : {}", self.path.display());
        }
    }
}

impl Drop for VideoSource {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_output_missing_fields_are_zero() {
        let info = parse_probe_output("r_frame_rate=25/1\n");
        assert_eq!((info.width, info.height), (0, 0));
        assert!((info.fps - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn probe_output_zero_denominator_ignored() {
        let info = parse_probe_output("width=4\nheight=2\nr_frame_rate=0/0\n");
        assert_eq!((info.width, info.height), (4, 2));
        assert!(info.fps.abs() < f64::EPSILON);
    }

    #[test]
    fn open_missing_file_is_open_error() {
        let err = VideoSource::open("/nonexistent/dir/clip.mp4")
            .err()
            .unwrap();
        assert!(matches!(err, CoreError::Open { .. }));
    }

    #[test]
    fn frame_pipe_preserves_channel_order() {
        let bytes = [10u8, 200, 50, 1, 2, 3];
        let mut pipe = FramePipe::new(&bytes[..], 2, 1);
        let frame = pipe.read_frame().unwrap().unwrap();
        assert_eq!(frame.sample(0, 0), [10, 200, 50]);
        assert_eq!(frame.sample(1, 0), [1, 2, 3]);
        assert_eq!(pipe.frames_read(), 1);
        assert!(pipe.read_frame().unwrap().is_none());
    }

    #[test]
    fn frame_pipe_truncated_frame_is_decode_error() {
        let bytes = [0u8; 3 * 4 + 5];
        let mut pipe = FramePipe::new(&bytes[..], 2, 2);
        assert!(pipe.read_frame().unwrap().is_some());
        let err = pipe.read_frame().unwrap_err();
        assert!(matches!(err, CoreError::Decode { frame: 1, .. }));
    }

    #[test]
    fn read_exact_handles_short_reads() {
        struct Trickle<'a>(&'a [u8]);
        impl Read for Trickle<'_> {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if self.0.is_empty() || buf.is_empty() {
                    return Ok(0);
                }
                buf[0] = self.0[0];
                self.0 = &self.0[1..];
                Ok(1)
            }
        }
        let mut reader = Trickle(&[1, 2, 3, 4]);
        let mut buf = [0u8; 4];
        assert_eq!(read_exact_or_eof(&mut reader, &mut buf).unwrap(), ReadOutcome::Full);
        assert_eq!(buf, [1, 2, 3, 4]);
        assert_eq!(read_exact_or_eof(&mut reader, &mut buf).unwrap(), ReadOutcome::Eof);
    }
}
