/// Video frame sources for vidascii.
///
/// Le décodage est délégué à `ffmpeg` / `ffprobe` (subprocess) ; ce crate
/// expose le résultat derrière `va_core::traits::FrameSource`.

pub mod video;

pub use video::{VideoInfo, VideoSource};
