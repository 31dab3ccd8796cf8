// Companion audio playback for vidascii: decode with symphonia, play with cpal.

pub mod decode;
pub mod error;
pub mod player;

pub use error::AudioError;
pub use player::{AudioPlayer, CpalPlayer, spawn_detached};
