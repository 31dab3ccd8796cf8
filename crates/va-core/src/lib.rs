/// Shared types, traits, and configuration for vidascii.
///
/// Frames, character grids, the glyph ramp, grid geometry and the error
/// taxonomy used across the workspace.

pub mod charset;
pub mod config;
pub mod error;
pub mod frame;
pub mod traits;

pub use charset::GlyphRamp;
pub use config::PlaybackConfig;
pub use error::CoreError;
pub use frame::{CharGrid, GlyphCell, GridSize, RawFrame};

/// Re-exports pour accès par chemin sémantique.
pub mod grid {
    pub use crate::frame::{CharGrid, GlyphCell, GridSize};
}
