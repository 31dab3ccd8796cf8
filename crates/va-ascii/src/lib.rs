/// ASCII conversion engine for vidascii.
///
/// Resizes raw frames to the character grid and maps each sample to a
/// colored glyph.
pub mod glyph;
pub mod renderer;
pub mod resize;

pub use glyph::{frame_to_grid, luminance, to_glyph};
pub use renderer::FrameRenderer;
pub use resize::Resizer;
