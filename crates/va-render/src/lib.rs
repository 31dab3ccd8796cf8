/// Terminal output for vidascii.
///
/// ANSI encoding of grid rows, row-diff presentation, terminal state guard
/// and playback statistics.
pub mod ansi;
pub mod fps;
pub mod presenter;
pub mod terminal;

pub use presenter::TerminalPresenter;
