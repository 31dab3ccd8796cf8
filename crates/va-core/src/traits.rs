use crate::error::CoreError;
use crate::frame::RawFrame;

/// Fournit des frames brutes, dans l'ordre, à la boucle de lecture.
///
/// Implémenté par : `VideoSource` (va-source), et des sources factices en test.
///
/// # Example
/// ```
/// use va_core::traits::FrameSource;
/// use va_core::{CoreError, RawFrame};
///
/// struct DummySource;
/// impl FrameSource for DummySource {
///     fn next_frame(&mut self) -> Result<Option<RawFrame>, CoreError> { Ok(None) }
///     fn native_size(&self) -> (u32, u32) { (4, 2) }
///     fn close(&mut self) {}
/// }
/// ```
pub trait FrameSource {
    /// Retourne la prochaine frame décodable.
    ///
    /// `Ok(None)` signale la fin du flux ; ce n'est pas une erreur.
    ///
    /// # Errors
    /// `CoreError::Decode` si le décodage échoue en cours de flux.
    fn next_frame(&mut self) -> Result<Option<RawFrame>, CoreError>;

    /// Dimensions natives de la source (avant resize).
    fn native_size(&self) -> (u32, u32);

    /// Libère les ressources du décodeur.
    fn close(&mut self);
}

/// Garde qui ferme la source quand elle sort de portée, quel que soit le chemin de sortie.
///
/// # Example
/// ```
/// use va_core::traits::{CloseOnDrop, FrameSource};
/// use va_core::{CoreError, RawFrame};
///
/// struct Counted(u32);
/// impl FrameSource for Counted {
///     fn next_frame(&mut self) -> Result<Option<RawFrame>, CoreError> { Ok(None) }
///     fn native_size(&self) -> (u32, u32) { (1, 1) }
///     fn close(&mut self) { self.0 += 1; }
/// }
///
/// let mut guard = CloseOnDrop::new(Counted(0));
/// assert!(guard.next_frame().unwrap().is_none());
/// ```
pub struct CloseOnDrop<S: FrameSource>(S);

impl<S: FrameSource> CloseOnDrop<S> {
    /// Prend possession de la source.
    pub fn new(source: S) -> Self {
        Self(source)
    }
}

impl<S: FrameSource> std::ops::Deref for CloseOnDrop<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.0
    }
}

impl<S: FrameSource> std::ops::DerefMut for CloseOnDrop<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.0
    }
}

impl<S: FrameSource> Drop for CloseOnDrop<S> {
    fn drop(&mut self) {
        self.0.close();
    }
}
