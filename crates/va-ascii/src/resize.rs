use anyhow::{Context, Result, bail};
use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer as FirResizer};
use va_core::config::Resample;
use va_core::frame::RawFrame;

/// Resizer réutilisable wrappant fast_image_resize, pixels 3 × u8.
///
/// Les canaux sont traités indépendamment : l'ordre natif est conservé.
///
/// # Example
/// ```
/// use va_ascii::resize::Resizer;
/// use va_core::config::Resample;
/// let r = Resizer::new(Resample::Area);
/// ```
pub struct Resizer {
    inner: FirResizer,
    options: ResizeOptions,
    /// Scratch image for source (owned buffer to avoid the mut borrow issue).
    src_buf: Vec<u8>,
}

impl Resizer {
    /// Create a resizer using the given resampling policy.
    #[must_use]
    pub fn new(resample: Resample) -> Self {
        let alg = match resample {
            Resample::Area => ResizeAlg::Convolution(FilterType::Box),
            Resample::Nearest => ResizeAlg::Nearest,
        };
        Self {
            inner: FirResizer::new(),
            options: ResizeOptions::new().resize_alg(alg),
            src_buf: Vec::new(),
        }
    }

    /// Resize `src` into `dst`. Dimensions of `dst` determine output size.
    ///
    /// # Errors
    /// Returns an error if a buffer does not match its declared dimensions
    /// or the resize operation fails.
    ///
    /// # Example
    /// ```
    /// use va_ascii::resize::Resizer;
    /// use va_core::config::Resample;
    /// use va_core::frame::RawFrame;
    /// let mut r = Resizer::new(Resample::Area);
    /// let src = RawFrame::new(100, 100);
    /// let mut dst = RawFrame::new(50, 25);
    /// r.resize_into(&src, &mut dst).unwrap();
    /// ```
    pub fn resize_into(&mut self, src: &RawFrame, dst: &mut RawFrame) -> Result<()> {
        check_len("source", src)?;
        check_len("destination", dst)?;

        if src.width == dst.width && src.height == dst.height {
            dst.data.copy_from_slice(&src.data);
            return Ok(());
        }

        // Copie forcée par l'API fast_image_resize (source en &mut)
        self.src_buf.clear();
        self.src_buf.extend_from_slice(&src.data);

        let src_image =
            Image::from_slice_u8(src.width, src.height, &mut self.src_buf, PixelType::U8x3)
                .context("Invalid source dimensions")?;

        let mut dst_image =
            Image::from_slice_u8(dst.width, dst.height, &mut dst.data, PixelType::U8x3)
                .context("Invalid destination dimensions")?;

        self.inner
            .resize(&src_image, &mut dst_image, Some(&self.options))
            .context("Resize failed")?;

        Ok(())
    }
}

fn check_len(role: &str, frame: &RawFrame) -> Result<()> {
    let expected = RawFrame::byte_len(frame.width, frame.height);
    if frame.data.len() != expected {
        bail!(
            "Buffer {role} incohérent : {} octets pour {}x{} (attendu {expected})",
            frame.data.len(),
            frame.width,
            frame.height
        );
    }
    Ok(())
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new(Resample::default())
    }
}

/// Convenience for one-shot usage. DO NOT use in hot path.
///
/// # Errors
/// Returns an error if the resize operation fails.
///
/// # Example
/// ```
/// use va_ascii::resize::resize_frame;
/// use va_core::config::Resample;
/// use va_core::frame::RawFrame;
/// let src = RawFrame::new(100, 100);
/// let dst = resize_frame(&src, 50, 25, Resample::Nearest).unwrap();
/// assert_eq!((dst.width, dst.height), (50, 25));
/// ```
pub fn resize_frame(src: &RawFrame, width: u32, height: u32, resample: Resample) -> Result<RawFrame> {
    let mut dst = RawFrame::new(width, height);
    Resizer::new(resample).resize_into(src, &mut dst)?;
    Ok(dst)
}
