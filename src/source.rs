use crate::{Error, Rect, Result};
use image::RgbaImage;

/// One monitor as seen in virtual-desktop coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Display {
  pub rect: Rect,
  /// Device name, e.g. `\\.\DISPLAY1`.
  pub name: String,
  pub primary: bool,
}

impl Display {
  /// Size of the frame to read for this display.
  ///
  /// A display covering no area can't be read, which is reported as
  /// [`Error::FrameSize`] like any other unreadable frame.
  pub fn frame_size(&self) -> Result<(u32, u32)> {
    self.rect.size().ok_or(Error::FrameSize {
      expected: None,
      actual: (0, 0),
    })
  }
}

/// Provides the displays to capture and a way to read their pixels.
///
/// On Windows the live implementation is [`GdiDesktop`](crate::GdiDesktop).
pub trait DisplaySource {
  type Reader: DisplayReader;

  /// Enumerate the displays currently attached.
  fn displays(&self) -> Result<Vec<Display>>;

  /// Acquire the top-level context needed to read pixels.
  /// It is released when the reader is dropped.
  fn open(&self) -> Result<Self::Reader>;
}

pub trait DisplayReader {
  /// Read the pixels of one display.
  /// The returned image should have the size of `display.rect`.
  fn read(&mut self, display: &Display) -> Result<RgbaImage>;
}

/// Convert tightly packed BGRA32 pixels into an opaque RGBA image.
///
/// The alpha channel of screen pixels carries no meaning, so it is set to 255.
/// Return [`None`] if `pixels` does not hold `width * height` pixels.
pub fn rgba_from_bgra(width: u32, height: u32, mut pixels: Vec<u8>) -> Option<RgbaImage> {
  for px in pixels.chunks_exact_mut(4) {
    px.swap(0, 2);
    px[3] = u8::MAX;
  }
  RgbaImage::from_raw(width, height, pixels)
}
