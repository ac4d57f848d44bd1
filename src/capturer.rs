use crate::{encode_png, Display, DisplayReader, DisplaySource, Error, PngOptions, Rect, Result};
use image::{imageops, Rgba, RgbaImage};

/// Color of the parts of the desktop no display covers,
/// and of displays that could not be read.
pub const BLANK: Rgba<u8> = Rgba([0, 0, 0, u8::MAX]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOptions {
  /// Displays beyond this count are ignored.
  /// By default it is 32.
  pub max_displays: usize,
  pub png: PngOptions,
}

impl Default for CaptureOptions {
  fn default() -> Self {
    Self {
      max_displays: 32,
      png: PngOptions::default(),
    }
  }
}

/// The composited image of the whole virtual desktop.
#[derive(Debug, Clone)]
pub struct Screenshot {
  /// Virtual desktop bounds. Pixel (0, 0) of [`Self::image`] is the top-left
  /// corner of this rectangle.
  pub bounds: Rect,
  pub image: RgbaImage,
  /// The displays that were read successfully.
  pub captured: Vec<Display>,
  /// The displays left blank because they could not be read.
  pub skipped: Vec<Display>,
}

impl Screenshot {
  #[inline]
  pub fn width(&self) -> u32 {
    self.image.width()
  }

  #[inline]
  pub fn height(&self) -> u32 {
    self.image.height()
  }

  /// Encode the image as PNG.
  #[inline]
  pub fn to_png(&self, options: &PngOptions) -> Result<Vec<u8>> {
    encode_png(&self.image, options)
  }
}

/// Capture every display of `source` into one image.
///
/// A display that fails to be read is logged and left [`BLANK`]; the capture
/// only fails if there is nothing to capture or the image can't be allocated.
pub fn capture_desktop_with<S>(source: &S, options: &CaptureOptions) -> Result<Screenshot>
where
  S: DisplaySource + ?Sized,
{
  let mut displays = source.displays()?;
  if displays.len() > options.max_displays {
    log::warn!(
      "found {} displays, only the first {} will be captured",
      displays.len(),
      options.max_displays
    );
    displays.truncate(options.max_displays);
  }

  let bounds = Rect::bounding(displays.iter().map(|d| d.rect)).ok_or(Error::NoDisplay)?;
  let (width, height) = bounds.size().ok_or(Error::NoDisplay)?;
  log::debug!(
    "capturing {} display(s), bounds {:?}, {}x{}",
    displays.len(),
    bounds,
    width,
    height
  );

  let mut image = allocate(width, height)?;
  let mut captured = Vec::with_capacity(displays.len());
  let mut skipped = Vec::new();

  let mut reader = source.open()?;
  for display in displays {
    match read_display(&mut reader, &display) {
      Ok(frame) => {
        let (x, y) = display.rect.offset_from(&bounds);
        imageops::replace(&mut image, &frame, x, y);
        captured.push(display);
      }
      Err(e) => {
        log::warn!("display {} {:?} left blank: {}", display.name, display.rect, e);
        skipped.push(display);
      }
    }
  }
  drop(reader);

  Ok(Screenshot {
    bounds,
    image,
    captured,
    skipped,
  })
}

fn read_display<R: DisplayReader>(reader: &mut R, display: &Display) -> Result<RgbaImage> {
  let frame = reader.read(display)?;
  // a frame of another size would be clipped or leave stale pixels around it
  match display.rect.size() {
    Some(size) if size == frame.dimensions() => Ok(frame),
    expected => Err(Error::FrameSize {
      expected,
      actual: frame.dimensions(),
    }),
  }
}

/// Allocate a [`BLANK`] image, reporting failure instead of aborting.
fn allocate(width: u32, height: u32) -> Result<RgbaImage> {
  let err = || Error::Allocation { width, height };
  let len = (width as usize)
    .checked_mul(height as usize)
    .and_then(|n| n.checked_mul(4))
    .ok_or_else(err)?;

  let mut pixels = Vec::new();
  pixels.try_reserve_exact(len).map_err(|_| err())?;
  pixels.resize(len, 0);
  for px in pixels.chunks_exact_mut(4) {
    px.copy_from_slice(&BLANK.0);
  }

  RgbaImage::from_raw(width, height, pixels).ok_or_else(err)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{Compression, ErrorKind};
  use image::ImageFormat;
  use std::{
    cell::Cell,
    ops::Range,
    sync::atomic::{AtomicUsize, Ordering},
    thread,
  };

  const LEFT: Rgba<u8> = Rgba([200, 10, 10, 255]);
  const RIGHT: Rgba<u8> = Rgba([10, 200, 10, 255]);
  const TOP: Rgba<u8> = Rgba([10, 10, 200, 255]);

  fn display(name: &str, rect: Rect) -> Display {
    Display {
      rect,
      name: name.to_string(),
      primary: rect.left == 0 && rect.top == 0,
    }
  }

  /// Serves solid-colored displays. A display without a color fails to be read.
  struct Synthetic {
    displays: Vec<(Display, Option<Rgba<u8>>)>,
    open_fails: bool,
    opened: Cell<usize>,
  }

  impl Synthetic {
    fn new(displays: Vec<(Display, Option<Rgba<u8>>)>) -> Self {
      Self {
        displays,
        open_fails: false,
        opened: Cell::new(0),
      }
    }
  }

  struct SyntheticReader {
    displays: Vec<(Display, Option<Rgba<u8>>)>,
  }

  impl DisplaySource for Synthetic {
    type Reader = SyntheticReader;

    fn displays(&self) -> Result<Vec<Display>> {
      Ok(self.displays.iter().map(|(d, _)| d.clone()).collect())
    }

    fn open(&self) -> Result<Self::Reader> {
      if self.open_fails {
        return Err(Error::Allocation {
          width: 0,
          height: 0,
        });
      }
      self.opened.set(self.opened.get() + 1);
      Ok(SyntheticReader {
        displays: self.displays.clone(),
      })
    }
  }

  impl DisplayReader for SyntheticReader {
    fn read(&mut self, display: &Display) -> Result<RgbaImage> {
      let (_, color) = self
        .displays
        .iter()
        .find(|(d, _)| d == display)
        .ok_or(Error::NoDisplay)?;
      let color = color.ok_or(Error::NoDisplay)?;
      let (width, height) = display.rect.size().ok_or(Error::NoDisplay)?;
      Ok(RgbaImage::from_pixel(width, height, color))
    }
  }

  fn assert_region(image: &RgbaImage, x: Range<u32>, y: Range<u32>, color: Rgba<u8>) {
    for py in y.clone() {
      for px in x.clone() {
        assert_eq!(*image.get_pixel(px, py), color, "pixel ({px}, {py})");
      }
    }
  }

  #[test]
  fn two_monitors_with_negative_origin() {
    let source = Synthetic::new(vec![
      (display("primary", Rect::new(0, 0, 1920, 1080)), Some(RIGHT)),
      (display("left", Rect::new(-1280, 0, 0, 1024)), Some(LEFT)),
    ]);

    let shot = capture_desktop_with(&source, &CaptureOptions::default()).unwrap();
    assert_eq!(shot.bounds, Rect::new(-1280, 0, 1920, 1080));
    assert_eq!(shot.image.dimensions(), (3200, 1080));
    assert_eq!(shot.captured.len(), 2);
    assert!(shot.skipped.is_empty());

    assert_region(&shot.image, 0..1280, 0..1024, LEFT);
    // the left monitor is shorter, nothing covers the strip below it
    assert_region(&shot.image, 0..1280, 1024..1080, BLANK);
    assert_region(&shot.image, 1280..3200, 0..1080, RIGHT);
  }

  #[test]
  fn monitor_above_and_left() {
    let source = Synthetic::new(vec![
      (display("primary", Rect::new(0, 0, 100, 80)), Some(RIGHT)),
      (display("top", Rect::new(-50, -60, 50, 0)), Some(TOP)),
    ]);

    let shot = capture_desktop_with(&source, &CaptureOptions::default()).unwrap();
    assert_eq!(shot.bounds, Rect::new(-50, -60, 100, 80));
    assert_eq!(shot.image.dimensions(), (150, 140));

    assert_region(&shot.image, 0..100, 0..60, TOP);
    assert_region(&shot.image, 100..150, 0..60, BLANK);
    assert_region(&shot.image, 0..50, 60..140, BLANK);
    assert_region(&shot.image, 50..150, 60..140, RIGHT);
  }

  #[test]
  fn unreadable_display_is_blank() {
    let source = Synthetic::new(vec![
      (display("primary", Rect::new(0, 0, 40, 30)), Some(RIGHT)),
      (display("broken", Rect::new(-20, 0, 0, 30)), None),
    ]);

    let shot = capture_desktop_with(&source, &CaptureOptions::default()).unwrap();
    assert_eq!(shot.image.dimensions(), (60, 30));
    assert_eq!(shot.captured.len(), 1);
    assert_eq!(shot.skipped[0].name, "broken");
    assert_region(&shot.image, 0..20, 0..30, BLANK);
    assert_region(&shot.image, 20..60, 0..30, RIGHT);
  }

  #[test]
  fn mismatched_frame_is_blank() {
    struct Shrinking;
    impl DisplaySource for Shrinking {
      type Reader = Shrinking;
      fn displays(&self) -> Result<Vec<Display>> {
        Ok(vec![display("primary", Rect::new(0, 0, 10, 10))])
      }
      fn open(&self) -> Result<Self::Reader> {
        Ok(Shrinking)
      }
    }
    impl DisplayReader for Shrinking {
      fn read(&mut self, _: &Display) -> Result<RgbaImage> {
        Ok(RgbaImage::from_pixel(5, 5, LEFT))
      }
    }

    let shot = capture_desktop_with(&Shrinking, &CaptureOptions::default()).unwrap();
    assert_eq!(shot.skipped.len(), 1);
    assert_region(&shot.image, 0..10, 0..10, BLANK);
  }

  #[test]
  fn no_display() {
    let source = Synthetic::new(vec![]);
    let err = capture_desktop_with(&source, &CaptureOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoDisplay);
    // nothing is acquired when there is nothing to capture
    assert_eq!(source.opened.get(), 0);
  }

  #[test]
  fn zero_area() {
    let source = Synthetic::new(vec![(
      display("flat", Rect::new(0, 0, 1920, 0)),
      Some(RIGHT),
    )]);
    let err = capture_desktop_with(&source, &CaptureOptions::default()).unwrap_err();
    assert!(matches!(err, Error::NoDisplay));
  }

  #[test]
  fn open_failure() {
    let mut source = Synthetic::new(vec![(
      display("primary", Rect::new(0, 0, 10, 10)),
      Some(RIGHT),
    )]);
    source.open_fails = true;
    let err = capture_desktop_with(&source, &CaptureOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Allocation);
  }

  #[test]
  fn max_displays() {
    let source = Synthetic::new(vec![
      (display("primary", Rect::new(0, 0, 10, 10)), Some(RIGHT)),
      (display("second", Rect::new(10, 0, 20, 10)), Some(LEFT)),
      (display("third", Rect::new(20, 0, 30, 10)), Some(TOP)),
    ]);
    let options = CaptureOptions {
      max_displays: 2,
      ..Default::default()
    };

    let shot = capture_desktop_with(&source, &options).unwrap();
    assert_eq!(shot.bounds, Rect::new(0, 0, 20, 10));
    assert_eq!(shot.captured.len(), 2);
  }

  #[test]
  fn one_reader_per_capture() {
    let source = Synthetic::new(vec![(
      display("primary", Rect::new(0, 0, 8, 8)),
      Some(TOP),
    )]);
    for _ in 0..100 {
      capture_desktop_with(&source, &CaptureOptions::default()).unwrap();
    }
    assert_eq!(source.opened.get(), 100);
  }

  #[test]
  fn shared_source_across_threads() {
    struct Shared {
      displays: Vec<Display>,
      opened: AtomicUsize,
    }
    impl DisplaySource for Shared {
      type Reader = SyntheticReader;
      fn displays(&self) -> Result<Vec<Display>> {
        Ok(self.displays.clone())
      }
      fn open(&self) -> Result<Self::Reader> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(SyntheticReader {
          displays: vec![
            (self.displays[0].clone(), Some(RIGHT)),
            (self.displays[1].clone(), Some(LEFT)),
          ],
        })
      }
    }

    let source = Shared {
      displays: vec![
        display("primary", Rect::new(0, 0, 64, 48)),
        display("left", Rect::new(-32, 0, 0, 40)),
      ],
      opened: AtomicUsize::new(0),
    };

    thread::scope(|s| {
      for _ in 0..4 {
        s.spawn(|| {
          for _ in 0..10 {
            let shot = capture_desktop_with(&source, &CaptureOptions::default()).unwrap();
            assert_eq!(shot.bounds, Rect::new(-32, 0, 64, 48));
            assert_eq!(shot.captured.len(), 2);
            assert_region(&shot.image, 0..32, 0..40, LEFT);
            assert_region(&shot.image, 0..32, 40..48, BLANK);
            assert_region(&shot.image, 32..96, 0..48, RIGHT);
          }
        });
      }
    });
    assert_eq!(source.opened.load(Ordering::SeqCst), 40);
  }

  #[test]
  fn png_round_trip() {
    let source = Synthetic::new(vec![
      (display("primary", Rect::new(0, 0, 192, 108)), Some(RIGHT)),
      (display("left", Rect::new(-128, 0, 0, 102)), Some(LEFT)),
    ]);
    let shot = capture_desktop_with(&source, &CaptureOptions::default()).unwrap();

    let png = shot
      .to_png(&PngOptions {
        compression: Compression::Fast,
      })
      .unwrap();
    let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png)
      .unwrap()
      .to_rgba8();
    assert_eq!(decoded.dimensions(), (320, 108));
    assert_eq!(decoded.as_raw(), shot.image.as_raw());
  }

  #[test]
  fn allocate_blank() {
    let image = allocate(3, 2).unwrap();
    assert!(image.pixels().all(|px| *px == BLANK));
  }
}
