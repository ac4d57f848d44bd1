//! Live desktop capture through GDI.
//!
//! Every handle is owned by a guard, so each exit path releases what was
//! acquired so far. Per-display handles live inside [`GdiReader::read`] and
//! are gone before the next display is read.

use crate::{
  capture_desktop_with, rgba_from_bgra, CaptureOptions, Display, DisplayReader, DisplaySource,
  Error, Result, Scanner, Screenshot,
};
use image::RgbaImage;
use std::{
  ffi::c_void,
  sync::{Mutex, MutexGuard, PoisonError},
};
use windows::Win32::Graphics::Gdi::{
  BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDC, GetDIBits,
  ReleaseDC, SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, CAPTUREBLT, DIB_RGB_COLORS,
  HBITMAP, HDC, HGDIOBJ, ROP_CODE, SRCCOPY,
};

/// Serializes captures within the process.
static CAPTURE_LOCK: Mutex<()> = Mutex::new(());

/// The live Windows desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GdiDesktop {
  /// Also capture layered (e.g. translucent) windows.
  /// By default it is `true`.
  pub capture_layered: bool,
}

impl Default for GdiDesktop {
  fn default() -> Self {
    Self {
      capture_layered: true,
    }
  }
}

impl DisplaySource for GdiDesktop {
  type Reader = GdiReader;

  fn displays(&self) -> Result<Vec<Display>> {
    Ok(Scanner::new()?.collect())
  }

  /// Acquire the screen DC and the process-wide capture lock.
  ///
  /// The lock is held until the reader is dropped. Capturing again on the
  /// same thread while a reader is alive deadlocks.
  fn open(&self) -> Result<Self::Reader> {
    // the guard protects no data, a panic elsewhere can't leave it inconsistent
    let lock = CAPTURE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    Ok(GdiReader {
      screen: ScreenDc::new()?,
      rop: if self.capture_layered {
        ROP_CODE(SRCCOPY.0 | CAPTUREBLT.0)
      } else {
        SRCCOPY
      },
      _lock: lock,
    })
  }
}

/// Holds the screen DC for the duration of one capture.
///
/// Only one reader exists at a time in the process; other threads opening
/// one wait until it is dropped. Drop it before starting another capture
/// on the same thread.
pub struct GdiReader {
  screen: ScreenDc,
  rop: ROP_CODE,
  _lock: MutexGuard<'static, ()>,
}

impl DisplayReader for GdiReader {
  fn read(&mut self, display: &Display) -> Result<RgbaImage> {
    let (width, height) = display.frame_size()?;
    let err = || Error::Allocation { width, height };
    let w = i32::try_from(width).map_err(|_| err())?;
    let h = i32::try_from(height).map_err(|_| err())?;
    let screen = self.screen.handle();

    unsafe {
      let memory = MemoryDc::new(screen)?;
      let bitmap = Bitmap::new(screen, w, h)?;

      {
        let _selection = Selection::new(memory.handle(), bitmap.handle())?;
        BitBlt(
          memory.handle(),
          0,
          0,
          w,
          h,
          Some(screen),
          display.rect.left,
          display.rect.top,
          self.rop,
        )
        .map_err(Error::from_win_err(stringify!(BitBlt)))?;
      }

      // the bitmap must not be selected into a DC when calling GetDIBits
      let mut info = BITMAPINFO {
        bmiHeader: BITMAPINFOHEADER {
          biSize: size_of::<BITMAPINFOHEADER>() as u32,
          biWidth: w,
          biHeight: -h, // top-down
          biPlanes: 1,
          biBitCount: 32,
          biCompression: BI_RGB.0,
          ..Default::default()
        },
        ..Default::default()
      };
      let mut pixels = vec![0u8; width as usize * height as usize * 4]; // 4 for BGRA32
      let lines = GetDIBits(
        memory.handle(),
        bitmap.handle(),
        0,
        height,
        Some(pixels.as_mut_ptr() as *mut c_void),
        &mut info,
        DIB_RGB_COLORS,
      );
      if lines == 0 {
        return Err(Error::last_win_err(stringify!(GetDIBits)));
      }

      rgba_from_bgra(width, height, pixels).ok_or_else(err)
    }
  }
}

/// Capture all displays of the live desktop.
/// # Examples
/// ```no_run
/// let screenshot = desktop_screenshot::capture_desktop().unwrap();
/// println!("{}x{}", screenshot.width(), screenshot.height());
/// ```
pub fn capture_desktop() -> Result<Screenshot> {
  capture_desktop_with(&GdiDesktop::default(), &CaptureOptions::default())
}

/// Capture all displays of the live desktop and encode them as PNG.
pub fn screenshot_png() -> Result<Vec<u8>> {
  let options = CaptureOptions::default();
  capture_desktop_with(&GdiDesktop::default(), &options)?.to_png(&options.png)
}

struct ScreenDc(HDC);

impl ScreenDc {
  /// DC of the whole virtual screen.
  fn new() -> Result<Self> {
    let dc = unsafe { GetDC(None) };
    if dc.is_invalid() {
      Err(Error::last_win_err(stringify!(GetDC)))
    } else {
      Ok(Self(dc))
    }
  }

  #[inline]
  fn handle(&self) -> HDC {
    self.0
  }
}

impl Drop for ScreenDc {
  fn drop(&mut self) {
    unsafe { ReleaseDC(None, self.0) };
  }
}

struct MemoryDc(HDC);

impl MemoryDc {
  fn new(screen: HDC) -> Result<Self> {
    let dc = unsafe { CreateCompatibleDC(Some(screen)) };
    if dc.is_invalid() {
      Err(Error::last_win_err(stringify!(CreateCompatibleDC)))
    } else {
      Ok(Self(dc))
    }
  }

  #[inline]
  fn handle(&self) -> HDC {
    self.0
  }
}

impl Drop for MemoryDc {
  fn drop(&mut self) {
    let _ = unsafe { DeleteDC(self.0) };
  }
}

struct Bitmap(HBITMAP);

impl Bitmap {
  fn new(screen: HDC, width: i32, height: i32) -> Result<Self> {
    let bitmap = unsafe { CreateCompatibleBitmap(screen, width, height) };
    if bitmap.is_invalid() {
      Err(Error::last_win_err(stringify!(CreateCompatibleBitmap)))
    } else {
      Ok(Self(bitmap))
    }
  }

  #[inline]
  fn handle(&self) -> HBITMAP {
    self.0
  }
}

impl Drop for Bitmap {
  fn drop(&mut self) {
    let _ = unsafe { DeleteObject(self.0.into()) };
  }
}

/// Keeps a bitmap selected into a DC, restoring the previous object on drop.
struct Selection {
  dc: HDC,
  old: HGDIOBJ,
}

impl Selection {
  fn new(dc: HDC, bitmap: HBITMAP) -> Result<Self> {
    let old = unsafe { SelectObject(dc, bitmap.into()) };
    if old.is_invalid() {
      Err(Error::last_win_err(stringify!(SelectObject)))
    } else {
      Ok(Self { dc, old })
    }
  }
}

impl Drop for Selection {
  fn drop(&mut self) {
    unsafe { SelectObject(self.dc, self.old) };
  }
}
