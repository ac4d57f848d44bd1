use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
  /// No display was found, or the displays cover no area.
  #[error("no display to capture")]
  NoDisplay,

  #[error("failed to allocate a {width}x{height} image")]
  Allocation { width: u32, height: u32 },

  /// A display was read with a size other than its rectangle's.
  #[error("frame is {actual:?}, expected {expected:?}")]
  FrameSize {
    expected: Option<(u32, u32)>,
    actual: (u32, u32),
  },

  #[error("png encoding failed: {0}")]
  Encode(#[from] image::ImageError),

  /// A Windows error.
  #[cfg(windows)]
  #[error("{api}: {err}")]
  Windows {
    api: &'static str,
    err: windows::core::Error,
  },
}

/// Coarse classification of [`Error`], for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  NoDisplay,
  /// A buffer or an OS drawing context could not be created.
  Allocation,
  Encode,
  /// A single display could not be read.
  /// Captures tolerate this, so it never reaches the caller of a capture.
  Read,
}

impl Error {
  pub const fn kind(&self) -> ErrorKind {
    match self {
      Self::NoDisplay => ErrorKind::NoDisplay,
      Self::Allocation { .. } => ErrorKind::Allocation,
      Self::Encode(_) => ErrorKind::Encode,
      Self::FrameSize { .. } => ErrorKind::Read,
      #[cfg(windows)]
      Self::Windows { .. } => ErrorKind::Allocation,
    }
  }
}

#[cfg(windows)]
impl Error {
  /// Create a new Windows error.
  #[inline]
  const fn windows(api: &'static str, err: windows::core::Error) -> Self {
    Self::Windows { api, err }
  }

  /// Create a new Windows error from `GetLastError`.
  #[inline]
  pub(crate) fn last_win_err(api: &'static str) -> Self {
    let code = unsafe { windows::Win32::Foundation::GetLastError() };
    Self::windows(
      api,
      windows::core::Error::from_hresult(windows::core::HRESULT::from_win32(code.0)),
    )
  }

  /// Return an error mapper to convert a Windows error to an [`Error`].
  #[inline]
  pub(crate) fn from_win_err(api: &'static str) -> impl FnOnce(windows::core::Error) -> Self {
    move |e| Self::windows(api, e)
  }
}
