use crate::{capture_desktop_with, CaptureOptions, DisplaySource, Result};

/// Name of the channel the host framework routes calls through.
pub const CHANNEL: &str = "desktop_screenshot";

/// Error code reported for every failed capture.
pub const INVALID_IMAGE_DATA: &str = "INVALID_IMAGE_DATA";
pub const INVALID_IMAGE_DATA_MESSAGE: &str = "Failed to capture valid image data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
  GetPlatformVersion,
  GetScreenshot,
}

impl Method {
  pub fn from_name(name: &str) -> Option<Self> {
    match name {
      "getPlatformVersion" => Some(Self::GetPlatformVersion),
      "getScreenshot" => Some(Self::GetScreenshot),
      _ => None,
    }
  }

  pub const fn name(&self) -> &'static str {
    match self {
      Self::GetPlatformVersion => "getPlatformVersion",
      Self::GetScreenshot => "getScreenshot",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
  String(String),
  /// PNG stream.
  Bytes(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodResponse {
  Success(Value),
  Error {
    code: &'static str,
    message: &'static str,
  },
  NotImplemented,
}

impl MethodResponse {
  #[inline]
  pub const fn invalid_image_data() -> Self {
    Self::Error {
      code: INVALID_IMAGE_DATA,
      message: INVALID_IMAGE_DATA_MESSAGE,
    }
  }
}

/// Answers the calls of the host framework.
///
/// This holds no OS resources; each call acquires and releases its own.
/// # Examples
/// ```no_run
/// # #[cfg(windows)]
/// # {
/// use desktop_screenshot::{MethodResponse, ScreenshotPlugin, Value};
///
/// let plugin = ScreenshotPlugin::desktop();
/// if let MethodResponse::Success(Value::Bytes(png)) = plugin.handle("getScreenshot") {
///   std::fs::write("desktop.png", png).unwrap();
/// }
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ScreenshotPlugin<S> {
  pub source: S,
  pub options: CaptureOptions,
  platform_version: String,
}

impl<S: DisplaySource> ScreenshotPlugin<S> {
  pub fn new(source: S, platform_version: impl Into<String>) -> Self {
    Self {
      source,
      options: CaptureOptions::default(),
      platform_version: platform_version.into(),
    }
  }

  #[inline]
  pub fn platform_version(&self) -> &str {
    &self.platform_version
  }

  /// Capture the desktop and encode it as PNG.
  pub fn screenshot(&self) -> Result<Vec<u8>> {
    capture_desktop_with(&self.source, &self.options)?.to_png(&self.options.png)
  }

  pub fn handle(&self, method: &str) -> MethodResponse {
    let Some(method) = Method::from_name(method) else {
      log::debug!("method {} is not implemented", method);
      return MethodResponse::NotImplemented;
    };

    match method {
      Method::GetPlatformVersion => {
        MethodResponse::Success(Value::String(self.platform_version.clone()))
      }
      Method::GetScreenshot => match self.screenshot() {
        Ok(png) => MethodResponse::Success(Value::Bytes(png)),
        Err(e) => {
          // callers only see one error, keep the details here
          log::error!("{} failed ({:?}): {}", method.name(), e.kind(), e);
          MethodResponse::invalid_image_data()
        }
      },
    }
  }
}

#[cfg(windows)]
impl ScreenshotPlugin<crate::GdiDesktop> {
  /// A plugin capturing the live desktop.
  pub fn desktop() -> Self {
    Self::new(
      crate::GdiDesktop::default(),
      crate::platform_version_label(),
    )
  }
}
