use crate::Rect;
use windows::Win32::{Foundation::RECT, Graphics::Gdi::MONITORINFOEXW};

pub trait RectExt {
  fn to_rect(&self) -> Rect;
}

impl RectExt for RECT {
  fn to_rect(&self) -> Rect {
    Rect::new(self.left, self.top, self.right, self.bottom)
  }
}

pub trait MonitorInfoExt {
  fn is_primary(&self) -> bool;
  /// Device name such as `\\.\DISPLAY1`.
  fn device_name(&self) -> String;
}

impl MonitorInfoExt for MONITORINFOEXW {
  fn is_primary(&self) -> bool {
    self.monitorInfo.dwFlags & 0x01 != 0 // MONITORINFOF_PRIMARY
  }

  fn device_name(&self) -> String {
    let len = self
      .szDevice
      .iter()
      .position(|&c| c == 0)
      .unwrap_or(self.szDevice.len());
    String::from_utf16_lossy(&self.szDevice[..len])
  }
}
