/// Classify a Windows version into its family label.
///
/// Versions older than Windows 7 are unclassified and yield `"Windows"`.
pub const fn classify(major: u32, minor: u32) -> &'static str {
  match (major, minor) {
    (10.., _) => "Windows 10+",
    (6, 2..) | (7..=9, _) => "Windows 8",
    (6, 1) => "Windows 7",
    _ => "Windows",
  }
}

/// Return the `(major, minor, build)` version of the running OS.
///
/// Uses `RtlGetVersion`, which is not affected by the compatibility
/// manifest of the host executable.
#[cfg(windows)]
pub fn os_version() -> crate::Result<(u32, u32, u32)> {
  use windows::{
    Wdk::System::SystemServices::RtlGetVersion, Win32::System::SystemInformation::OSVERSIONINFOW,
  };

  let mut info = OSVERSIONINFOW {
    dwOSVersionInfoSize: size_of::<OSVERSIONINFOW>() as u32,
    ..Default::default()
  };
  unsafe { RtlGetVersion(&mut info) }
    .ok()
    .map_err(crate::Error::from_win_err(stringify!(RtlGetVersion)))?;
  Ok((info.dwMajorVersion, info.dwMinorVersion, info.dwBuildNumber))
}

/// Human readable family of the running OS, e.g. `"Windows 10+"`.
#[cfg(windows)]
pub fn platform_version_label() -> &'static str {
  match os_version() {
    Ok((major, minor, _)) => classify(major, minor),
    Err(e) => {
      log::debug!("unknown OS version: {}", e);
      classify(0, 0)
    }
  }
}
