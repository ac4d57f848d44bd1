use crate::{Display, Error, MonitorInfoExt, RectExt, Result};
use std::vec;
use windows::{
  core::BOOL,
  Win32::{
    Foundation::{LPARAM, RECT},
    Graphics::Gdi::{
      EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFO, MONITORINFOEXW,
    },
  },
};

/// Enumerates the monitors of the desktop.
///
/// Monitors come from `EnumDisplayMonitors`, the same GDI view of the
/// desktop the screen DC reads pixels from, so positions share its
/// coordinate space.
/// # Examples
/// ```no_run
/// use desktop_screenshot::Scanner;
///
/// for display in Scanner::new().unwrap() {
///   println!("{} {:?}", display.name, display.rect);
/// }
/// ```
#[derive(Debug)]
pub struct Scanner {
  monitors: vec::IntoIter<HMONITOR>,
}

impl Scanner {
  pub fn new() -> Result<Self> {
    unsafe extern "system" fn push(
      h_monitor: HMONITOR,
      _: HDC,
      _: *mut RECT,
      data: LPARAM,
    ) -> BOOL {
      let monitors = data.0 as *mut Vec<HMONITOR>;
      unsafe { (*monitors).push(h_monitor) };
      BOOL(1) // continue
    }

    let mut monitors = Vec::<HMONITOR>::new();
    let ok = unsafe {
      EnumDisplayMonitors(
        None,
        None,
        Some(push),
        LPARAM(&mut monitors as *mut Vec<HMONITOR> as isize),
      )
    };
    if !ok.as_bool() {
      return Err(Error::last_win_err(stringify!(EnumDisplayMonitors)));
    }
    log::debug!("{} monitor(s) enumerated", monitors.len());

    Ok(Self {
      monitors: monitors.into_iter(),
    })
  }
}

impl Iterator for Scanner {
  type Item = Display;

  fn next(&mut self) -> Option<Self::Item> {
    self.monitors.by_ref().find_map(describe)
  }
}

/// Return [`None`] for monitors which can't be read.
fn describe(h_monitor: HMONITOR) -> Option<Display> {
  let info = match monitor_info(h_monitor) {
    Ok(info) => info,
    Err(e) => {
      log::debug!("skip monitor {:?}: {}", h_monitor, e);
      return None;
    }
  };

  let name = info.device_name();
  let rect = info.monitorInfo.rcMonitor.to_rect();
  if rect.is_empty() {
    log::debug!("skip monitor {}: empty rect {:?}", name, rect);
    return None;
  }

  Some(Display {
    rect,
    name,
    primary: info.is_primary(),
  })
}

fn monitor_info(h_monitor: HMONITOR) -> Result<MONITORINFOEXW> {
  let mut info = MONITORINFOEXW {
    monitorInfo: MONITORINFO {
      cbSize: size_of::<MONITORINFOEXW>() as u32,
      ..Default::default()
    },
    ..Default::default()
  };
  let ptr = (&mut info as *mut MONITORINFOEXW).cast::<MONITORINFO>();
  if unsafe { GetMonitorInfoW(h_monitor, ptr).as_bool() } {
    Ok(info)
  } else {
    Err(Error::last_win_err(stringify!(GetMonitorInfoW)))
  }
}
