#[cfg(windows)]
fn main() {
  use desktop_screenshot::{capture_desktop, Compression, PngOptions};

  let screenshot = capture_desktop().unwrap();
  println!(
    "bounds: {:?}, size: {}x{}",
    screenshot.bounds,
    screenshot.width(),
    screenshot.height()
  );
  for display in &screenshot.captured {
    println!(
      "{}{}: {:?}",
      display.name,
      if display.primary { " (primary)" } else { "" },
      display.rect
    );
  }

  let png = screenshot
    .to_png(&PngOptions {
      compression: Compression::Best,
    })
    .unwrap();
  std::fs::write("desktop.png", png).unwrap();
}

#[cfg(not(windows))]
fn main() {
  eprintln!("desktop capture is only available on Windows");
}
