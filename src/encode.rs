use crate::Result;
use image::{
  codecs::png::{CompressionType, FilterType, PngEncoder},
  ExtendedColorType, ImageEncoder, RgbaImage,
};

/// PNG compression effort. The output is lossless at every level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
  Fast,
  #[default]
  Default,
  Best,
}

impl From<Compression> for CompressionType {
  fn from(value: Compression) -> Self {
    match value {
      Compression::Fast => CompressionType::Fast,
      Compression::Default => CompressionType::Default,
      Compression::Best => CompressionType::Best,
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PngOptions {
  pub compression: Compression,
}

/// Encode an RGBA image as a PNG stream.
pub fn encode_png(image: &RgbaImage, options: &PngOptions) -> Result<Vec<u8>> {
  let mut bytes = Vec::new();
  PngEncoder::new_with_quality(&mut bytes, options.compression.into(), FilterType::Adaptive)
    .write_image(
      image.as_raw(),
      image.width(),
      image.height(),
      ExtendedColorType::Rgba8,
    )?;
  Ok(bytes)
}
