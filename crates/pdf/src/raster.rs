//! Pixmap to PNG encoding.

use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;

/// Pack interleaved samples with `n` components per pixel into RGB.
///
/// Missing components read as 0; components beyond the third are dropped.
pub(crate) fn samples_to_rgb(samples: &[u8], width: u32, height: u32, n: usize) -> Vec<u8> {
    let pixels = width as usize * height as usize;
    let mut rgb = Vec::with_capacity(pixels * 3);

    for i in 0..pixels {
        let offset = i * n;
        if n < 3 {
            // grayscale
            let v = samples.get(offset).copied().unwrap_or(0);
            rgb.extend_from_slice(&[v, v, v]);
        } else {
            for c in 0..3 {
                rgb.push(samples.get(offset + c).copied().unwrap_or(0));
            }
        }
    }

    rgb
}

/// Encode an RGB buffer as PNG.
pub(crate) fn encode_png(rgb: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, String> {
    let img = RgbImage::from_raw(width, height, rgb)
        .ok_or_else(|| "pixel buffer does not match image size".to_string())?;

    let mut output = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut output), ImageFormat::Png)
        .map_err(|e| e.to_string())?;
    Ok(output)
}
