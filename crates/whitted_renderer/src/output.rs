//! Image output: PPM (ASCII `P3` or binary `P6`) and PNG.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::renderer::ImageBuffer;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Pixel buffer does not match a {width}x{height} image")]
    BufferSize { width: u32, height: u32 },
}

/// PPM flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PpmFormat {
    /// `P3`: decimal triples, one pixel per line
    #[default]
    Ascii,
    /// `P6`: three raw bytes per pixel
    Binary,
}

/// Write `image` as PPM in scan order.
pub fn write_ppm<W: Write>(writer: &mut W, image: &ImageBuffer, format: PpmFormat) -> Result<(), OutputError> {
    let magic = match format {
        PpmFormat::Ascii => "P3",
        PpmFormat::Binary => "P6",
    };
    writeln!(writer, "{}", magic)?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    match format {
        PpmFormat::Ascii => {
            for color in &image.pixels {
                let [r, g, b] = color.to_rgb8();
                writeln!(writer, "{} {} {}", r, g, b)?;
            }
        }
        PpmFormat::Binary => writer.write_all(&image.to_rgb8())?,
    }

    writer.flush()?;
    Ok(())
}

impl ImageBuffer {
    /// Save as a PPM file.
    pub fn save_ppm<P: AsRef<Path>>(&self, path: P, format: PpmFormat) -> Result<(), OutputError> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        write_ppm(&mut writer, self, format)?;
        log::info!("Wrote {}", path.as_ref().display());
        Ok(())
    }

    /// Save as a PNG file.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), OutputError> {
        let buffer = image::RgbImage::from_raw(self.width, self.height, self.to_rgb8()).ok_or(
            OutputError::BufferSize {
                width: self.width,
                height: self.height,
            },
        )?;
        buffer.save(path.as_ref())?;
        log::info!("Wrote {}", path.as_ref().display());
        Ok(())
    }
}
