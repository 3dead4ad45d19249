//! Output destinations for rendered frames.

use std::path::{Path, PathBuf};

use super::framebuffer::FrameBuffer;
use crate::colors::Color;
use crate::error::PresentError;

/// Something the renderer can draw pixels into.
///
/// Coordinates are centered: `(0, 0)` is the middle of the canvas and `y`
/// grows upward. The canvas size is fixed at construction. Implementations
/// must drop off-canvas pixels without failing.
pub trait OutputSink {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Fills the canvas with the background color.
    fn clear(&mut self);

    fn put_pixel(&mut self, x: i32, y: i32, color: Color);

    /// Hands the finished frame to its destination.
    fn present(&mut self) -> Result<(), PresentError>;

    /// Returns true once the destination wants rendering to stop.
    fn poll_quit(&mut self) -> bool;
}

/// Writes every presented frame to a numbered PNG file.
///
/// Requests quit after `frame_limit` frames, which lets the render loop run
/// headless and terminate on its own.
#[derive(Debug)]
pub struct ImageSink {
    frame: FrameBuffer,
    directory: PathBuf,
    frame_limit: u32,
    frames_written: u32,
}

impl ImageSink {
    /// Creates the sink, creating `directory` if needed.
    pub fn new<P: AsRef<Path>>(
        width: u32,
        height: u32,
        background: Color,
        directory: P,
        frame_limit: u32,
    ) -> Result<Self, PresentError> {
        let directory = directory.as_ref().to_path_buf();
        std::fs::create_dir_all(&directory)?;
        log::info!(
            "writing up to {} frames of {}x{} to {}",
            frame_limit,
            width,
            height,
            directory.display()
        );
        Ok(Self {
            frame: FrameBuffer::with_background(width, height, background),
            directory,
            frame_limit,
            frames_written: 0,
        })
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn frames_written(&self) -> u32 {
        self.frames_written
    }

    /// Path of the file frame `index` is written to.
    pub fn frame_path(&self, index: u32) -> PathBuf {
        self.directory.join(format!("frame_{:05}.png", index))
    }

    fn to_image(&self) -> image::RgbImage {
        let width = self.frame.width();
        let pixels = self.frame.pixels();
        image::RgbImage::from_fn(width, self.frame.height(), |column, row| {
            let color = Color::from_argb(pixels[(row * width + column) as usize]);
            image::Rgb([color.r, color.g, color.b])
        })
    }
}

impl OutputSink for ImageSink {
    fn width(&self) -> u32 {
        self.frame.width()
    }

    fn height(&self) -> u32 {
        self.frame.height()
    }

    fn clear(&mut self) {
        self.frame.clear();
    }

    #[inline]
    fn put_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.frame.put_pixel(x, y, color);
    }

    fn present(&mut self) -> Result<(), PresentError> {
        let path = self.frame_path(self.frames_written);
        self.to_image().save(&path)?;
        self.frame.present()?;
        self.frames_written += 1;
        log::debug!("wrote {}", path.display());
        Ok(())
    }

    fn poll_quit(&mut self) -> bool {
        self.frames_written >= self.frame_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rastrum-sink-{}-{}", name, std::process::id()))
    }

    #[test]
    fn writes_png_frames_and_quits_after_limit() {
        let dir = scratch_dir("frames");
        let mut sink = ImageSink::new(16, 8, Color::BLACK, &dir, 2).unwrap();
        assert!(!sink.poll_quit());

        sink.clear();
        sink.put_pixel(0, 0, Color::GOLD);
        sink.present().unwrap();
        assert!(!sink.poll_quit());
        sink.present().unwrap();
        assert!(sink.poll_quit());

        let image = image::open(sink.frame_path(0)).unwrap().to_rgb8();
        assert_eq!(image.dimensions(), (16, 8));
        // Centered (0, 0) is column 8, row 4.
        assert_eq!(image.get_pixel(8, 4).0, [255, 215, 0]);
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0]);
        assert!(sink.frame_path(1).exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
