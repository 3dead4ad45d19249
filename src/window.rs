//! SDL2 window output.

use std::time::{Duration, Instant};

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;

use crate::colors::Color;
use crate::error::PresentError;
use crate::render::framebuffer::FrameBuffer;
use crate::render::sink::OutputSink;

/// Sleeps between frames to hold a target frame rate.
pub struct FrameLimiter {
    frame_target: Option<Duration>,
    previous_frame: Instant,
}

impl FrameLimiter {
    /// `fps == 0` disables limiting.
    pub fn new(fps: u32) -> Self {
        Self {
            frame_target: (fps > 0).then(|| Duration::from_secs_f64(1.0 / fps as f64)),
            previous_frame: Instant::now(),
        }
    }

    /// Waits if necessary to maintain frame rate and returns the delta time in milliseconds.
    /// Delta time represents the time elapsed since the last call to this method.
    pub fn wait_and_get_delta(&mut self) -> u64 {
        let mut elapsed = self.previous_frame.elapsed();

        if let Some(target) = self.frame_target {
            if elapsed < target {
                std::thread::sleep(target - elapsed);
                elapsed = self.previous_frame.elapsed();
            }
        }

        self.previous_frame = Instant::now();
        elapsed.as_millis() as u64
    }
}

/// A fixed-size SDL2 window that shows each presented frame.
///
/// Pixels are drawn into an in-memory [`FrameBuffer`] and uploaded to a
/// streaming ARGB8888 texture on [`present`](OutputSink::present).
pub struct Window {
    // Field order matters: the texture borrows from `texture_creator` and
    // must be dropped first.
    texture: sdl2::render::Texture<'static>,
    _texture_creator: Box<sdl2::render::TextureCreator<sdl2::video::WindowContext>>,
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    event_pump: sdl2::EventPump,
    frame: FrameBuffer,
    quit_requested: bool,
}

impl Window {
    pub fn new(title: &str, width: u32, height: u32, background: Color) -> Result<Self, PresentError> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump()?;

        // SAFETY: texture_creator is heap-allocated and lives as long as Window.
        // The texture field is declared first, so it is dropped before the creator.
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(texture_creator.as_ref() as *const _) };
        let texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| e.to_string())?;

        log::info!("opened {}x{} window \"{}\"", width, height, title);

        Ok(Self {
            texture,
            _texture_creator: texture_creator,
            canvas,
            event_pump,
            frame: FrameBuffer::with_background(width, height, background),
            quit_requested: false,
        })
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }
}

impl OutputSink for Window {
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
        let (width, height) = (self.frame.width(), self.frame.height());
        self.texture
            .update(None, self.frame.as_bytes(), (width * 4) as usize)
            .map_err(|e| e.to_string())?;

        self.canvas.clear();
        self.canvas
            .copy(&self.texture, None, Some(Rect::new(0, 0, width, height)))?;
        self.canvas.present();
        self.frame.present()
    }

    fn poll_quit(&mut self) -> bool {
        for event in self.event_pump.poll_iter() {
            if let Event::Quit { .. }
            | Event::KeyDown {
                keycode: Some(Keycode::Escape),
                ..
            } = event
            {
                log::info!("quit requested");
                self.quit_requested = true;
            }
        }
        self.quit_requested
    }
}
