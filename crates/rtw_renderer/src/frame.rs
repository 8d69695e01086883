//! Shared RGB frame buffer.
//!
//! Every pixel is written by exactly one render task, so the buffer needs no
//! lock: each byte is an `AtomicU8` stored with relaxed ordering, and the
//! completion barrier of a render pass (waiting on every task handle)
//! publishes the writes to whoever reads the frame afterwards.

use std::sync::atomic::{AtomicU8, Ordering};

/// Bytes per pixel (R, G, B).
pub const CHANNELS: usize = 3;

/// Row-major RGB8 frame, `width * height * 3` bytes.
///
/// Row 0 is the bottom of the image.
pub struct FrameBuffer {
    width: u32,
    height: u32,
    bytes: Box<[AtomicU8]>,
}

impl FrameBuffer {
    /// Allocate a zeroed frame.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * CHANNELS;
        let bytes = (0..len).map(|_| AtomicU8::new(0)).collect();
        Self {
            width,
            height,
            bytes,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Byte offset of pixel (x, y).
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        CHANNELS * (y as usize * self.width as usize + x as usize)
    }

    /// Zero every byte. Only call between passes.
    pub fn clear(&self) {
        for byte in self.bytes.iter() {
            byte.store(0, Ordering::Relaxed);
        }
    }

    /// Store one pixel.
    pub fn write_pixel(&self, x: u32, y: u32, rgb: [u8; 3]) {
        let index = self.index(x, y);
        for (byte, value) in self.bytes[index..index + CHANNELS].iter().zip(rgb) {
            byte.store(value, Ordering::Relaxed);
        }
    }

    /// Read one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let index = self.index(x, y);
        [
            self.bytes[index].load(Ordering::Relaxed),
            self.bytes[index + 1].load(Ordering::Relaxed),
            self.bytes[index + 2].load(Ordering::Relaxed),
        ]
    }

    /// Copy the whole frame out as plain bytes, e.g. for texture upload.
    ///
    /// Complete only after the render pass has finished; while a pass is
    /// running this returns whatever pixels are done so far.
    pub fn snapshot(&self) -> Vec<u8> {
        self.bytes
            .iter()
            .map(|byte| byte.load(Ordering::Relaxed))
            .collect()
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
