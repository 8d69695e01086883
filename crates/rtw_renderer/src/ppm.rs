//! Plain-text PPM (P3) output.

use crate::{FrameBuffer, RenderResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write `frame` as P3 text: header, then one `R G B` line per pixel,
/// top row first, left to right.
pub fn write_ppm<W: Write>(mut writer: W, frame: &FrameBuffer) -> std::io::Result<()> {
    let (width, height) = (frame.width(), frame.height());
    let bytes = frame.snapshot();

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", width, height)?;
    writeln!(writer, "255")?;

    // Frame rows run bottom to top
    for y in (0..height).rev() {
        for x in 0..width {
            let index = frame.index(x, y);
            writeln!(writer, "{} {} {}", bytes[index], bytes[index + 1], bytes[index + 2])?;
        }
    }

    writer.flush()
}

/// Save `frame` to a PPM file.
pub fn save_ppm(path: impl AsRef<Path>, frame: &FrameBuffer) -> RenderResult<()> {
    let file = File::create(path.as_ref())?;
    write_ppm(BufWriter::new(file), frame)?;
    log::info!("Saved {}", path.as_ref().display());
    Ok(())
}
