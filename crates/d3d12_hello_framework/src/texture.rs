//! CPU-side texture data for the texture sample.

use eyre::eyre;

use crate::alignment::pitched_byte_size;
use crate::hello_error::HelloResult;

pub const TEXTURE_WIDTH: u32 = 256;
pub const TEXTURE_HEIGHT: u32 = 256;
/// Bytes per RGBA8 texel.
pub const TEXTURE_PIXEL_SIZE: u32 = 4;

const BLACK: [u8; 4] = [0x00, 0x00, 0x00, 0xff];
const WHITE: [u8; 4] = [0xff, 0xff, 0xff, 0xff];

/// Tightly packed RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub pixel_size: u32,
    pub bytes: Vec<u8>,
}

impl TextureData {
    pub fn row_bytes(&self) -> usize {
        (self.width * self.pixel_size) as usize
    }

    pub fn texel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = y as usize * self.row_bytes() + (x * self.pixel_size) as usize;
        self.bytes.get(start..start + self.pixel_size as usize)
    }
}

/// Black and white checkerboard with 8 cells along each axis.
pub fn checkerboard(width: u32, height: u32, pixel_size: u32) -> HelloResult<TextureData> {
    if width < 8 || height < 8 {
        return Err(eyre!("checkerboard needs at least 8x8 texels, got {width}x{height}").into());
    }
    if pixel_size != TEXTURE_PIXEL_SIZE {
        return Err(eyre!("only {TEXTURE_PIXEL_SIZE}-byte texels are supported, got {pixel_size}").into());
    }

    let row_pitch = (width * pixel_size) as usize;
    let cell_pitch = row_pitch >> 3;
    let cell_height = (width >> 3) as usize;
    let texture_size = row_pitch * height as usize;

    let mut bytes = vec![0u8; texture_size];
    for (n, texel) in bytes.chunks_exact_mut(pixel_size as usize).enumerate() {
        let offset = n * pixel_size as usize;
        let x = offset % row_pitch;
        let y = offset / row_pitch;
        let i = x / cell_pitch;
        let j = y / cell_height;
        let color = if i % 2 == j % 2 { BLACK } else { WHITE };
        texel.copy_from_slice(&color);
    }

    Ok(TextureData {
        width,
        height,
        pixel_size,
        bytes,
    })
}

/// Re-lay tightly packed rows at `row_pitch` bytes per row, the layout an
/// upload buffer needs for `CopyTextureRegion`. The last row stops at
/// `row_bytes`.
pub fn pitch_rows(src: &[u8], row_bytes: usize, row_pitch: usize, rows: usize) -> HelloResult<Vec<u8>> {
    if row_bytes == 0 {
        return Err(eyre!("rows must hold at least one byte").into());
    }
    if row_pitch < row_bytes {
        return Err(eyre!("row pitch {row_pitch} is smaller than a row ({row_bytes} bytes)").into());
    }
    if src.len() < row_bytes * rows {
        return Err(eyre!(
            "source has {} bytes, {rows} rows of {row_bytes} need {}",
            src.len(),
            row_bytes * rows
        )
        .into());
    }

    let mut pitched = vec![0u8; pitched_byte_size(row_bytes, row_pitch, rows)];
    for (row, src_row) in src.chunks_exact(row_bytes).take(rows).enumerate() {
        let start = row * row_pitch;
        pitched[start..start + row_bytes].copy_from_slice(src_row);
    }
    Ok(pitched)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_alternates_cells() -> HelloResult<()> {
        let texture = checkerboard(TEXTURE_WIDTH, TEXTURE_HEIGHT, TEXTURE_PIXEL_SIZE)?;
        assert_eq!(texture.bytes.len(), 256 * 256 * 4);

        // Cells are 32x32 texels.
        assert_eq!(texture.texel(0, 0), Some(&BLACK[..]));
        assert_eq!(texture.texel(31, 31), Some(&BLACK[..]));
        assert_eq!(texture.texel(32, 0), Some(&WHITE[..]));
        assert_eq!(texture.texel(0, 32), Some(&WHITE[..]));
        assert_eq!(texture.texel(32, 32), Some(&BLACK[..]));
        assert_eq!(texture.texel(255, 255), Some(&BLACK[..]));
        assert_eq!(texture.texel(256, 0), None);
        Ok(())
    }

    #[test]
    fn checkerboard_is_fully_opaque() -> HelloResult<()> {
        let texture = checkerboard(64, 64, 4)?;
        assert!(texture.bytes.chunks_exact(4).all(|texel| texel[3] == 0xff));
        Ok(())
    }

    #[test]
    fn checkerboard_rejects_unsupported_shapes() {
        assert!(checkerboard(4, 4, 4).is_err());
        assert!(checkerboard(64, 64, 3).is_err());
    }

    #[test]
    fn pitch_rows_pads_each_row() -> HelloResult<()> {
        let src = [1, 2, 3, 4, 5, 6];
        let pitched = pitch_rows(&src, 3, 4, 2)?;
        assert_eq!(pitched, vec![1, 2, 3, 0, 4, 5, 6]);
        Ok(())
    }

    #[test]
    fn pitched_rows_fit_the_copyable_footprint() -> HelloResult<()> {
        // Three RGBA8 texels per row, far from the 256-byte pitch.
        let pitched = pitch_rows(&[7; 24], 12, 256, 2)?;
        assert_eq!(pitched.len(), 256 + 12);
        assert_eq!(&pitched[..12], &[7u8; 12]);
        assert!(pitched[12..256].iter().all(|byte| *byte == 0));
        assert_eq!(&pitched[256..], &[7u8; 12]);
        Ok(())
    }

    #[test]
    fn pitch_rows_validates_sizes() {
        assert!(pitch_rows(&[0; 8], 4, 2, 2).is_err());
        assert!(pitch_rows(&[0; 7], 4, 4, 2).is_err());
        assert!(pitch_rows(&[0; 8], 0, 4, 2).is_err());
    }
}
