use eyre::eyre;

use crate::hello_error::HelloResult;

/// Constant buffers are bound in 256-byte steps.
pub const CONSTANT_BUFFER_ALIGNMENT: u32 = 256;

/// Round `byte_size` up to the next multiple of 256.
pub fn constant_buffer_byte_size(byte_size: u32) -> u32 {
    (byte_size + CONSTANT_BUFFER_ALIGNMENT - 1) & !(CONSTANT_BUFFER_ALIGNMENT - 1)
}

/// Round `value` up to `alignment`, which must be a power of two.
pub fn align_up(value: u64, alignment: u64) -> u64 {
    debug_assert!(alignment.is_power_of_two());
    (value + alignment - 1) & !(alignment - 1)
}

/// Address of the `index`th descriptor in a heap starting at `start`.
pub fn descriptor_offset(start: usize, index: u32, increment_size: u32) -> usize {
    start + index as usize * increment_size as usize
}

/// Size of `rows` rows laid out at `row_pitch`. The last row is not padded,
/// matching the total `GetCopyableFootprints` reports.
pub fn pitched_byte_size(row_bytes: usize, row_pitch: usize, rows: usize) -> usize {
    match rows {
        0 => 0,
        rows => row_pitch * (rows - 1) + row_bytes,
    }
}

/// Fails unless `len` bytes fit in a resource of `capacity` bytes.
pub fn check_write_size(len: usize, capacity: u64) -> HelloResult<()> {
    if len as u64 > capacity {
        return Err(eyre!("writing {len} bytes into a {capacity} byte resource").into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_buffers_round_up_to_256() {
        assert_eq!(constant_buffer_byte_size(0), 0);
        assert_eq!(constant_buffer_byte_size(1), 256);
        assert_eq!(constant_buffer_byte_size(64), 256);
        assert_eq!(constant_buffer_byte_size(256), 256);
        assert_eq!(constant_buffer_byte_size(300), 512);
    }

    #[test]
    fn align_up_to_texture_pitch() {
        assert_eq!(align_up(1024, 256), 1024);
        assert_eq!(align_up(1025, 256), 1280);
        assert_eq!(align_up(12, 512), 512);
    }

    #[test]
    fn pitched_size_leaves_last_row_unpadded() {
        assert_eq!(pitched_byte_size(12, 256, 2), 268);
        assert_eq!(pitched_byte_size(1024, 1024, 256), 256 * 1024);
        assert_eq!(pitched_byte_size(12, 256, 0), 0);
    }

    #[test]
    fn writes_must_fit_the_resource() {
        assert!(check_write_size(268, 268).is_ok());
        assert!(check_write_size(0, 0).is_ok());
        assert!(check_write_size(512, 268).is_err());
    }

    #[test]
    fn descriptor_offsets_step_by_increment() {
        assert_eq!(descriptor_offset(0x1000, 0, 32), 0x1000);
        assert_eq!(descriptor_offset(0x1000, 1, 32), 0x1020);
        assert_eq!(descriptor_offset(0x1000, 3, 32), 0x1060);
    }
}
