//! Single inlined primitive for byte-reversing 2/4/8-byte units.
//!
//! All big-endian read/write paths in [`crate::byte_source`] and the UBJSON
//! crates funnel through [`swap_units`] so that the little-endian vs.
//! big-endian decision is made in exactly one place.

/// Reverses every `unit_size`-byte unit in `buf` in place when the host is
/// little-endian. On a big-endian host this is a no-op (UBJSON's wire format
/// is already big-endian). `unit_size` must be 1, 2, 4, or 8; anything else
/// is left untouched.
#[inline]
pub fn swap_units(buf: &mut [u8], unit_size: usize) {
    if cfg!(target_endian = "big") || unit_size <= 1 {
        return;
    }
    match unit_size {
        2 => buf.chunks_exact_mut(2).for_each(|u| u.swap(0, 1)),
        4 => buf.chunks_exact_mut(4).for_each(|u| {
            u.swap(0, 3);
            u.swap(1, 2);
        }),
        8 => buf.chunks_exact_mut(8).for_each(|u| {
            u.swap(0, 7);
            u.swap(1, 6);
            u.swap(2, 5);
            u.swap(3, 4);
        }),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_units_2() {
        let mut buf = [0x01, 0x02, 0x03, 0x04];
        swap_units(&mut buf, 2);
        if cfg!(target_endian = "little") {
            assert_eq!(buf, [0x02, 0x01, 0x04, 0x03]);
        } else {
            assert_eq!(buf, [0x01, 0x02, 0x03, 0x04]);
        }
    }

    #[test]
    fn test_swap_units_noop_for_unit_size_1() {
        let mut buf = [0x01, 0x02, 0x03];
        swap_units(&mut buf, 1);
        assert_eq!(buf, [0x01, 0x02, 0x03]);
    }
}
