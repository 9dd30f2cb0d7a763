//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

use std::convert::TryFrom;
use std::num::TryFromIntError;

use crate::error::{Error, Result};
use crate::object::Integer;

/// Determines the smallest power-of-two width, in bytes, able to hold `value`.
///
/// # Notes
///
/// 1. Widths of 1, 2 and 4 bytes are unsigned.
/// 2. Widths of 8 and 16 bytes are signed, so negative values always take at least 8 bytes.
/// 3. Values outside the signed 128-bit range are rejected.
pub fn min_byte_size<I: Into<Integer>>(value: I) -> Result<usize> {
    let value = value.into().to_i128()?;
    if value < 0 {
        // Magnitude of the value minus one, which cannot overflow.
        let reduced = -(value + 1);
        if reduced <= i128::from(i64::max_value()) {
            Ok(8)
        } else {
            Ok(16)
        }
    } else if value <= 0xFF {
        Ok(1)
    } else if value <= 0xFFFF {
        Ok(2)
    } else if value <= 0xFFFF_FFFF {
        Ok(4)
    } else if value <= i128::from(i64::max_value()) {
        Ok(8)
    } else {
        Ok(16)
    }
}

/// Returns the value bits of an integer marker for a width: 1, 2, 4, 8 and 16
/// bytes map to 0, 1, 2, 3 and 4 respectively.
pub fn width_class(width: usize) -> Result<u8> {
    match width {
        1 => Ok(0),
        2 => Ok(1),
        4 => Ok(2),
        8 => Ok(3),
        16 => Ok(4),
        _ => Err(Error::InvalidWidth(width)),
    }
}

/// Appends `value` to `output` as a big-endian integer exactly `width` bytes long.
///
/// # Notes
///
/// 1. Negative values cannot be stored at the unsigned widths of 1, 2 or 4 bytes.
/// 2. A value too large for the requested width is rejected rather than truncated.
pub fn pack_int<I: Into<Integer>>(value: I, width: usize, output: &mut Vec<u8>) -> Result<()> {
    let value = value.into().to_i128()?;
    let _ = width_class(width)?;

    if value < 0 && width < 8 {
        return Err(Error::NegativeUnsigned(width));
    }

    let out_of_range = |_: TryFromIntError| Error::InvalidWidth(width);
    match width {
        1 =>
            output.push(u8::try_from(value).map_err(out_of_range)?),
        2 =>
            output.extend_from_slice(&u16::try_from(value).map_err(out_of_range)?.to_be_bytes()),
        4 =>
            output.extend_from_slice(&u32::try_from(value).map_err(out_of_range)?.to_be_bytes()),
        8 =>
            output.extend_from_slice(&i64::try_from(value).map_err(out_of_range)?.to_be_bytes()),
        _ =>
            output.extend_from_slice(&value.to_be_bytes()),
    }

    Ok(())
}
