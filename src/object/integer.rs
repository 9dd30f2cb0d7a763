//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

use std::convert::TryFrom;
use std::fmt;

use crate::error::{Error, Result};

/// An integer of up to 128 bits of magnitude with an independent sign.
///
/// The range is wider than what a bplist can carry. Values outside the signed
/// 128-bit range can be stored in a `Plist` and are rejected with
/// `Error::IntegerOutOfRange` when encoded.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Integer {
    negative: bool,
    magnitude: u128,
}

impl Integer {

    /// Constructs an integer from a sign and a magnitude. Negative zero is normalized.
    pub fn new(negative: bool, magnitude: u128) -> Self {
        Integer {
            negative: negative && magnitude != 0,
            magnitude,
        }
    }

    /// Whether the value is less than zero.
    pub fn is_negative(self) -> bool {
        self.negative
    }

    /// The absolute value.
    pub fn magnitude(self) -> u128 {
        self.magnitude
    }

    /// Converts the value into a signed 128-bit integer.
    pub fn to_i128(self) -> Result<i128> {
        if self.negative {
            // The magnitude of i128::MIN is one more than i128::MAX.
            if self.magnitude > i128::max_value() as u128 + 1 {
                Err(Error::IntegerOutOfRange)
            } else {
                Ok(0i128.wrapping_sub(self.magnitude as i128))
            }
        } else {
            i128::try_from(self.magnitude).map_err(|_| Error::IntegerOutOfRange)
        }
    }

}

impl fmt::Display for Integer {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        if self.negative {
            write!(formatter, "-{}", self.magnitude)
        } else {
            write!(formatter, "{}", self.magnitude)
        }
    }
}

macro_rules! impl_from_unsigned {
    ($($type:ty),*) => {
        $(
            impl From<$type> for Integer {
                fn from(value: $type) -> Self {
                    Integer::new(false, value as u128)
                }
            }
        )*
    };
}

macro_rules! impl_from_signed {
    ($($type:ty),*) => {
        $(
            impl From<$type> for Integer {
                fn from(value: $type) -> Self {
                    let value = value as i128;
                    Integer::new(value < 0, value.unsigned_abs())
                }
            }
        )*
    };
}

impl_from_unsigned![u8, u16, u32, u64, u128, usize];
impl_from_signed![i8, i16, i32, i64, i128, isize];

#[cfg(test)]
mod tests {
    use super::Integer;
    use crate::error::Error;

    #[test]
    fn test_from_signed_extremes() {
        assert_eq!(Integer::from(i128::min_value()).to_i128(), Ok(i128::min_value()));
        assert_eq!(Integer::from(i128::max_value()).to_i128(), Ok(i128::max_value()));
        assert_eq!(Integer::from(-1i8).to_i128(), Ok(-1));
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(Integer::from(u128::max_value()).to_i128(), Err(Error::IntegerOutOfRange));
        assert_eq!(Integer::from(1u128 << 127).to_i128(), Err(Error::IntegerOutOfRange));
        assert_eq!(Integer::new(true, (1u128 << 127) + 1).to_i128(), Err(Error::IntegerOutOfRange));
    }

    #[test]
    fn test_negative_zero_is_normalized() {
        let zero = Integer::new(true, 0);
        assert!(!zero.is_negative());
        assert_eq!(zero, Integer::from(0u8));
    }

    #[test]
    fn test_display() {
        assert_eq!(Integer::from(-42i32).to_string(), "-42");
        assert_eq!(Integer::from(u64::max_value()).to_string(), "18446744073709551615");
    }
}
