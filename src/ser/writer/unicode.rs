//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! Strings are written either as 7-bit ASCII or as big-endian 16-bit code units.
//! Only code points in the Basic Multilingual Plane can be written; surrogate
//! pairs are never produced.

use ascii::AsciiStr;
use nom::{
    IResult,
    branch::alt,
    combinator::{map, verify},
    number::complete::be_u8,
    sequence::tuple,
};

use std::convert::TryFrom;

use crate::error::{Error, Result};

/// The two string representations supported by the format.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EncodedString<'a> {
    /// The string is pure 7-bit ASCII and is stored byte-for-byte.
    Ascii(&'a AsciiStr),
    /// The string requires 16-bit code units.
    Utf16(Vec<u16>),
}

/// Returns a parser which consumes a single byte whose `mask` bits equal `bits`,
/// yielding the remaining payload bits.
fn masked_byte(
    mask: u8,
    bits: u8,
) -> impl Fn(&[u8]) -> IResult<&[u8], u32> {
    move |input: &[u8]| {
        map(
            verify(be_u8, move |b: &u8| (*b & mask) == bits),
            move |b: u8| u32::from(b & !mask)
        )(input)
    }
}

/// Parses a continuation byte, yielding its six payload bits.
fn continuation(input: &[u8]) -> IResult<&[u8], u32> {
    masked_byte(0b1100_0000, 0b1000_0000)(input)
}

/// Parses a single 1-, 2-, 3- or 4-byte UTF-8 sequence into a code point.
fn code_point(input: &[u8]) -> IResult<&[u8], u32> {
    alt((
        masked_byte(0b1000_0000, 0b0000_0000),
        map(
            tuple((
                masked_byte(0b1110_0000, 0b1100_0000),
                continuation,
            )),
            |(lead, a)| (lead << 6) | a
        ),
        map(
            tuple((
                masked_byte(0b1111_0000, 0b1110_0000),
                continuation,
                continuation,
            )),
            |(lead, a, b)| (lead << 12) | (a << 6) | b
        ),
        map(
            tuple((
                masked_byte(0b1111_1000, 0b1111_0000),
                continuation,
                continuation,
                continuation,
            )),
            |(lead, a, b, c)| (lead << 18) | (a << 12) | (b << 6) | c
        ),
    ))(input)
}

/// Decodes UTF-8 text into 16-bit code units, one per code point.
pub fn utf16_code_units(text: &str) -> Result<Vec<u16>> {
    let mut input = text.as_bytes();
    let mut code_units = Vec::with_capacity(input.len());
    while !input.is_empty() {
        let (remaining, value) = code_point(input).map_err(|_| Error::MalformedUtf8)?;
        let code_unit = u16::try_from(value).map_err(|_| Error::CodePointOutOfRange(value))?;
        code_units.push(code_unit);
        input = remaining;
    }
    Ok(code_units)
}

/// Chooses the representation for a string. Any byte with the high bit set
/// requires the 16-bit representation.
pub fn encode_string(text: &str) -> Result<EncodedString<'_>> {
    match AsciiStr::from_ascii(text.as_bytes()) {
        Ok(ascii) => Ok(EncodedString::Ascii(ascii)),
        Err(_) => utf16_code_units(text).map(EncodedString::Utf16),
    }
}
