//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The bplist document format.
//!
//! Constants and structures defined in this module represent the various
//! sections of a binary property list document.
//!
//! A bplist document is organized into four segments:
//!
//! 1. Header
//! 2. Object Table
//! 3. Offset Table
//! 4. Trailer
//!
//! # References
//!
//! 1. https://github.com/opensource-apple/CF/blob/master/ForFoundationOnly.h
//! 2. https://opensource.apple.com/source/CF/CF-855.17/CFBinaryPList.c

/// The number of bytes of data required to define a bplist header.
pub const HEADER_SIZE: usize = 8;

/// The bplist magic number ("bplist").
pub const HEADER_MAGIC_NUMBER: &[u8] = &[ 0x62, 0x70, 0x6C, 0x69, 0x73, 0x74 ];

/// The bplist version 00 identifier ("00").
pub const HEADER_VERSION_00: (u8, u8) = (0x30, 0x30);

/// The largest payload count which fits in the value bits of a marker byte.
/// Larger counts set the value bits to `0b1111` and follow the marker with an integer object.
pub const MAX_INLINE_COUNT: usize = 14;

/// Value bits signalling that an integer object holding the payload count follows the marker.
pub const EXTENDED_COUNT: u8 = 0b0000_1111;

/// Binary property list object wire format, as written by the encoder.
///
/// Each object consists of a marker byte and zero or more bytes of additional data.
/// The marker byte is comprised of 'tag' bits, which specify its format, and up to
/// four bits of embedded value data.
///
/// # Notes
/// 1. All values are stored in network byte order (big endian).
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum ObjectFormat {
    /// The null object.
    Null,
    /// A 1-bit boolean literal value.
    Boolean,
    /// An integer whose width class (1, 2, 4, 8 or 16 bytes) is carried in the value bits.
    Integer,
    /// A double-precision 64-bit floating point value.
    Float64,
    /// A 64-bit double-precision CFAbsoluteTime value.
    Date,
    /// An arbitrary set of bytes.
    Data,
    /// A 7-bit ASCII string.
    AsciiString,
    /// A string of 16-bit code units.
    Utf16String,
    /// An array of object references.
    Array,
    /// An unordered set of object references.
    Set,
    /// A dictionary, stored as a block of key references followed by a block of value references.
    Dictionary,
}

impl ObjectFormat {

    /// Uniquely identifies the object format in the tag bits of a marker byte.
    pub fn tag_bits(self) -> u8 {
        use ObjectFormat::*;
        match self {
            Null =>
                0b0000_0000,
            Boolean =>
                0b0000_1000,
            Integer =>
                0b0001_0000,
            Float64 =>
                0b0010_0011,
            Date =>
                0b0011_0011,
            Data =>
                0b0100_0000,
            AsciiString =>
                0b0101_0000,
            Utf16String =>
                0b0110_0000,
            Array =>
                0b1010_0000,
            Set =>
                0b1100_0000,
            Dictionary =>
                0b1101_0000,
        }
    }

    /// Whether the value bits of the marker carry a payload count.
    pub fn is_counted(self) -> bool {
        use ObjectFormat::*;
        match self {
            Null | Boolean | Integer | Float64 | Date =>
                false,
            Data | AsciiString | Utf16String | Array | Set | Dictionary =>
                true,
        }
    }

}

/// The number of bytes of data required to define a bplist trailer.
pub const TRAILER_SIZE: usize = 32;

/// The number of unused bytes in the trailer preamble.
pub const TRAILER_PREAMBLE_UNUSED_SIZE: usize = 5;

/// Binary property list trailer.
///
/// The trailer contains information necessary to interpret the preceding
/// document, particularly the size of variably-sized offsets and references.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
pub struct Trailer {
    /// The sort version.
    pub sort_version: u8,
    /// Number of bytes needed for each offset table entry.
    pub offset_table_entry_size: usize,
    /// Number of bytes needed for each object reference in a container.
    pub object_reference_size: usize,
    /// Number of objects encoded in the document.
    pub number_of_objects: usize,
    /// Element id of the root object.
    pub root_object: usize,
    /// Offset into the file denoting the start of the offset table.
    pub offset_table_offset: usize,
}
