//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

use std;
use std::fmt::{self, Display};

use serde::ser;

pub type Result<T> = std::result::Result<T, Error>;

/// Binary property list serialization error.
///
/// Every error is fatal to the encode call which raised it. No partial
/// document is ever produced.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// Constructed from serialization errors and opaque value serializers.
    Message(String),
    /// An integer does not fit in a signed 128-bit value.
    IntegerOutOfRange,
    /// A string contains a code point outside the Basic Multilingual Plane.
    CodePointOutOfRange(u32),
    /// An integer was packed at a width other than 1, 2, 4, 8 or 16 bytes,
    /// or at a width too narrow to hold it.
    InvalidWidth(usize),
    /// A negative integer was packed at one of the unsigned widths (1, 2 or 4 bytes).
    NegativeUnsigned(usize),
    /// A dictionary key cannot be represented as a string. Carries the kind of the key.
    KeyNotCoercible(&'static str),
    /// A dictionary holds the same key more than once, after coercion to a string.
    DuplicateKey(String),
    /// Encountered a reference to an object not in the property list being encoded.
    InvalidObjectReference,
    /// The UTF-8 decoder rejected a byte sequence.
    MalformedUtf8,
}

impl ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Message(msg) =>
                formatter.write_str(msg),
            Error::IntegerOutOfRange =>
                formatter.write_str("integer too big - exceeds 128 bits"),
            Error::CodePointOutOfRange(code_point) =>
                write!(formatter, "code point U+{:X} is outside the basic multilingual plane", code_point),
            Error::InvalidWidth(width) =>
                write!(formatter, "invalid integer width of {} bytes", width),
            Error::NegativeUnsigned(width) =>
                write!(formatter, "negative integers cannot be stored in {} bytes", width),
            Error::KeyNotCoercible(kind) =>
                write!(formatter, "dictionary key of kind {} cannot be coerced to a string", kind),
            Error::DuplicateKey(key) =>
                write!(formatter, "duplicate dictionary key {:?}", key),
            Error::InvalidObjectReference =>
                formatter.write_str("invalid reference to object not in property list"),
            Error::MalformedUtf8 =>
                formatter.write_str("malformed UTF-8 sequence"),
        }
    }
}

impl std::error::Error for Error {}
