//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

use crate::document::{ObjectFormat, EXTENDED_COUNT, MAX_INLINE_COUNT};
use crate::error::Result;
use crate::object::{Date, Integer, Value};
use crate::ser::flatten::FlatObject;
use crate::ser::writer::unicode::{self, EncodedString};
use crate::ser::writer::utils::{min_byte_size, pack_int, width_class};

/// Writes a marker whose value bits hold a payload count.
///
/// Counts up to `MAX_INLINE_COUNT` are stored in the marker itself. Larger counts
/// set the value bits to `EXTENDED_COUNT` and are followed by an integer object.
fn counted_marker(format: ObjectFormat, count: usize, output: &mut Vec<u8>) -> Result<()> {
    debug_assert!(format.is_counted(), "{:?} does not carry a count", format);
    if count <= MAX_INLINE_COUNT {
        output.push(format.tag_bits() | count as u8);
        Ok(())
    } else {
        output.push(format.tag_bits() | EXTENDED_COUNT);
        integer(count.into(), output)
    }
}

/// Writes the null object.
pub fn null(output: &mut Vec<u8>) {
    output.push(ObjectFormat::Null.tag_bits());
}

/// Writes a boolean object, with the value in the low bit of the marker.
pub fn boolean(value: bool, output: &mut Vec<u8>) {
    output.push(ObjectFormat::Boolean.tag_bits() | value as u8);
}

/// Writes an integer object at the smallest width able to hold it.
pub fn integer(value: Integer, output: &mut Vec<u8>) -> Result<()> {
    let width = min_byte_size(value)?;
    output.push(ObjectFormat::Integer.tag_bits() | width_class(width)?);
    pack_int(value, width, output)
}

/// Writes a double-precision floating point object.
pub fn real(value: f64, output: &mut Vec<u8>) {
    output.push(ObjectFormat::Float64.tag_bits());
    output.extend_from_slice(&value.to_be_bytes());
}

/// Writes a date object as a CFAbsoluteTime value.
pub fn date(value: Date, output: &mut Vec<u8>) {
    output.push(ObjectFormat::Date.tag_bits());
    output.extend_from_slice(&value.absolute_time.into_inner().to_be_bytes());
}

/// Writes a data object.
pub fn data(bytes: &[u8], output: &mut Vec<u8>) -> Result<()> {
    counted_marker(ObjectFormat::Data, bytes.len(), output)?;
    output.extend_from_slice(bytes);
    Ok(())
}

/// Writes a string object, as ASCII if possible and as 16-bit code units otherwise.
/// The count is the number of bytes or code units respectively.
pub fn string(text: &str, output: &mut Vec<u8>) -> Result<ObjectFormat> {
    match unicode::encode_string(text)? {
        EncodedString::Ascii(ascii) => {
            counted_marker(ObjectFormat::AsciiString, ascii.len(), output)?;
            output.extend_from_slice(ascii.as_bytes());
            Ok(ObjectFormat::AsciiString)
        }
        EncodedString::Utf16(code_units) => {
            counted_marker(ObjectFormat::Utf16String, code_units.len(), output)?;
            for code_unit in code_units {
                output.extend_from_slice(&code_unit.to_be_bytes());
            }
            Ok(ObjectFormat::Utf16String)
        }
    }
}

/// Writes an array or set object as a count followed by object references.
fn references(
    format: ObjectFormat,
    objects: &[usize],
    object_reference_size: usize,
    output: &mut Vec<u8>,
) -> Result<()> {
    counted_marker(format, objects.len(), output)?;
    for &object in objects {
        pack_int(object, object_reference_size, output)?;
    }
    Ok(())
}

/// Writes a dictionary object as a count, the key references, then the value references.
fn dictionary(
    keys: &[usize],
    values: &[usize],
    object_reference_size: usize,
    output: &mut Vec<u8>,
) -> Result<()> {
    debug_assert_eq!(keys.len(), values.len(), "unbalanced dictionary");
    counted_marker(ObjectFormat::Dictionary, keys.len(), output)?;
    for &object in keys.iter().chain(values) {
        pack_int(object, object_reference_size, output)?;
    }
    Ok(())
}

/// Writes a scalar value borrowed from the property list.
fn scalar(value: &Value, output: &mut Vec<u8>) -> Result<ObjectFormat> {
    match value {
        Value::Null => {
            null(output);
            Ok(ObjectFormat::Null)
        }
        Value::Boolean(value) => {
            boolean(*value, output);
            Ok(ObjectFormat::Boolean)
        }
        Value::Integer(value) => {
            integer(*value, output)?;
            Ok(ObjectFormat::Integer)
        }
        Value::Real(value) => {
            real(value.into_inner(), output);
            Ok(ObjectFormat::Float64)
        }
        Value::Date(value) => {
            date(*value, output);
            Ok(ObjectFormat::Date)
        }
        Value::Data(bytes) => {
            data(bytes, output)?;
            Ok(ObjectFormat::Data)
        }
        Value::String(text) =>
            string(text, output),
        Value::Opaque(opaque) => {
            data(&opaque.serialize_opaque()?, output)?;
            Ok(ObjectFormat::Data)
        }
        Value::Array(_) | Value::Set(_) | Value::Dictionary(_) =>
            unreachable!("containers are replaced by reference lists when flattened"),
    }
}

/// Writes one entry of the object table and returns the format of the marker written.
pub fn object(
    object: &FlatObject,
    object_reference_size: usize,
    output: &mut Vec<u8>,
) -> Result<ObjectFormat> {
    match object {
        FlatObject::Scalar(value) =>
            scalar(value, output),
        FlatObject::Key(text) =>
            string(text, output),
        FlatObject::Array(objects) => {
            references(ObjectFormat::Array, objects, object_reference_size, output)?;
            Ok(ObjectFormat::Array)
        }
        FlatObject::Set(objects) => {
            references(ObjectFormat::Set, objects, object_reference_size, output)?;
            Ok(ObjectFormat::Set)
        }
        FlatObject::Dictionary { keys, values } => {
            dictionary(keys, values, object_reference_size, output)?;
            Ok(ObjectFormat::Dictionary)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{boolean, data, date, integer, object, real, string};
    use crate::error::{Error, Result};
    use crate::object::{Date, Integer, Opaque, Value};
    use crate::ser::flatten::FlatObject;

    fn written<F: FnOnce(&mut Vec<u8>) -> Result<()>>(write: F) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        write(&mut output).map(|_| output)
    }

    #[derive(Debug)]
    struct Regex;

    impl Opaque for Regex {
        fn serialize_opaque(&self) -> Result<Vec<u8>> {
            Ok(b"\x04\x08/\x09narf\x00".to_vec())
        }
    }

    #[derive(Debug)]
    struct Unserializable;

    impl Opaque for Unserializable {
        fn serialize_opaque(&self) -> Result<Vec<u8>> {
            Err(Error::Message("no dump for this value".into()))
        }
    }

    #[test]
    fn test_ascii_string() {
        assert_eq!(written(|o| string("Hello World", o).map(|_| ())), Ok(b"\x5BHello World".to_vec()));
    }

    #[test]
    fn test_ascii_string_extended_count() {
        let mut expected = b"\x5F\x10\x1B".to_vec();
        expected.extend_from_slice(b"Domo-kun's Angry Smash Fest");
        assert_eq!(written(|o| string("Domo-kun's Angry Smash Fest", o).map(|_| ())), Ok(expected));
    }

    #[test]
    fn test_unicode_string() {
        assert_eq!(
            written(|o| string("好きだ", o).map(|_| ())),
            Ok(vec![0x63, 0x59, 0x7D, 0x30, 0x4D, 0x30, 0x60])
        );
        assert_eq!(
            written(|o| string("señora", o).map(|_| ())),
            Ok(vec![0x66, 0x00, 0x73, 0x00, 0x65, 0x00, 0xF1, 0x00, 0x6F, 0x00, 0x72, 0x00, 0x61])
        );
        assert_eq!(written(|o| string("𝄢", o).map(|_| ())), Err(Error::CodePointOutOfRange(0x1D122)));
    }

    #[test]
    fn test_scalars() {
        let mut expected = vec![0x23];
        expected.extend_from_slice(&3.14159f64.to_be_bytes());
        assert_eq!(written(|o| Ok(real(3.14159, o))), Ok(expected));

        assert_eq!(written(|o| Ok(boolean(true, o))), Ok(vec![0x09]));
        assert_eq!(written(|o| Ok(boolean(false, o))), Ok(vec![0x08]));
        assert_eq!(
            written(|o| Ok(date(Date::from_unix_seconds(123.0), o))),
            Ok(vec![0x33, 0xC1, 0xCD, 0x27, 0xE4, 0x02, 0x80, 0x00, 0x00])
        );
    }

    #[test]
    fn test_integers() {
        assert_eq!(written(|o| integer(Integer::from(123), o)), Ok(vec![0x10, 0x7B]));
        assert_eq!(written(|o| integer(Integer::from(32000), o)), Ok(vec![0x11, 0x7D, 0x00]));
        assert_eq!(
            written(|o| integer(Integer::from(-1), o)),
            Ok(vec![0x13, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF])
        );
        assert_eq!(written(|o| integer(Integer::from(u64::max_value()), o)).map(|b| b[0]), Ok(0x14));
        assert_eq!(
            written(|o| integer(Integer::from(u128::max_value()), o)),
            Err(Error::IntegerOutOfRange)
        );
    }

    #[test]
    fn test_data() {
        assert_eq!(written(|o| data(b"helloworld", o)), Ok(b"\x4Ahelloworld".to_vec()));

        let payload = vec![b'x'; 32000];
        let mut expected = vec![0x4F, 0x11, 0x7D, 0x00];
        expected.extend_from_slice(&payload);
        assert_eq!(written(|o| data(&payload, o)), Ok(expected));
    }

    #[test]
    fn test_data_of_fifteen_bytes_uses_extended_count() {
        let payload = [0u8; 15];
        let encoded = written(|o| data(&payload, o)).unwrap();
        assert_eq!(&encoded[.. 3], &[0x4F, 0x10, 0x0F]);
        assert_eq!(encoded.len(), 18);
    }

    #[test]
    fn test_opaque() {
        let value = Value::Opaque(Box::new(Regex));
        assert_eq!(
            written(|o| object(&FlatObject::Scalar(&value), 1, o).map(|_| ())),
            Ok(b"\x49\x04\x08/\x09narf\x00".to_vec())
        );

        let value = Value::Opaque(Box::new(Unserializable));
        assert_eq!(
            written(|o| object(&FlatObject::Scalar(&value), 1, o).map(|_| ())),
            Err(Error::Message("no dump for this value".into()))
        );
    }

    #[test]
    fn test_arrays() {
        let three = FlatObject::Array(vec![1, 2, 3]);
        assert_eq!(written(|o| object(&three, 1, o).map(|_| ())), Ok(vec![0xA3, 0x01, 0x02, 0x03]));
        assert_eq!(
            written(|o| object(&three, 2, o).map(|_| ())),
            Ok(vec![0xA3, 0x00, 0x01, 0x00, 0x02, 0x00, 0x03])
        );

        let sixteen = FlatObject::Array((1 ..= 16).collect());
        let mut expected = vec![0xAF, 0x10, 0x10];
        expected.extend(1 ..= 16u8);
        assert_eq!(written(|o| object(&sixteen, 1, o).map(|_| ())), Ok(expected));
    }

    #[test]
    fn test_sets() {
        let set = FlatObject::Set(vec![3, 1, 2]);
        assert_eq!(written(|o| object(&set, 1, o).map(|_| ())), Ok(vec![0xC3, 0x03, 0x01, 0x02]));
        assert_eq!(
            written(|o| object(&set, 2, o).map(|_| ())),
            Ok(vec![0xC3, 0x00, 0x03, 0x00, 0x01, 0x00, 0x02])
        );
    }

    #[test]
    fn test_dictionaries() {
        let pairs = FlatObject::Dictionary { keys: vec![1, 3], values: vec![2, 4] };
        assert_eq!(
            written(|o| object(&pairs, 1, o).map(|_| ())),
            Ok(vec![0xD2, 0x01, 0x03, 0x02, 0x04])
        );
        assert_eq!(
            written(|o| object(&pairs, 2, o).map(|_| ())),
            Ok(vec![0xD2, 0x00, 0x01, 0x00, 0x03, 0x00, 0x02, 0x00, 0x04])
        );

        let sixteen = FlatObject::Dictionary {
            keys: (0 .. 16).collect(),
            values: (16 .. 32).collect(),
        };
        let mut expected = vec![0xDF, 0x10, 0x10];
        expected.extend(0 .. 32u8);
        assert_eq!(written(|o| object(&sixteen, 1, o).map(|_| ())), Ok(expected));
    }
}
