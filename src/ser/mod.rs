//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

mod date;
mod flatten;
mod value;
mod writer;

use log::{debug, trace};

use crate::document::Trailer;
use crate::error::Result;
use crate::object::{ObjectId, Plist};

pub use value::{to_plist, to_vec, Serializer};
pub use writer::utils::{min_byte_size, pack_int};

/// Encodes the graph reachable from `root` as a bplist00 document.
///
/// The document is produced in a single pass:
///
/// 1. The graph is flattened into an object table with the root at index 0.
/// 2. The reference size is chosen to fit the largest object index.
/// 3. The header and each object are written, recording object offsets.
/// 4. The offset table is written with entries sized to fit the largest offset.
/// 5. The trailer is written.
pub fn encode(plist: &Plist, root: ObjectId) -> Result<Vec<u8>> {
    let table = flatten::flatten(plist, root)?;
    let object_reference_size = min_byte_size(table.len() - 1)?;

    let mut output = Vec::new();
    writer::document::header(&mut output);

    let mut offsets = Vec::with_capacity(table.len());
    for (index, object) in table.iter().enumerate() {
        let offset = output.len();
        let format = writer::object::object(object, object_reference_size, &mut output)?;
        trace!("wrote object {} as {:?} at offset {}", index, format, offset);
        offsets.push(offset);
    }

    let offset_table_offset = output.len();
    let offset_table_entry_size = min_byte_size(offset_table_offset)?;
    writer::document::offset_table(&offsets, offset_table_entry_size, &mut output)?;

    writer::document::trailer(&Trailer {
        sort_version: 0,
        offset_table_entry_size,
        object_reference_size,
        number_of_objects: table.len(),
        root_object: 0,
        offset_table_offset,
    }, &mut output)?;

    debug!(
        "encoded {} objects in {} bytes (reference size {}, offset size {})",
        table.len(),
        output.len(),
        object_reference_size,
        offset_table_entry_size
    );

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::encode;
    use crate::document::{HEADER_SIZE, TRAILER_SIZE};
    use crate::error::Error;
    use crate::object::{Plist, Value};

    /// Reads a big-endian unsigned value out of the trailer.
    fn trailer_field(document: &[u8], offset: usize, size: usize) -> usize {
        let start = document.len() - TRAILER_SIZE + offset;
        document[start .. start + size].iter().fold(0, |acc, x| (acc << 8) | *x as usize)
    }

    #[test]
    fn test_encode_string_root() {
        let mut plist = Plist::new();
        let root = plist.insert("hello");
        assert_eq!(
            encode(&plist, root),
            Ok(b"bplist00\x55hello\x08\x00\x00\x00\x00\x00\x00\x01\x01\
                \x00\x00\x00\x00\x00\x00\x00\x01\
                \x00\x00\x00\x00\x00\x00\x00\x00\
                \x00\x00\x00\x00\x00\x00\x00\x0E".to_vec())
        );
    }

    #[test]
    fn test_encode_wide_references() {
        let mut plist = Plist::new();
        let elements = (0 .. 300).map(|i| plist.insert(i as i64)).collect();
        let root = plist.insert(Value::Array(elements));

        let document = encode(&plist, root).unwrap();
        assert_eq!(trailer_field(&document, 7, 1), 2);
        assert_eq!(trailer_field(&document, 8, 8), 301);
        assert_eq!(trailer_field(&document, 16, 8), 0);

        // Array marker with an extended count of 300, then two-byte references.
        let array = &document[HEADER_SIZE ..];
        assert_eq!(&array[.. 6], &[0xAF, 0x11, 0x01, 0x2C, 0x00, 0x01]);
    }

    #[test]
    fn test_encode_wide_offsets() {
        let mut plist = Plist::new();
        let root = plist.insert(Value::Data(vec![0; 300]));

        let document = encode(&plist, root).unwrap();
        let offset_table_offset = trailer_field(&document, 24, 8);
        assert_eq!(offset_table_offset, HEADER_SIZE + 4 + 300);
        assert_eq!(trailer_field(&document, 6, 1), 2);
        assert_eq!(&document[offset_table_offset .. offset_table_offset + 2], &[0x00, 0x08]);
        assert_eq!(document.len(), offset_table_offset + 2 + TRAILER_SIZE);
    }

    #[test]
    fn test_encode_extended_count_utf16_string() {
        let mut plist = Plist::new();
        let root = plist.insert("é".repeat(15));

        let document = encode(&plist, root).unwrap();
        assert_eq!(&document[HEADER_SIZE .. HEADER_SIZE + 5], &[0x6F, 0x10, 0x0F, 0x00, 0xE9]);
        assert_eq!(trailer_field(&document, 24, 8), HEADER_SIZE + 3 + 30);
    }

    #[test]
    fn test_encode_extended_count_set() {
        let mut plist = Plist::new();
        let members = (0 .. 15).map(|i| plist.insert(i as i64)).collect();
        let root = plist.insert(Value::Set(members));

        let document = encode(&plist, root).unwrap();
        assert_eq!(trailer_field(&document, 8, 8), 16);
        assert_eq!(&document[HEADER_SIZE .. HEADER_SIZE + 5], &[0xCF, 0x10, 0x0F, 0x01, 0x02]);
        assert_eq!(document[HEADER_SIZE + 3 + 14], 0x0F);
    }

    #[test]
    fn test_encode_extended_count_dictionary() {
        let mut plist = Plist::new();
        let entries = (0 .. 15)
            .map(|i| (plist.insert(format!("k{}", i)), plist.insert(i as i64)))
            .collect::<Vec<_>>();
        let root = plist.insert(Value::Dictionary(entries));

        let document = encode(&plist, root).unwrap();
        assert_eq!(trailer_field(&document, 8, 8), 31);
        // Keys and values are visited in turn, so keys take the odd indices.
        assert_eq!(&document[HEADER_SIZE .. HEADER_SIZE + 5], &[0xDF, 0x10, 0x0F, 0x01, 0x03]);
        assert_eq!(&document[HEADER_SIZE + 3 + 15 .. HEADER_SIZE + 3 + 17], &[0x02, 0x04]);
    }

    #[test]
    fn test_encode_rejects_duplicate_key() {
        let mut plist = Plist::new();
        let key = plist.insert("k");
        let a = plist.insert("a");
        let b = plist.insert("b");
        let root = plist.insert(Value::Dictionary(vec![(key, a), (key, b)]));
        assert_eq!(encode(&plist, root), Err(Error::DuplicateKey("k".into())));
    }

    #[test]
    fn test_encode_aborts_on_error() {
        let mut plist = Plist::new();
        let good = plist.insert("fine");
        let bad = plist.insert("𝄢");
        let root = plist.insert(Value::Array(vec![good, bad]));
        assert_eq!(encode(&plist, root), Err(Error::CodePointOutOfRange(0x1D122)));
    }
}
