//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

use crate::document::{
    Trailer,
    HEADER_MAGIC_NUMBER,
    HEADER_VERSION_00,
    TRAILER_PREAMBLE_UNUSED_SIZE,
};
use crate::error::Result;
use crate::ser::writer::utils::pack_int;

/// Writes the fixed-sized 8-byte header of a version 00 document.
pub fn header(output: &mut Vec<u8>) {
    let (version_major, version_minor) = HEADER_VERSION_00;
    output.extend_from_slice(HEADER_MAGIC_NUMBER);
    output.push(version_major);
    output.push(version_minor);
}

/// Writes an offset table, each entry of the specified size.
pub fn offset_table(offsets: &[usize], entry_size: usize, output: &mut Vec<u8>) -> Result<()> {
    for &offset in offsets {
        pack_int(offset, entry_size, output)?;
    }
    Ok(())
}

/// Writes the fixed-sized 32-byte trailer.
pub fn trailer(trailer: &Trailer, output: &mut Vec<u8>) -> Result<()> {
    output.extend_from_slice(&[0; TRAILER_PREAMBLE_UNUSED_SIZE]);
    output.push(trailer.sort_version);
    pack_int(trailer.offset_table_entry_size, 1, output)?;
    pack_int(trailer.object_reference_size, 1, output)?;
    pack_int(trailer.number_of_objects, 8, output)?;
    pack_int(trailer.root_object, 8, output)?;
    pack_int(trailer.offset_table_offset, 8, output)
}
