//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! Serde does not provide a Date or Time type.
//! As such, the binary plist Date type is presented to serializers as a structure
//! with a special name and a single field holding the absolute time, similar to the
//! way the TOML crate approaches it. The bplist serializer recognizes the name and
//! writes a date object; other serializers see an ordinary structure.

use serde::ser::{self, SerializeStruct};

use crate::object::Date;

/// Name of the Date structure.
pub const STRUCT_NAME: &str = "$__bplist_private_Date";

/// Name of the field in the structure.
pub const STRUCT_FIELD: &str = "$__bplist_private_Date_absolute_time";

impl ser::Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        let mut state = serializer.serialize_struct(STRUCT_NAME, 1)?;
        state.serialize_field(STRUCT_FIELD, &self.absolute_time.into_inner())?;
        state.end()
    }
}
