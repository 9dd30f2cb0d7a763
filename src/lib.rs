//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

mod error;
mod ser;

pub mod document;
pub mod object;
pub use object::{Date, Integer, ObjectId, Opaque, Plist, Value};

pub use ser::{encode, min_byte_size, pack_int, to_plist, to_vec, Serializer};
pub use error::{Error, Result};
