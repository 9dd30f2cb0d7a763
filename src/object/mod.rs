//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The bplist object model.
//!
//! Values are stored in a `Plist` arena and refer to one another through
//! `ObjectId` handles. The handle is the identity of a value: two containers
//! holding the same `ObjectId` share a single object in the encoded document,
//! whereas two distinct nodes with equal content are encoded twice. Because
//! containers hold handles rather than values, a container may contain itself,
//! directly or through other containers.
//!
//! The bplist format version 00 written by this crate supports the following
//! object kinds:
//!
//! 1. Null.
//! 2. Boolean.
//! 3. Integers, up to 128 bits long.
//! 4. Real, double-precision.
//! 5. Date.
//! 6. Data.
//! 7. String, ASCII or 16-bit Unicode.
//! 8. Array.
//! 9. Set.
//! 10. Dictionary.
//!
//! # Example
//!
//! ```
//! use bplist_writer::{Plist, Value};
//!
//! let mut plist = Plist::new();
//! let name = plist.insert("name");
//! let value = plist.insert("bplist");
//! let root = plist.insert(Value::Dictionary(vec![(name, value)]));
//! let bytes = plist.encode(root).unwrap();
//! assert_eq!(&bytes[0 .. 8], b"bplist00");
//! ```
//!
//! # References
//!
//! 1. https://github.com/opensource-apple/CF/blob/master/ForFoundationOnly.h
//! 2. https://opensource.apple.com/source/CF/CF-855.17/CFBinaryPList.c

mod integer;

pub use integer::Integer;

use ordered_float::OrderedFloat;

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Result;

/// Seconds between the POSIX epoch (1970-01-01T00:00:00Z) and the Core Data Epoch.
pub const UNIX_EPOCH_ABSOLUTE_TIME: f64 = 978_307_200.0;

/// A date structure roughly equivalent to an `NSDate`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Date {
    /// A double-precision 64-bit offset, in seconds, from the Core Data Epoch.
    /// This is defined as 1 January 2001, 00:00:00 UTC.
    pub absolute_time: OrderedFloat<f64>,
}

impl Date {

    /// Returns a date the given number of seconds after the Core Data Epoch.
    pub fn from_absolute_time(seconds: f64) -> Self {
        Date {
            absolute_time: OrderedFloat::from(seconds),
        }
    }

    /// Returns a date the given number of seconds after the POSIX epoch.
    pub fn from_unix_seconds(seconds: f64) -> Self {
        Date::from_absolute_time(seconds - UNIX_EPOCH_ABSOLUTE_TIME)
    }

}

impl From<SystemTime> for Date {
    fn from(time: SystemTime) -> Self {
        let unix_seconds = match time.duration_since(UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_secs_f64(),
            Err(before) => -before.duration().as_secs_f64(),
        };
        Date::from_unix_seconds(unix_seconds)
    }
}

/// A host value the object model does not cover.
///
/// The encoder hands such values to `serialize_opaque` and stores the
/// resulting bytes as a data object.
pub trait Opaque: fmt::Debug {
    /// Produces the byte representation of the value.
    fn serialize_opaque(&self) -> Result<Vec<u8>>;
}

/// A handle to a value stored in a `Plist`.
///
/// Handles are only meaningful for the `Plist` which issued them.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct ObjectId(usize);

impl ObjectId {
    /// The arena slot of the value.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Represents any value which can be written into a bplist document.
#[derive(Debug)]
pub enum Value {
    /// Represents the bplist null object.
    Null,

    /// Represents a bplist boolean, like `NSNumber`.
    Boolean(bool),

    /// Represents a bplist integral value of up to 128 bits, like `NSNumber`.
    Integer(Integer),

    /// Represents a bplist floating-point value, like `NSNumber`.
    Real(OrderedFloat<f64>),

    /// Represents a bplist date, like `NSDate`.
    Date(Date),

    /// Represents a bplist data instance, like `NSData`.
    Data(Vec<u8>),

    /// Represents a bplist string, like `NSString`.
    String(String),

    /// Represents a bplist array of objects, like `NSArray<id>`.
    Array(Vec<ObjectId>),

    /// Represents a bplist set of objects, like `NSSet<id>`.
    ///
    /// Membership is by identity. Members are written in the order given here.
    Set(Vec<ObjectId>),

    /// Represents a bplist dictionary, like `NSDictionary<NSString*,id>`.
    ///
    /// Entries are written in the order given here. Keys which are not strings
    /// are coerced to strings when encoded if they are integers, reals or booleans.
    Dictionary(Vec<(ObjectId, ObjectId)>),

    /// A value outside the object model, written as data.
    Opaque(Box<dyn Opaque>),
}

impl Value {

    /// A short name for the kind of value, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Date(_) => "date",
            Value::Data(_) => "data",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Set(_) => "set",
            Value::Dictionary(_) => "dictionary",
            Value::Opaque(_) => "opaque",
        }
    }

}

/// Compares content. Opaque values are only equal to themselves.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Real(a), Value::Real(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Data(a), Value::Data(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Dictionary(a), Value::Dictionary(b)) => a == b,
            (Value::Opaque(a), Value::Opaque(b)) =>
                std::ptr::eq(
                    &**a as *const dyn Opaque as *const (),
                    &**b as *const dyn Opaque as *const ()
                ),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<Integer> for Value {
    fn from(value: Integer) -> Self {
        Value::Integer(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value.into())
    }
}

impl From<Date> for Value {
    fn from(value: Date) -> Self {
        Value::Date(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

/// An arena owning a graph of values.
#[derive(Debug, Default)]
pub struct Plist {
    objects: Vec<Value>,
}

impl Plist {

    /// Returns an empty property list.
    pub fn new() -> Self {
        Plist::default()
    }

    /// Stores a value and returns its handle.
    pub fn insert<V: Into<Value>>(&mut self, value: V) -> ObjectId {
        self.objects.push(value.into());
        ObjectId(self.objects.len() - 1)
    }

    /// Returns the value for a handle, if it was issued by this property list.
    pub fn get(&self, id: ObjectId) -> Option<&Value> {
        self.objects.get(id.0)
    }

    /// Returns the value for a handle mutably, for example to make a container contain itself.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Value> {
        self.objects.get_mut(id.0)
    }

    /// The number of values stored, reachable from a given root or not.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Encodes the graph reachable from `root` as a bplist00 document.
    pub fn encode(&self, root: ObjectId) -> Result<Vec<u8>> {
        crate::ser::encode(self, root)
    }

}

#[cfg(test)]
mod tests {
    use super::{Date, Plist, Value};

    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_date_from_unix_seconds() {
        assert_eq!(Date::from_unix_seconds(978_307_200.0), Date::from_absolute_time(0.0));
        assert_eq!(Date::from_unix_seconds(123.0).absolute_time.into_inner(), -978_307_077.0);
    }

    #[test]
    fn test_date_from_system_time() {
        let after = UNIX_EPOCH + Duration::from_secs(978_307_210);
        assert_eq!(Date::from(after), Date::from_absolute_time(10.0));

        let before = UNIX_EPOCH - Duration::from_secs(100);
        assert_eq!(Date::from(before), Date::from_absolute_time(-978_307_300.0));
    }

    #[test]
    fn test_self_containing_array() {
        let mut plist = Plist::new();
        let array = plist.insert(Value::Array(vec![]));
        if let Some(Value::Array(items)) = plist.get_mut(array) {
            items.push(array);
        }
        match plist.get(array) {
            Some(Value::Array(items)) => assert_eq!(items, &vec![array]),
            other => panic!("unexpected value {:?}", other),
        }
    }
}
