//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

use serde::ser::{self, Serialize};

use crate::error::{Error, Result};
use crate::object::{Date, Integer, ObjectId, Plist, Value};
use crate::ser::date;

/// Serializes any supported type into a binary property list document.
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    let mut plist = Plist::new();
    let root = to_plist(&mut plist, value)?;
    plist.encode(root)
}

/// Serializes any supported type into nodes of an existing property list
/// and returns the handle of the top-level value.
///
/// Every value produced this way is a distinct node; nothing is shared.
pub fn to_plist<T>(plist: &mut Plist, value: &T) -> Result<ObjectId>
where
    T: ?Sized + Serialize,
{
    value.serialize(Serializer::new(plist))
}

/// A serde serializer which stores values as nodes of a `Plist`.
///
/// # Notes
///
/// 1. Unit values, unit structs and `None` are stored as null.
/// 2. Unit variants are stored as the variant name.
/// 3. Other enum variants are stored as a single-entry dictionary keyed by the variant name.
/// 4. Structures are stored as dictionaries with fields in declaration order.
#[derive(Debug)]
pub struct Serializer<'a> {
    plist: &'a mut Plist,
}

impl<'a> Serializer<'a> {
    /// Designated initializer for a serializer storing values into `plist`.
    pub fn new(plist: &'a mut Plist) -> Self {
        Serializer { plist }
    }
}

/// Stores a single-entry dictionary mapping a variant name to its content.
fn variant_entry(plist: &mut Plist, variant: &'static str, content: ObjectId) -> ObjectId {
    let key = plist.insert(variant);
    plist.insert(Value::Dictionary(vec![(key, content)]))
}

impl<'a> ser::Serializer for Serializer<'a> {
    type Ok = ObjectId;
    type Error = Error;

    type SerializeSeq = SeqSerializer<'a>;
    type SerializeTuple = SeqSerializer<'a>;
    type SerializeTupleStruct = SeqSerializer<'a>;
    type SerializeTupleVariant = TupleVariantSerializer<'a>;
    type SerializeMap = MapSerializer<'a>;
    type SerializeStruct = StructSerializer<'a>;
    type SerializeStructVariant = StructVariantSerializer<'a>;

    fn serialize_bool(self, v: bool) -> Result<ObjectId> {
        Ok(self.plist.insert(v))
    }

    fn serialize_i8(self, v: i8) -> Result<ObjectId> {
        Ok(self.plist.insert(Integer::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<ObjectId> {
        Ok(self.plist.insert(Integer::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<ObjectId> {
        Ok(self.plist.insert(Integer::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<ObjectId> {
        Ok(self.plist.insert(Integer::from(v)))
    }

    fn serialize_i128(self, v: i128) -> Result<ObjectId> {
        Ok(self.plist.insert(Integer::from(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<ObjectId> {
        Ok(self.plist.insert(Integer::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<ObjectId> {
        Ok(self.plist.insert(Integer::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<ObjectId> {
        Ok(self.plist.insert(Integer::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<ObjectId> {
        Ok(self.plist.insert(Integer::from(v)))
    }

    fn serialize_u128(self, v: u128) -> Result<ObjectId> {
        Ok(self.plist.insert(Integer::from(v)))
    }

    fn serialize_f32(self, v: f32) -> Result<ObjectId> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<ObjectId> {
        Ok(self.plist.insert(v))
    }

    fn serialize_char(self, v: char) -> Result<ObjectId> {
        Ok(self.plist.insert(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<ObjectId> {
        Ok(self.plist.insert(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<ObjectId> {
        Ok(self.plist.insert(Value::Data(v.into())))
    }

    fn serialize_none(self) -> Result<ObjectId> {
        Ok(self.plist.insert(Value::Null))
    }

    fn serialize_some<T>(self, value: &T) -> Result<ObjectId>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<ObjectId> {
        Ok(self.plist.insert(Value::Null))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<ObjectId> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<ObjectId> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<ObjectId>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<ObjectId>
    where
        T: ?Sized + Serialize,
    {
        let content = value.serialize(Serializer::new(&mut *self.plist))?;
        Ok(variant_entry(self.plist, variant, content))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqSerializer<'a>> {
        Ok(SeqSerializer {
            plist: self.plist,
            elements: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqSerializer<'a>> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SeqSerializer<'a>> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<TupleVariantSerializer<'a>> {
        Ok(TupleVariantSerializer {
            variant,
            elements: self.serialize_seq(Some(len))?,
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapSerializer<'a>> {
        Ok(MapSerializer {
            plist: self.plist,
            entries: Vec::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> Result<StructSerializer<'a>> {
        if name == date::STRUCT_NAME {
            Ok(StructSerializer::Date {
                plist: self.plist,
                absolute_time: None,
            })
        } else {
            self.serialize_map(Some(len)).map(StructSerializer::Fields)
        }
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<StructVariantSerializer<'a>> {
        Ok(StructVariantSerializer {
            variant,
            fields: self.serialize_map(Some(len))?,
        })
    }
}

/// Collects the elements of sequences and tuples into an array.
#[derive(Debug)]
pub struct SeqSerializer<'a> {
    plist: &'a mut Plist,
    elements: Vec<ObjectId>,
}

impl<'a> SeqSerializer<'a> {
    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let element = value.serialize(Serializer::new(&mut *self.plist))?;
        self.elements.push(element);
        Ok(())
    }

    fn finish(self) -> (&'a mut Plist, ObjectId) {
        let array = self.plist.insert(Value::Array(self.elements));
        (self.plist, array)
    }
}

impl<'a> ser::SerializeSeq for SeqSerializer<'a> {
    type Ok = ObjectId;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<ObjectId> {
        Ok(self.finish().1)
    }
}

impl<'a> ser::SerializeTuple for SeqSerializer<'a> {
    type Ok = ObjectId;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<ObjectId> {
        Ok(self.finish().1)
    }
}

impl<'a> ser::SerializeTupleStruct for SeqSerializer<'a> {
    type Ok = ObjectId;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<ObjectId> {
        Ok(self.finish().1)
    }
}

/// Collects the fields of a tuple variant into an array keyed by the variant name.
#[derive(Debug)]
pub struct TupleVariantSerializer<'a> {
    variant: &'static str,
    elements: SeqSerializer<'a>,
}

impl<'a> ser::SerializeTupleVariant for TupleVariantSerializer<'a> {
    type Ok = ObjectId;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.elements.push(value)
    }

    fn end(self) -> Result<ObjectId> {
        let (plist, array) = self.elements.finish();
        Ok(variant_entry(plist, self.variant, array))
    }
}

/// Collects the entries of a map, in insertion order, into a dictionary.
#[derive(Debug)]
pub struct MapSerializer<'a> {
    plist: &'a mut Plist,
    entries: Vec<(ObjectId, ObjectId)>,
    next_key: Option<ObjectId>,
}

impl<'a> MapSerializer<'a> {
    fn field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self.plist.insert(key);
        let value = value.serialize(Serializer::new(&mut *self.plist))?;
        self.entries.push((key, value));
        Ok(())
    }

    fn finish(self) -> (&'a mut Plist, ObjectId) {
        let dictionary = self.plist.insert(Value::Dictionary(self.entries));
        (self.plist, dictionary)
    }
}

impl<'a> ser::SerializeMap for MapSerializer<'a> {
    type Ok = ObjectId;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.next_key = Some(key.serialize(Serializer::new(&mut *self.plist))?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self.next_key.take().ok_or_else(|| {
            Error::Message("map value serialized before its key".into())
        })?;
        let value = value.serialize(Serializer::new(&mut *self.plist))?;
        self.entries.push((key, value));
        Ok(())
    }

    fn end(self) -> Result<ObjectId> {
        Ok(self.finish().1)
    }
}

/// Collects the fields of a structure into a dictionary, or captures a `Date`.
#[derive(Debug)]
pub enum StructSerializer<'a> {
    /// The private `Date` structure.
    Date {
        plist: &'a mut Plist,
        absolute_time: Option<ObjectId>,
    },
    /// Any other structure.
    Fields(MapSerializer<'a>),
}

impl<'a> ser::SerializeStruct for StructSerializer<'a> {
    type Ok = ObjectId;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match self {
            StructSerializer::Date { plist, absolute_time } => {
                if key != date::STRUCT_FIELD {
                    return Err(Error::Message(format!("unexpected date field `{}`", key)));
                }
                *absolute_time = Some(value.serialize(Serializer::new(&mut **plist))?);
                Ok(())
            }
            StructSerializer::Fields(fields) =>
                fields.field(key, value),
        }
    }

    fn end(self) -> Result<ObjectId> {
        match self {
            // The real number node holding the absolute time becomes the date.
            StructSerializer::Date { plist, absolute_time: Some(node) } => {
                let value = plist.get_mut(node).ok_or(Error::InvalidObjectReference)?;
                match *value {
                    Value::Real(seconds) => {
                        *value = Value::Date(Date::from_absolute_time(seconds.into_inner()));
                        Ok(node)
                    }
                    _ => Err(Error::Message("date field is not a real number".into())),
                }
            }
            StructSerializer::Date { absolute_time: None, .. } =>
                Err(Error::Message("date field missing".into())),
            StructSerializer::Fields(fields) =>
                Ok(fields.finish().1),
        }
    }
}

/// Collects the fields of a struct variant into a dictionary keyed by the variant name.
#[derive(Debug)]
pub struct StructVariantSerializer<'a> {
    variant: &'static str,
    fields: MapSerializer<'a>,
}

impl<'a> ser::SerializeStructVariant for StructVariantSerializer<'a> {
    type Ok = ObjectId;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.fields.field(key, value)
    }

    fn end(self) -> Result<ObjectId> {
        let (plist, dictionary) = self.fields.finish();
        Ok(variant_entry(plist, self.variant, dictionary))
    }
}
