//! Top-level shape of an argument value
//!
//! Only a real tuple is a list of arguments. `Vec`, slices, tuple structs
//! and `Option` all serialize to JSON arrays or null too, so the shape has to
//! be read from the serializer call rather than from the JSON value.
//! Fixed-size arrays serialize through `serialize_tuple` and so spread like
//! tuples.

use serde::ser::{self, Serialize};
use std::fmt;

/// How a value spreads over positional arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    /// `()`: no arguments
    Unit,
    /// `(a, b, ..)`: one argument per element
    Tuple,
    /// Anything else is a single argument
    Single,
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub(crate) struct ShapeError(String);

impl ser::Error for ShapeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        ShapeError(msg.to_string())
    }
}

/// Classify `value` without serializing its contents
pub(crate) fn shape_of<A: Serialize + ?Sized>(value: &A) -> Result<Shape, ShapeError> {
    value.serialize(ShapeReader)
}

struct ShapeReader;

/// Compound serializer that ignores its elements and reports a fixed shape
struct Fixed(Shape);

macro_rules! single {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method(self, _: $ty) -> Result<Shape, ShapeError> {
                Ok(Shape::Single)
            }
        )*
    };
}

impl ser::Serializer for ShapeReader {
    type Ok = Shape;
    type Error = ShapeError;
    type SerializeSeq = Fixed;
    type SerializeTuple = Fixed;
    type SerializeTupleStruct = Fixed;
    type SerializeTupleVariant = Fixed;
    type SerializeMap = Fixed;
    type SerializeStruct = Fixed;
    type SerializeStructVariant = Fixed;

    single!(
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_f32(f32),
        serialize_f64(f64),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
        serialize_unit_struct(&'static str),
    );

    fn serialize_none(self) -> Result<Shape, ShapeError> {
        Ok(Shape::Single)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, _: &T) -> Result<Shape, ShapeError> {
        Ok(Shape::Single)
    }

    fn serialize_unit(self) -> Result<Shape, ShapeError> {
        Ok(Shape::Unit)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
    ) -> Result<Shape, ShapeError> {
        Ok(Shape::Single)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _value: &T,
    ) -> Result<Shape, ShapeError> {
        Ok(Shape::Single)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Shape, ShapeError> {
        Ok(Shape::Single)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Fixed, ShapeError> {
        Ok(Fixed(Shape::Single))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Fixed, ShapeError> {
        Ok(Fixed(Shape::Tuple))
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Fixed, ShapeError> {
        Ok(Fixed(Shape::Single))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Fixed, ShapeError> {
        Ok(Fixed(Shape::Single))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Fixed, ShapeError> {
        Ok(Fixed(Shape::Single))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Fixed, ShapeError> {
        Ok(Fixed(Shape::Single))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Fixed, ShapeError> {
        Ok(Fixed(Shape::Single))
    }
}

impl ser::SerializeSeq for Fixed {
    type Ok = Shape;
    type Error = ShapeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, _: &T) -> Result<(), ShapeError> {
        Ok(())
    }

    fn end(self) -> Result<Shape, ShapeError> {
        Ok(self.0)
    }
}

impl ser::SerializeTuple for Fixed {
    type Ok = Shape;
    type Error = ShapeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, _: &T) -> Result<(), ShapeError> {
        Ok(())
    }

    fn end(self) -> Result<Shape, ShapeError> {
        Ok(self.0)
    }
}

impl ser::SerializeTupleStruct for Fixed {
    type Ok = Shape;
    type Error = ShapeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _: &T) -> Result<(), ShapeError> {
        Ok(())
    }

    fn end(self) -> Result<Shape, ShapeError> {
        Ok(self.0)
    }
}

impl ser::SerializeTupleVariant for Fixed {
    type Ok = Shape;
    type Error = ShapeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _: &T) -> Result<(), ShapeError> {
        Ok(())
    }

    fn end(self) -> Result<Shape, ShapeError> {
        Ok(self.0)
    }
}

impl ser::SerializeMap for Fixed {
    type Ok = Shape;
    type Error = ShapeError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, _: &T) -> Result<(), ShapeError> {
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, _: &T) -> Result<(), ShapeError> {
        Ok(())
    }

    fn end(self) -> Result<Shape, ShapeError> {
        Ok(self.0)
    }
}

impl ser::SerializeStruct for Fixed {
    type Ok = Shape;
    type Error = ShapeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        _: &T,
    ) -> Result<(), ShapeError> {
        Ok(())
    }

    fn end(self) -> Result<Shape, ShapeError> {
        Ok(self.0)
    }
}

impl ser::SerializeStructVariant for Fixed {
    type Ok = Shape;
    type Error = ShapeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        _: &T,
    ) -> Result<(), ShapeError> {
        Ok(())
    }

    fn end(self) -> Result<Shape, ShapeError> {
        Ok(self.0)
    }
}
