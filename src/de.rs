//! BML deserialization.
//!
//! Unlike a text format with its own data model, BML reaches serde through
//! the [node tree](crate::node): text is parsed into a [`Document`] first and
//! the [`Deserializer`] then walks borrowed nodes. Strings are handed to the
//! visitor borrowed from the tree, so `&str` fields work with
//! [`from_document`] and [`from_node`].
//!
//! ## Reading Rules
//!
//! - Struct fields are looked up by name, and a name containing `/` is
//!   resolved as a path from the struct's node
//! - A field with no matching node reads as its zero value: `None`, `0`,
//!   `0.0`, `false`, an empty string or an empty `Vec`. A nested struct
//!   reads every field that way. Enums and `char` have no zero value, so a
//!   missing one is a missing field error. `#[serde(default)]` is never
//!   consulted because every declared field is always produced
//! - Scalars read the trimmed node value. A boolean is `true` only for the
//!   literal `true`; an empty numeric value reads as zero
//! - A `Vec` field collects every sibling sharing the field's name
//! - Maps iterate the node's children in order, keyed by child name
//!
//! ```rust
//! use serde_bml::from_str;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Settings {
//!     #[serde(rename = "Video/Driver")]
//!     driver: String,
//!     #[serde(rename = "Video/Multiplier")]
//!     multiplier: u32,
//!     #[serde(rename = "Audio/Mute")]
//!     mute: Option<bool>,
//! }
//!
//! let settings: Settings = from_str("Video\n  Driver: Metal\n  Multiplier: 2").unwrap();
//! assert_eq!(
//!     settings,
//!     Settings { driver: "Metal".into(), multiplier: 2, mute: None }
//! );
//! ```

use crate::{Document, Error, Node, Result};
use serde::de::value::BorrowedStrDeserializer;
use serde::de::{self, Deserialize, IntoDeserializer};

/// Stands in for a struct field that has no node.
static ABSENT: Node = Node {
    name: String::new(),
    value: String::new(),
    children: Vec::new(),
};

/// Deserializes Rust values from a borrowed [`Node`].
pub struct Deserializer<'de> {
    node: &'de Node,
    /// Later siblings sharing `node`'s name, consumed by sequences.
    rest: Vec<&'de Node>,
    /// Set to the field name when no node matched it.
    missing: Option<&'static str>,
}

impl<'de> Deserializer<'de> {
    pub fn new(node: &'de Node) -> Self {
        Deserializer {
            node,
            rest: Vec::new(),
            missing: None,
        }
    }

    fn absent(field: &'static str) -> Self {
        Deserializer {
            node: &ABSENT,
            rest: Vec::new(),
            missing: Some(field),
        }
    }

    fn text(&self) -> &'de str {
        self.node.value.trim()
    }

    fn mismatch(&self, expected: &str) -> Error {
        Error::type_mismatch(&self.node.name, expected, &self.node.value)
    }

    fn parse_signed(&self) -> Result<i64> {
        match self.text() {
            "" => Ok(0),
            text => text.parse().map_err(|_| self.mismatch("integer")),
        }
    }

    fn parse_unsigned(&self) -> Result<u64> {
        match self.text() {
            "" => Ok(0),
            text => text.parse().map_err(|_| self.mismatch("unsigned integer")),
        }
    }

    fn parse_float(&self) -> Result<f64> {
        match self.text() {
            "" => Ok(0.0),
            text => text.parse().map_err(|_| self.mismatch("float")),
        }
    }
}

/// Deserializes an instance of `T` from a node and its descendants.
///
/// # Examples
///
/// ```rust
/// use serde_bml::{from_node, parse};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Video<'a> {
///     #[serde(rename = "Driver")]
///     driver: &'a str,
/// }
///
/// let doc = parse("Video\n  Driver: Metal").unwrap();
/// let video: Video = from_node(doc.get("Video").unwrap()).unwrap();
/// assert_eq!(video.driver, "Metal");
/// ```
///
/// # Errors
///
/// Fails when a value cannot be read as the requested type, or when an
/// enum or `char` field has no node.
pub fn from_node<'de, T>(node: &'de Node) -> Result<T>
where
    T: Deserialize<'de>,
{
    T::deserialize(Deserializer::new(node))
}

/// Deserializes an instance of `T` from the top level of a document.
///
/// # Errors
///
/// See [`from_node`].
pub fn from_document<'de, T>(document: &'de Document) -> Result<T>
where
    T: Deserialize<'de>,
{
    from_node(document.root())
}

impl<'de> de::Deserializer<'de> for Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.missing.is_some() {
            visitor.visit_unit()
        } else if self.node.is_leaf() {
            visitor.visit_borrowed_str(self.text())
        } else {
            self.deserialize_map(visitor)
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_bool(self.text() == "true")
    }

    fn deserialize_i8<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_i64(visitor)
    }

    fn deserialize_i16<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_i64(visitor)
    }

    fn deserialize_i32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_i64(visitor)
    }

    fn deserialize_i64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_i64(self.parse_signed()?)
    }

    fn deserialize_u8<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_u64(visitor)
    }

    fn deserialize_u16<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_u64(visitor)
    }

    fn deserialize_u32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_u64(visitor)
    }

    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_u64(self.parse_unsigned()?)
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_f64(visitor)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_f64(self.parse_float()?)
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if let Some(field) = self.missing {
            return Err(de::Error::missing_field(field));
        }
        let mut chars = self.text().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(self.mismatch("single character")),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_borrowed_str(self.text())
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type("byte arrays"))
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.missing.is_some() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let mut nodes = Vec::with_capacity(self.rest.len() + 1);
        if self.missing.is_none() {
            nodes.push(self.node);
            nodes.extend(self.rest);
        }
        visitor.visit_seq(SiblingAccess {
            nodes: nodes.into_iter(),
        })
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_map(ChildrenAccess {
            children: self.node.children.iter(),
            value: None,
        })
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_map(FieldAccess {
            node: self.node,
            fields: fields.iter(),
            pending: None,
        })
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if let Some(field) = self.missing {
            return Err(de::Error::missing_field(field));
        }
        match self.node.children.as_slice() {
            [] => visitor.visit_enum(self.text().into_deserializer()),
            [child] => visitor.visit_enum(ChildVariant { child }),
            _ => Err(self.mismatch("enum variant")),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

/// Same-name siblings read as sequence elements.
struct SiblingAccess<'de> {
    nodes: std::vec::IntoIter<&'de Node>,
}

impl<'de> de::SeqAccess<'de> for SiblingAccess<'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.nodes.next() {
            Some(node) => seed.deserialize(Deserializer::new(node)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.nodes.len())
    }
}

/// Children read as map entries keyed by name.
struct ChildrenAccess<'de> {
    children: std::slice::Iter<'de, Node>,
    value: Option<&'de Node>,
}

impl<'de> de::MapAccess<'de> for ChildrenAccess<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.children.next() {
            Some(child) => {
                self.value = Some(child);
                seed.deserialize(BorrowedStrDeserializer::new(child.name.as_str()))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        let child = self
            .value
            .take()
            .ok_or_else(|| Error::custom("value requested before key"))?;
        seed.deserialize(Deserializer::new(child))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.children.len())
    }
}

/// Struct fields resolved as paths. Every declared field is produced, with
/// an empty match list for fields that have no node.
struct FieldAccess<'de> {
    node: &'de Node,
    fields: std::slice::Iter<'static, &'static str>,
    pending: Option<(&'static str, Vec<&'de Node>)>,
}

impl<'de> de::MapAccess<'de> for FieldAccess<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.fields.next() {
            Some(&field) => {
                self.pending = Some((field, self.node.get_all(field)));
                seed.deserialize(field.into_deserializer()).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        let (field, matches) = self
            .pending
            .take()
            .ok_or_else(|| Error::custom("value requested before key"))?;
        let mut matches = matches.into_iter();
        match matches.next() {
            Some(node) => seed.deserialize(Deserializer {
                node,
                rest: matches.collect(),
                missing: None,
            }),
            None => seed.deserialize(Deserializer::absent(field)),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }
}

/// An enum written as a single child named after its variant.
struct ChildVariant<'de> {
    child: &'de Node,
}

impl<'de> de::EnumAccess<'de> for ChildVariant<'de> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(BorrowedStrDeserializer::<Error>::new(
            self.child.name.as_str(),
        ))?;
        Ok((variant, self))
    }
}

impl<'de> de::VariantAccess<'de> for ChildVariant<'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(Deserializer::new(self.child))
    }

    fn tuple_variant<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type("tuple variants"))
    }

    fn struct_variant<V>(self, fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_struct(Deserializer::new(self.child), "", fields, visitor)
    }
}
