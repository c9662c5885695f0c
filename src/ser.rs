//! BML serialization.
//!
//! This module has two halves:
//!
//! - [`Serializer`] writes a node tree as BML text
//! - [`to_document`] builds a node tree from any `T: Serialize`
//!
//! ## Output Format
//!
//! Output is canonical rather than a copy of the input's syntax. Every node
//! is written on its own line with a colon value; inline attributes and
//! `=` values read from a file come back as indented `Name: value` lines.
//! Values containing newlines are written as continuation lines:
//!
//! ```rust
//! use serde_bml::parse;
//!
//! let doc = parse("Game title=\"Star Fox\"\n  Notes: one\n    : two").unwrap();
//! assert_eq!(
//!     doc.to_string(),
//!     "Game\n  title: Star Fox\n  Notes\n    : one\n    : two\n"
//! );
//! ```
//!
//! ## Mapping Rust Values
//!
//! - Struct fields and map entries become child nodes, in declaration order
//! - `bool`, integers, floats, chars and strings become values; floats use the
//!   shortest text that reads back as the same number
//! - `None` fields are omitted
//! - Sequences become repeated siblings sharing the field name
//! - Unit enum variants become their name; newtype and struct variants become
//!   a single child named after the variant
//! - A field renamed to a path such as `"Video/Driver"` is placed under the
//!   intermediate nodes, which are shared with other fields on the same path
//! - Strings are written unchanged as colon values, so a string containing
//!   `//` reads back cut short at the `//`: `"http://x"` returns as `"http:"`

use crate::parser::is_valid_name;
use crate::{BmlOptions, Document, Error, Node, Result};
use serde::ser::{self, Impossible, Serialize};
use tracing::trace;

/// Writes node trees as BML text.
///
/// # Examples
///
/// ```rust
/// use serde_bml::{BmlOptions, Node, Serializer};
///
/// let mut video = Node::new("Video");
/// video.set("Driver", "Metal");
///
/// let mut serializer = Serializer::new(BmlOptions::default());
/// serializer.serialize_node(&video, 0);
/// assert_eq!(serializer.into_inner(), "Video\n  Driver: Metal\n");
/// ```
pub struct Serializer {
    output: String,
    options: BmlOptions,
}

impl Serializer {
    pub fn new(options: BmlOptions) -> Self {
        Serializer {
            output: String::with_capacity(256),
            options,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Writes every top-level node. The root itself is not written, so an
    /// empty document produces no output at all.
    pub fn serialize_document(&mut self, document: &Document) {
        for node in document.children() {
            self.serialize_node(node, 0);
        }
        trace!(bytes = self.output.len(), "serialized document");
    }

    /// Writes `node` at `depth` followed by its descendants.
    pub fn serialize_node(&mut self, node: &Node, depth: usize) {
        self.write_indent(depth);
        self.output.push_str(&node.name);

        if node.value.is_empty() {
            self.output.push('\n');
        } else if node.value.contains('\n') {
            self.output.push('\n');
            for line in node.value.split('\n') {
                self.write_indent(depth + 1);
                self.output.push_str(": ");
                self.output.push_str(line);
                self.output.push('\n');
            }
        } else {
            self.output.push_str(": ");
            self.output.push_str(&node.value);
            self.output.push('\n');
        }

        for child in &node.children {
            self.serialize_node(child, depth + 1);
        }
    }

    #[inline]
    fn write_indent(&mut self, depth: usize) {
        let width = depth * self.options.indent.max(1);
        self.output.extend(std::iter::repeat(' ').take(width));
    }
}

/// Builds a [`Document`] from a struct or map.
///
/// # Examples
///
/// ```rust
/// use serde_bml::to_document;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Settings {
///     #[serde(rename = "Video/Driver")]
///     driver: String,
///     #[serde(rename = "Video/Multiplier")]
///     multiplier: u32,
/// }
///
/// let doc = to_document(&Settings { driver: "Metal".into(), multiplier: 2 }).unwrap();
/// assert_eq!(doc.get("Video/Multiplier").unwrap().value, "2");
/// assert_eq!(doc.children().len(), 1);
/// ```
///
/// # Errors
///
/// Fails if the top-level value is not a struct or map, if a key is not a
/// valid node name, or if the value contains a type BML cannot express.
pub fn to_document<T>(value: &T) -> Result<Document>
where
    T: ?Sized + Serialize,
{
    match value.serialize(NodeSerializer)? {
        Fragment::Branch(children) => Ok(Document::from(Node {
            children,
            ..Node::root()
        })),
        _ => Err(Error::unsupported_type(
            "top-level value must be a struct or map",
        )),
    }
}

/// The tree shape produced by one serialized Rust value.
pub enum Fragment {
    /// Omitted entirely (`None`).
    Absent,
    Leaf(String),
    Branch(Vec<Node>),
    /// One sibling per element.
    Repeated(Vec<Fragment>),
}

/// Places `fragment` under `parent` at the path `key`.
fn attach(parent: &mut Node, key: &str, fragment: Fragment) -> Result<()> {
    let segments: Vec<&str> = key.split('/').filter(|s| !s.is_empty()).collect();
    let Some((name, parents)) = segments.split_last() else {
        return Err(Error::invalid_key(key));
    };
    if !segments.iter().all(|segment| is_valid_name(segment)) {
        return Err(Error::invalid_key(key));
    }
    if matches!(fragment, Fragment::Absent) {
        return Ok(());
    }

    let parent = parents
        .iter()
        .fold(parent, |node, segment| node.child_or_insert(segment));
    append_fragment(parent, name, fragment);
    Ok(())
}

fn append_fragment(parent: &mut Node, name: &str, fragment: Fragment) {
    match fragment {
        Fragment::Absent => {}
        Fragment::Leaf(value) => {
            parent.append(Node::with_value(name, value));
        }
        Fragment::Branch(children) => {
            parent.append(Node {
                children,
                ..Node::new(name)
            });
        }
        Fragment::Repeated(items) => {
            for item in items {
                append_fragment(parent, name, item);
            }
        }
    }
}

/// Serde serializer producing [`Fragment`]s.
pub struct NodeSerializer;

impl ser::Serializer for NodeSerializer {
    type Ok = Fragment;
    type Error = Error;

    type SerializeSeq = SeqSerializer;
    type SerializeTuple = SeqSerializer;
    type SerializeTupleStruct = SeqSerializer;
    type SerializeTupleVariant = Impossible<Fragment, Error>;
    type SerializeMap = BranchSerializer;
    type SerializeStruct = BranchSerializer;
    type SerializeStructVariant = VariantSerializer;

    fn serialize_bool(self, v: bool) -> Result<Fragment> {
        Ok(Fragment::Leaf(v.to_string()))
    }

    fn serialize_i8(self, v: i8) -> Result<Fragment> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Fragment> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Fragment> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Fragment> {
        Ok(Fragment::Leaf(v.to_string()))
    }

    fn serialize_u8(self, v: u8) -> Result<Fragment> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Fragment> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Fragment> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Fragment> {
        Ok(Fragment::Leaf(v.to_string()))
    }

    // f32 is formatted on its own so that 0.1f32 stays "0.1".
    fn serialize_f32(self, v: f32) -> Result<Fragment> {
        Ok(Fragment::Leaf(v.to_string()))
    }

    fn serialize_f64(self, v: f64) -> Result<Fragment> {
        Ok(Fragment::Leaf(v.to_string()))
    }

    fn serialize_char(self, v: char) -> Result<Fragment> {
        Ok(Fragment::Leaf(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Fragment> {
        Ok(Fragment::Leaf(v.to_string()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Fragment> {
        Err(Error::unsupported_type("byte arrays"))
    }

    fn serialize_none(self) -> Result<Fragment> {
        Ok(Fragment::Absent)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Fragment>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Fragment> {
        Ok(Fragment::Leaf(String::new()))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Fragment> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Fragment> {
        Ok(Fragment::Leaf(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Fragment>
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
    ) -> Result<Fragment>
    where
        T: ?Sized + Serialize,
    {
        let mut holder = Node::root();
        attach(&mut holder, variant, value.serialize(NodeSerializer)?)?;
        Ok(Fragment::Branch(holder.children))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqSerializer> {
        Ok(SeqSerializer {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqSerializer> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SeqSerializer> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::unsupported_type("tuple variants"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<BranchSerializer> {
        Ok(BranchSerializer::new())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<BranchSerializer> {
        Ok(BranchSerializer::new())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<VariantSerializer> {
        if !is_valid_name(variant) {
            return Err(Error::invalid_key(variant));
        }
        Ok(VariantSerializer {
            variant,
            fields: BranchSerializer::new(),
        })
    }
}

pub struct SeqSerializer {
    items: Vec<Fragment>,
}

impl ser::SerializeSeq for SeqSerializer {
    type Ok = Fragment;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(value.serialize(NodeSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Fragment> {
        Ok(Fragment::Repeated(self.items))
    }
}

impl ser::SerializeTuple for SeqSerializer {
    type Ok = Fragment;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Fragment> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SeqSerializer {
    type Ok = Fragment;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Fragment> {
        ser::SerializeSeq::end(self)
    }
}

/// Collects struct fields or map entries as children of a detached node.
pub struct BranchSerializer {
    node: Node,
    current_key: Option<String>,
}

impl BranchSerializer {
    fn new() -> Self {
        BranchSerializer {
            node: Node::root(),
            current_key: None,
        }
    }
}

impl ser::SerializeMap for BranchSerializer {
    type Ok = Fragment;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match key.serialize(NodeSerializer)? {
            Fragment::Leaf(key) => {
                self.current_key = Some(key);
                Ok(())
            }
            _ => Err(Error::custom("Map keys must be strings or numbers")),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        attach(&mut self.node, &key, value.serialize(NodeSerializer)?)
    }

    fn end(self) -> Result<Fragment> {
        Ok(Fragment::Branch(self.node.children))
    }
}

impl ser::SerializeStruct for BranchSerializer {
    type Ok = Fragment;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        attach(&mut self.node, key, value.serialize(NodeSerializer)?)
    }

    fn end(self) -> Result<Fragment> {
        Ok(Fragment::Branch(self.node.children))
    }
}

pub struct VariantSerializer {
    variant: &'static str,
    fields: BranchSerializer,
}

impl ser::SerializeStructVariant for VariantSerializer {
    type Ok = Fragment;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeStruct::serialize_field(&mut self.fields, key, value)
    }

    fn end(self) -> Result<Fragment> {
        let variant = Node {
            children: self.fields.node.children,
            ..Node::new(self.variant)
        };
        Ok(Fragment::Branch(vec![variant]))
    }
}
