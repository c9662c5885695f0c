//! # serde_bml
//!
//! A parser, tree model and Serde bridge for BML, the small indentation-based
//! markup used for emulator and application settings files.
//!
//! ## What is BML?
//!
//! BML files are trees of named nodes. Indentation expresses nesting, each
//! node may carry a string value, and short children can be written inline
//! as attributes:
//!
//! ```text
//! // settings.bml
//! Video
//!   Driver: Metal
//!   Multiplier: 2
//!   Output width=256 height=224
//! Audio mute
//! ```
//!
//! See the [`format`] module for the complete syntax.
//!
//! ## Key Features
//!
//! - **Tree API**: Read and edit settings through `/`-separated paths
//! - **Forgiving Lookups**: Typed accessors take a fallback and never fail,
//!   even when the node is missing
//! - **Serde Compatible**: Bind settings to `#[derive(Serialize, Deserialize)]`
//!   structs, with `#[serde(rename = "Video/Driver")]` reaching into subtrees
//! - **No Unsafe Code**: Written entirely in safe Rust
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! serde_bml = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Reading and Editing a Document
//!
//! ```rust
//! use serde_bml::{parse, Lookup};
//!
//! let mut doc = parse("Video\n  Driver: OpenGL\n  Multiplier: 2").unwrap();
//!
//! assert_eq!(doc.get("Video/Driver").string_or("None"), "OpenGL");
//! assert_eq!(doc.get("Video/Multiplier").int_or(1), 2);
//! assert!(!doc.get("Audio/Mute").bool_or(false));
//!
//! doc.set("Video/Driver", "Metal");
//! doc.root_mut().set_bool("Audio/Mute", true);
//!
//! assert_eq!(
//!     doc.to_string(),
//!     "Video\n  Driver: Metal\n  Multiplier: 2\nAudio\n  Mute: true\n"
//! );
//! ```
//!
//! ### Binding Structs
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_bml::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Settings {
//!     #[serde(rename = "Video/Driver")]
//!     driver: String,
//!     #[serde(rename = "Video/Multiplier")]
//!     multiplier: u32,
//!     #[serde(rename = "Audio/Volume")]
//!     volume: Option<f64>,
//! }
//!
//! let settings = Settings {
//!     driver: "Metal".to_string(),
//!     multiplier: 2,
//!     volume: None,
//! };
//!
//! let text = to_string(&settings).unwrap();
//! assert_eq!(text, "Video\n  Driver: Metal\n  Multiplier: 2\n");
//!
//! let back: Settings = from_str(&text).unwrap();
//! assert_eq!(settings, back);
//! ```
//!
//! ### Building Documents with bml!
//!
//! ```rust
//! use serde_bml::bml;
//!
//! let doc = bml!({
//!     "Video": { "Driver": "Metal", "Multiplier": 2 }
//! });
//! assert_eq!(doc.to_string(), "Video\n  Driver: Metal\n  Multiplier: 2\n");
//! ```
//!
//! ## Logging
//!
//! Parsing and serialization emit [`tracing`](https://docs.rs/tracing) events
//! at `debug` and `trace` level. The library never installs a subscriber.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - Parse, query and modify a settings file
//! - **`settings.rs`** - Load and save a typed settings struct
//! - **`macro.rs`** - Building documents with the bml! macro
//! - **`custom_options.rs`** - Changing output indentation
//!
//! Run any example with: `cargo run --example <name>`

pub mod de;
pub mod error;
pub mod format;
pub mod macros;
pub mod node;
pub mod options;
pub mod parser;
pub mod scanner;
pub mod ser;

pub use de::{from_document, from_node, Deserializer};
pub use error::{Error, Result};
pub use node::{Document, Lookup, LookupMut, Node};
pub use options::BmlOptions;
pub use parser::parse;
pub use ser::{to_document, Serializer};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Parses BML from bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 or not valid BML.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_slice(v: &[u8]) -> Result<Document> {
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    parse(s)
}

/// Serialize any `T: Serialize` to a BML string.
///
/// # Examples
///
/// ```rust
/// use serde_bml::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Output { width: u32, height: u32 }
///
/// let text = to_string(&Output { width: 256, height: 224 }).unwrap();
/// assert_eq!(text, "width: 256\nheight: 224\n");
/// ```
///
/// # Errors
///
/// Returns an error if the value is not a struct or map, or contains a type
/// BML cannot express.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, BmlOptions::default())
}

/// Serialize any `T: Serialize` to a BML string with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_bml::{to_string_with_options, BmlOptions};
/// use std::collections::BTreeMap;
///
/// let mut video = BTreeMap::new();
/// video.insert("Driver", "Metal");
/// let mut settings = BTreeMap::new();
/// settings.insert("Video", video);
///
/// let text = to_string_with_options(&settings, BmlOptions::new().with_indent(4)).unwrap();
/// assert_eq!(text, "Video\n    Driver: Metal\n");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: BmlOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let document = to_document(value)?;
    let mut serializer = Serializer::new(options);
    serializer.serialize_document(&document);
    Ok(serializer.into_inner())
}

/// Serialize any `T: Serialize` to a writer in BML format.
///
/// # Examples
///
/// ```rust
/// use serde_bml::to_writer;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Audio { #[serde(rename = "Mute")] mute: bool }
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &Audio { mute: true }).unwrap();
/// assert_eq!(buffer, b"Mute: true\n");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, BmlOptions::default())
}

/// Serialize any `T: Serialize` to a writer in BML format with custom options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: BmlOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string_with_options(value, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserialize an instance of type `T` from a string of BML text.
///
/// The text is parsed into a [`Document`] first, so `T` cannot borrow from
/// it. Use [`parse`] with [`from_document`] to deserialize borrowed strings.
///
/// # Examples
///
/// ```rust
/// use serde_bml::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Output { width: u32, height: u32 }
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Video {
///     #[serde(rename = "Output")]
///     output: Output,
/// }
///
/// let video: Video = from_str("Output width=256 height=224").unwrap();
/// assert_eq!(video.output, Output { width: 256, height: 224 });
/// ```
///
/// # Errors
///
/// Returns an error if the input is not valid BML or cannot be deserialized
/// to type `T`. Syntax errors carry the line number.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let document = parse(s)?;
    from_document(&document)
}

/// Deserialize an instance of type `T` from an I/O stream of BML.
///
/// # Examples
///
/// ```rust
/// use serde_bml::from_reader;
/// use serde::Deserialize;
/// use std::io::Cursor;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Audio { #[serde(rename = "Mute")] mute: bool }
///
/// let cursor = Cursor::new(b"Mute: true\n");
/// let audio: Audio = from_reader(cursor).unwrap();
/// assert!(audio.mute);
/// ```
///
/// # Errors
///
/// Returns an error if reading from the reader fails, the input is not valid
/// BML, or the data cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Deserialize an instance of type `T` from bytes of BML text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not valid BML, or
/// cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Video {
        #[serde(rename = "Driver")]
        driver: String,
        #[serde(rename = "Multiplier")]
        multiplier: u32,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Settings {
        #[serde(rename = "Video")]
        video: Video,
        #[serde(rename = "Paths/Rom")]
        roms: Vec<String>,
    }

    fn settings() -> Settings {
        Settings {
            video: Video {
                driver: "Metal".to_string(),
                multiplier: 2,
            },
            roms: vec!["a.sfc".to_string(), "b.sfc".to_string()],
        }
    }

    #[test]
    fn test_serialize_deserialize_settings() {
        let text = to_string(&settings()).unwrap();
        assert_eq!(
            text,
            "Video\n  Driver: Metal\n  Multiplier: 2\nPaths\n  Rom: a.sfc\n  Rom: b.sfc\n"
        );
        let back: Settings = from_str(&text).unwrap();
        assert_eq!(back, settings());
    }

    #[test]
    fn test_writer_and_reader() {
        let mut buffer = Vec::new();
        to_writer_with_options(&mut buffer, &settings(), BmlOptions::new().with_indent(1)).unwrap();
        assert!(buffer.starts_with(b"Video\n Driver: Metal\n"));
        let back: Settings = from_reader(buffer.as_slice()).unwrap();
        assert_eq!(back, settings());
    }

    #[test]
    fn test_from_slice_rejects_invalid_utf8() {
        let err = from_slice::<Video>(&[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, Error::Custom(_)));
        assert!(matches!(parse_slice(b"\xff"), Err(Error::Custom(_))));
    }

    #[test]
    fn test_parse_slice() {
        let doc = parse_slice(b"Video\r\n  Driver: Metal\r\n").unwrap();
        assert_eq!(doc.get("Video/Driver").string_or(""), "Metal");
    }

    #[test]
    fn test_syntax_error_surfaces_from_str() {
        let err = from_str::<Video>("Driver=\"Metal").unwrap_err();
        assert!(err.is_syntax());
    }
}
