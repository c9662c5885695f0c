//! The BML text format
//!
//! This module documents the format as read by [`parse`](crate::parse) and
//! written by [`Serializer`](crate::Serializer).
//!
//! # Overview
//!
//! BML is a line-oriented settings format. Each significant line holds one
//! node; nesting is expressed only through indentation.
//!
//! ```text
//! // emulator settings
//! Video
//!   Driver: Metal
//!   Multiplier: 2
//!   Output width=256 height=224
//! Audio mute
//! ```
//!
//! # Lines
//!
//! - `\n`, `\r\n` and `\r` are all line breaks
//! - Blank and whitespace-only lines are ignored
//! - A line whose first non-whitespace characters are `//` is a comment
//! - Leading spaces and tabs count one level each towards the line's depth
//!
//! # Nesting
//!
//! A line becomes a child of the nearest preceding line with a smaller depth.
//! Depths do not have to step evenly:
//!
//! ```text
//! A
//!     B        // child of A
//!   C          // also a child of A
//! D            // top level
//! ```
//!
//! Mixing tabs and spaces is accepted but each character weighs the same, so
//! a tab is *not* a wider indent.
//!
//! # Node Names
//!
//! Names are one or more of `A-Z`, `a-z`, `0-9`, `-` and `.`. A line that
//! starts with anything else (after indentation) is an
//! [`InvalidNodeName`](crate::Error::InvalidNodeName) error.
//!
//! # Values
//!
//! | Syntax | Example | Reads as |
//! |--------|---------|----------|
//! | Colon | `Name: Super Famicom  // note` | everything after `:` up to `//`, one leading space dropped, trailing spaces trimmed |
//! | Quoted | `Name="Super Famicom"` | text between the quotes, no escape sequences |
//! | Unquoted | `Name=Famicom` | text up to the next space or `"` |
//!
//! A node with none of these has an empty value. An unterminated quoted value
//! is an [`UnclosedQuote`](crate::Error::UnclosedQuote) error.
//!
//! ## Attributes
//!
//! After the value, further `name`, `name=value`, `name="value"` or
//! `name: value` items on the same line become children of the node, in
//! order. Reading stops at end of line, at `//`, or at the first character
//! that cannot start a name; the rest of the line is ignored.
//!
//! ## Continuation Lines
//!
//! A deeper line starting with `:` appends to the value of the node above,
//! joined with `\n`. One space after the colon is dropped. `//` is *not* a
//! comment inside a continuation line.
//!
//! ```text
//! Description
//!   : Line 1
//!   : Line 2     // still part of the value
//! ```
//!
//! # Output
//!
//! The serializer writes a canonical form rather than echoing input syntax:
//!
//! - Two spaces per depth level by default (see [`BmlOptions`](crate::BmlOptions))
//! - `Name: value` for single-line values and a bare `Name` for empty ones
//! - Multi-line values as continuation lines one level deeper, before the
//!   node's children
//! - Every line ends with `\n`; an empty document is the empty string
//!
//! Attributes are written back as ordinary child lines, and comments are not
//! preserved.
//!
//! # Limitations
//!
//! - No escape sequences, so a value can never contain `"` when quoted
//! - Colon values cannot contain `//`; use a continuation line instead
//! - Trailing spaces on a colon value are dropped when it is read back.
//!   Only the single space after `:` is consumed, so leading spaces survive

// This module contains only documentation; no implementation code
