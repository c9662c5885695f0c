//! BML parsing.
//!
//! Parsing runs in two phases. The [scanner](crate::scanner) reduces the
//! input to significant lines, then a recursive descent over those lines
//! builds the tree. Nesting is driven purely by indentation: a line belongs
//! to the nearest preceding line with a smaller depth.
//!
//! Each node line reads a name, an optional value, and optional inline
//! attributes:
//!
//! ```text
//! Video                        // node without a value
//!   Driver: Metal              // colon value, runs to the end of the line
//!   Shader=CRT                 // unquoted value, stops at a space
//!   Title="Super Famicom"      // quoted value, no escapes
//!   Output width=256 height=224
//!   Notes
//!     : first line             // continuation lines append to the value
//!     : second line
//! ```

use crate::scanner::{scan, ScanLine};
use crate::{Document, Error, Node, Result};
use tracing::{debug, instrument, trace};

/// Parses BML text into a [`Document`].
///
/// # Examples
///
/// ```rust
/// use serde_bml::parse;
///
/// let doc = parse("Video\n  Driver: Metal\n  Multiplier: 2").unwrap();
/// assert_eq!(doc.get("Video/Driver").unwrap().value, "Metal");
/// ```
///
/// # Errors
///
/// Returns the first syntax error found. No partial tree is produced.
#[instrument(level = "debug", skip(input), fields(bytes = input.len()))]
pub fn parse(input: &str) -> Result<Document> {
    let lines = scan(input);
    debug!(lines = lines.len(), "normalized input");

    match Parser::new(lines).parse_document() {
        Ok(root) => {
            debug!(nodes = root.children.len(), "parsed document");
            Ok(Document::from(root))
        }
        Err(err) => {
            debug!(error = %err, "parse failed");
            Err(err)
        }
    }
}

/// Returns `true` if `c` may appear in a node name.
#[inline]
#[must_use]
pub fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '.'
}

/// Returns `true` if `name` is a non-empty run of name characters.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_name_char)
}

/// End of the name starting at byte `start`.
fn scan_name(text: &str, start: usize) -> usize {
    start
        + text
            .get(start..)
            .unwrap_or_default()
            .bytes()
            .take_while(|&b| is_name_char(char::from(b)))
            .count()
}

/// Reads the value introduced at byte `pos` of `line`.
///
/// Returns the value and the position just past it. When `pos` holds
/// neither `:` nor `=` there is no value: the result is empty and the
/// position is unchanged.
pub(crate) fn parse_value(line: &ScanLine<'_>, pos: usize) -> Result<(String, usize)> {
    let text = line.text;
    let bytes = text.as_bytes();

    match bytes.get(pos) {
        Some(b':') => {
            let mut start = pos + 1;
            if bytes.get(start) == Some(&b' ') {
                start += 1;
            }
            let end = text[start..]
                .find("//")
                .map_or(text.len(), |offset| start + offset);
            let value = text[start..end].trim_end_matches(' ');
            Ok((value.to_string(), end))
        }
        Some(b'=') => {
            let start = pos + 1;
            if bytes.get(start) == Some(&b'"') {
                let open = start + 1;
                let close = text[open..]
                    .find('"')
                    .map(|offset| open + offset)
                    .ok_or_else(|| Error::unclosed_quote(line.number, start + 1, text))?;
                Ok((text[open..close].to_string(), close + 1))
            } else {
                let end = text[start..]
                    .find(|c: char| c == ' ' || c == '"')
                    .map_or(text.len(), |offset| start + offset);
                Ok((text[start..end].to_string(), end))
            }
        }
        _ => Ok((String::new(), pos)),
    }
}

/// Recursive descent over normalized lines.
pub(crate) struct Parser<'a> {
    lines: Vec<ScanLine<'a>>,
    cursor: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(lines: Vec<ScanLine<'a>>) -> Self {
        Parser { lines, cursor: 0 }
    }

    fn at_end(&self) -> bool {
        self.cursor >= self.lines.len()
    }

    /// Collects top-level nodes under an unnamed root until lines run out.
    pub(crate) fn parse_document(&mut self) -> Result<Node> {
        let mut root = Node::root();
        while !self.at_end() {
            let node = self.parse_node(None)?;
            root.children.push(node);
        }
        Ok(root)
    }

    /// Parses the node on the current line along with everything nested
    /// under it.
    ///
    /// `parent_depth` is `None` at the top level, where any depth is valid.
    pub(crate) fn parse_node(&mut self, parent_depth: Option<usize>) -> Result<Node> {
        let Some(line) = self.lines.get(self.cursor).copied() else {
            let last = self.lines.last().map_or(0, |line| line.number);
            return Err(Error::unexpected_end_of_input(last));
        };
        self.cursor += 1;

        let depth = line.depth;
        if let Some(parent) = parent_depth {
            if depth <= parent {
                return Err(Error::invalid_indentation(line.number, parent, depth, line.text));
            }
        }

        let name_end = scan_name(line.text, depth);
        if name_end == depth {
            return Err(Error::invalid_node_name(line.number, depth + 1, line.text));
        }

        let mut node = Node::new(&line.text[depth..name_end]);
        let (value, pos) = parse_value(&line, name_end)?;
        node.value = value;
        parse_attributes(&line, pos, &mut node)?;

        while let Some(next) = self.lines.get(self.cursor).copied() {
            if next.depth <= depth {
                break;
            }

            if let Some(rest) = next.content().strip_prefix(':') {
                let rest = rest.strip_prefix(' ').unwrap_or(rest);
                if !node.value.is_empty() {
                    node.value.push('\n');
                }
                node.value.push_str(rest);
                self.cursor += 1;
                continue;
            }

            let child = self.parse_node(Some(depth))?;
            node.children.push(child);
        }

        trace!(name = %node.name, line = line.number, children = node.children.len(), "parsed node");
        Ok(node)
    }
}

/// Reads `name[value]` pairs following the node's own value.
///
/// Stops at end of line, at an inline `//` comment, or at the first
/// character that cannot start a name.
fn parse_attributes(line: &ScanLine<'_>, mut pos: usize, node: &mut Node) -> Result<()> {
    let text = line.text;
    let bytes = text.as_bytes();

    while pos < bytes.len() {
        while bytes.get(pos) == Some(&b' ') {
            pos += 1;
        }
        if pos >= bytes.len() || text[pos..].starts_with("//") {
            break;
        }

        let end = scan_name(text, pos);
        if end == pos {
            break;
        }
        let name = &text[pos..end];
        let (value, next) = parse_value(line, end)?;
        node.children.push(Node::with_value(name, value));
        pos = next;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> ScanLine<'_> {
        ScanLine {
            text,
            depth: crate::scanner::read_depth(text),
            number: 1,
        }
    }

    fn value_at(text: &str, pos: usize) -> (String, usize) {
        parse_value(&line(text), pos).unwrap()
    }

    #[test]
    fn test_colon_value() {
        assert_eq!(value_at("Driver: Metal", 6), ("Metal".to_string(), 13));
        assert_eq!(value_at("Driver:Metal", 6), ("Metal".to_string(), 12));
        assert_eq!(value_at("Driver:  Metal", 6), (" Metal".to_string(), 14));
    }

    #[test]
    fn test_colon_value_stops_at_comment() {
        let text = "Driver: Metal   // preferred";
        assert_eq!(value_at(text, 6), ("Metal".to_string(), 16));
    }

    #[test]
    fn test_colon_value_keeps_inner_spaces() {
        assert_eq!(value_at("Name: Super Famicom  ", 4).0, "Super Famicom");
    }

    #[test]
    fn test_unquoted_value() {
        assert_eq!(value_at("Shader=CRT next", 6), ("CRT".to_string(), 10));
        assert_eq!(value_at("Shader=a\"b", 6), ("a".to_string(), 8));
        assert_eq!(value_at("Shader=", 6), (String::new(), 7));
    }

    #[test]
    fn test_quoted_value() {
        assert_eq!(value_at("Title=\"Super Famicom\"", 5), ("Super Famicom".to_string(), 21));
        assert_eq!(value_at("Title=\"\"", 5), (String::new(), 8));
        assert_eq!(value_at("Path=\"C:\\roms\\\"", 4).0, "C:\\roms\\");
    }

    #[test]
    fn test_unclosed_quote() {
        let err = parse_value(&line("Driver=\"Metal"), 6).unwrap_err();
        assert_eq!(
            err,
            Error::UnclosedQuote {
                line: 1,
                col: 8,
                context: "Driver=\"Metal".to_string()
            }
        );
    }

    #[test]
    fn test_no_value() {
        assert_eq!(value_at("Video", 5), (String::new(), 5));
        assert_eq!(value_at("Video width=1", 5), (String::new(), 5));
        assert_eq!(value_at("Videox", 5), (String::new(), 5));
    }

    #[test]
    fn test_name_chars() {
        assert!(is_valid_name("Node-Name.123"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("Video/Driver"));
        assert!(!is_valid_name("under_score"));
        assert!(!is_name_char(' '));
        assert!(!is_name_char('é'));
    }

    #[test]
    fn test_attributes() {
        let mut parser = Parser::new(scan("Output width=256 height: 224 // size"));
        let node = parser.parse_node(None).unwrap();
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.children[0], Node::with_value("width", "256"));
        assert_eq!(node.children[1], Node::with_value("height", "224"));
    }

    #[test]
    fn test_attribute_without_value() {
        let mut parser = Parser::new(scan("Cartridge region=NTSC sram"));
        let node = parser.parse_node(None).unwrap();
        assert_eq!(node.children[1], Node::new("sram"));
    }

    #[test]
    fn test_attribute_junk_stops_loop() {
        let mut parser = Parser::new(scan("Node a=1 ~junk b=2"));
        let node = parser.parse_node(None).unwrap();
        assert_eq!(node.children, vec![Node::with_value("a", "1")]);
    }

    #[test]
    fn test_attribute_unclosed_quote_fails() {
        let mut parser = Parser::new(scan("Node a=\"open"));
        assert!(matches!(parser.parse_node(None), Err(Error::UnclosedQuote { .. })));
    }

    #[test]
    fn test_child_must_out_indent_parent() {
        let mut parser = Parser::new(scan("  Driver: Metal"));
        let err = parser.parse_node(Some(2)).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidIndentation {
                line: 1,
                parent: 2,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_read_past_end() {
        let mut parser = Parser::new(scan("A\n\nB"));
        parser.parse_document().unwrap();
        assert_eq!(
            parser.parse_node(None).unwrap_err(),
            Error::UnexpectedEndOfInput { line: 3 }
        );
    }

    #[test]
    fn test_continuation_after_value() {
        let doc = parse("Desc: start\n  : more").unwrap();
        assert_eq!(doc.get("Desc").unwrap().value, "start\nmore");
    }

    #[test]
    fn test_continuation_keeps_comment_marker() {
        let doc = parse("Url\n  : http://example.com").unwrap();
        assert_eq!(doc.get("Url").unwrap().value, "http://example.com");
    }

    #[test]
    fn test_uneven_children_attach_to_nearest_parent() {
        let doc = parse("A\n    B\n  C\nD").unwrap();
        let a = doc.get("A").unwrap();
        assert_eq!(a.children.len(), 2);
        assert_eq!(a.children[1].name, "C");
        assert_eq!(doc.children()[1].name, "D");
    }
}
