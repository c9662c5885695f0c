//! Line normalization.
//!
//! The scanner turns raw text into the structurally significant lines the
//! parser works on. `\n`, `\r\n` and `\r` all end a line; blank lines and
//! full-line `//` comments are dropped; leading whitespace is kept verbatim
//! because it carries the nesting depth.

/// A single line that survived normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLine<'a> {
    /// The full line, leading whitespace included.
    pub text: &'a str,
    /// Number of leading space or tab characters. Both weigh one.
    pub depth: usize,
    /// 1-based physical line number in the original input.
    pub number: usize,
}

impl<'a> ScanLine<'a> {
    /// The line with its indentation removed.
    #[must_use]
    pub fn content(&self) -> &'a str {
        self.text.get(self.depth..).unwrap_or_default()
    }

    /// Whether this line continues the value of the node above it.
    #[must_use]
    pub fn is_continuation(&self) -> bool {
        self.content().starts_with(':')
    }
}

/// Splits `input` into normalized lines.
///
/// Never fails: empty or comment-only input yields an empty list.
#[must_use]
pub fn scan(input: &str) -> Vec<ScanLine<'_>> {
    split_lines(input)
        .enumerate()
        .filter_map(|(index, text)| {
            if text.trim().is_empty() {
                return None;
            }
            let depth = read_depth(text);
            if text.get(depth..).is_some_and(|rest| rest.starts_with("//")) {
                return None;
            }
            Some(ScanLine {
                text,
                depth,
                number: index + 1,
            })
        })
        .collect()
}

/// Counts leading spaces and tabs.
#[must_use]
pub fn read_depth(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ' || b == b'\t').count()
}

/// Iterates physical lines, treating `\r\n` as a single break.
fn split_lines(input: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(input);
    std::iter::from_fn(move || {
        let current = rest?;
        match current.find(|c: char| c == '\n' || c == '\r') {
            Some(pos) => {
                let line = &current[..pos];
                let skip = if current[pos..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&current[pos + skip..]);
                Some(line)
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}
