//! Configuration options for BML output.
//!
//! Parsing needs no configuration: nesting is measured from whatever
//! indentation the input uses. Output indentation is the only knob.
//!
//! ```rust
//! use serde_bml::{to_string_with_options, BmlOptions};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Video {
//!     #[serde(rename = "Driver")]
//!     driver: String,
//! }
//!
//! #[derive(Serialize)]
//! struct Settings {
//!     #[serde(rename = "Video")]
//!     video: Video,
//! }
//!
//! let settings = Settings { video: Video { driver: "Metal".into() } };
//! let text = to_string_with_options(&settings, BmlOptions::new().with_indent(4)).unwrap();
//! assert_eq!(text, "Video\n    Driver: Metal\n");
//! ```

/// Configuration options for BML serialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BmlOptions {
    /// Spaces written per nesting level. Never less than one.
    pub indent: usize,
}

impl Default for BmlOptions {
    fn default() -> Self {
        BmlOptions { indent: 2 }
    }
}

impl BmlOptions {
    /// Creates default options (2-space indent).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bml::BmlOptions;
    ///
    /// let options = BmlOptions::new();
    /// assert_eq!(options.indent, 2);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation size (number of spaces per level).
    ///
    /// A width of zero would flatten the hierarchy, so it is raised to one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bml::BmlOptions;
    ///
    /// assert_eq!(BmlOptions::new().with_indent(4).indent, 4);
    /// assert_eq!(BmlOptions::new().with_indent(0).indent, 1);
    /// ```
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent.max(1);
        self
    }
}
