/// Builds a [`Document`](crate::Document) from a JSON-like literal.
///
/// Keys are string literals; a `{ ... }` value nests children, a `[ ... ]`
/// value repeats the key once per element, and anything else is stored with
/// its `ToString` text. Negative numbers and other multi-token expressions
/// need parentheses.
///
/// ```rust
/// use serde_bml::bml;
///
/// let doc = bml!({
///     "Video": { "Driver": "Metal", "Multiplier": 2 },
///     "Rom": ["a.sfc", "b.sfc"],
///     "Offset": (-4)
/// });
/// assert_eq!(
///     doc.to_string(),
///     "Video\n  Driver: Metal\n  Multiplier: 2\nRom: a.sfc\nRom: b.sfc\nOffset: -4\n"
/// );
/// ```
#[macro_export]
macro_rules! bml {
    (@insert $parent:ident, $key:expr, { $($k:literal : $v:tt),* $(,)? }) => {{
        #[allow(unused_variables)]
        let node = $parent.append($crate::Node::new($key));
        $(
            $crate::bml!(@insert node, $k, $v);
        )*
    }};

    (@insert $parent:ident, $key:expr, [ $($v:tt),* $(,)? ]) => {{
        $(
            $crate::bml!(@insert $parent, $key, $v);
        )*
    }};

    (@insert $parent:ident, $key:expr, $value:expr) => {{
        $parent.append($crate::Node::with_value(
            $key,
            ::std::string::ToString::to_string(&$value),
        ));
    }};

    ({}) => {
        $crate::Document::new()
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut root = $crate::Node::root();
        $(
            $crate::bml!(@insert root, $key, $value);
        )*
        $crate::Document::from(root)
    }};
}
