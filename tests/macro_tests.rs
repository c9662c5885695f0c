use serde_bml::{bml, parse, Document, Lookup, Node};

#[test]
fn test_bml_macro_empty() {
    let doc = bml!({});
    assert_eq!(doc, Document::new());
    assert_eq!(doc.to_string(), "");
}

#[test]
fn test_bml_macro_scalars() {
    let doc = bml!({
        "Name": "Super Famicom",
        "Players": 2,
        "Negative": (-5),
        "Ratio": 1.25,
        "Enabled": false,
        "Initial": 'S'
    });
    assert_eq!(doc.get("Name").string_or(""), "Super Famicom");
    assert_eq!(doc.get("Players").int_or(0), 2);
    assert_eq!(doc.get("Negative").int_or(0), -5);
    assert_eq!(doc.get("Ratio").float_or(0.0), 1.25);
    assert!(!doc.get("Enabled").bool_or(true));
    assert_eq!(doc.get("Initial").string_or(""), "S");
}

#[test]
fn test_bml_macro_variables() {
    let driver = String::from("Metal");
    let multiplier = 3u8;
    let doc = bml!({ "Video": { "Driver": driver, "Multiplier": multiplier } });
    assert_eq!(doc.get("Video/Driver").string_or(""), "Metal");
    assert_eq!(doc.get("Video/Multiplier").int_or(0), 3);
}

#[test]
fn test_bml_macro_matches_parsed_document() {
    let built = bml!({
        "Video": {
            "Driver": "Metal",
            "Output": { "width": 256, "height": 224 },
        },
        "Audio": { "Mute": true },
    });
    let parsed = parse("Video\n  Driver: Metal\n  Output width=256 height=224\nAudio\n  Mute: true").unwrap();
    assert_eq!(built, parsed);
}

#[test]
fn test_bml_macro_repeated_keys() {
    let doc = bml!({
        "Paths": { "Rom": ["a.sfc", "b.sfc", "c.sfc"] }
    });
    let roms: Vec<_> = doc
        .root()
        .get_all("Paths/Rom")
        .iter()
        .map(|n| n.value.as_str())
        .collect();
    assert_eq!(roms, vec!["a.sfc", "b.sfc", "c.sfc"]);
}

#[test]
fn test_bml_macro_empty_branch() {
    let doc = bml!({ "Input": {} });
    assert_eq!(doc.children(), &[Node::new("Input")]);
    assert_eq!(doc.to_string(), "Input\n");
}
