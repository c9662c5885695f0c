use serde::{Deserialize, Serialize};
use serde_bml::{
    from_document, from_str, parse, to_document, to_string, Document, Error, Lookup, LookupMut,
    Node,
};

const SETTINGS: &str = "\
// ares settings
Video
  Driver: Metal
  Multiplier: 2
  Luminance: 1.0
  Output width=256 height=224
Audio
  Driver: SDL
  Mute: false
Boot
  Fast: true
";

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Video {
    #[serde(rename = "Driver")]
    driver: String,
    #[serde(rename = "Multiplier")]
    multiplier: i32,
    #[serde(rename = "Luminance")]
    luminance: f64,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Settings {
    #[serde(rename = "Video")]
    video: Video,
    #[serde(rename = "Audio/Driver")]
    audio_driver: String,
    #[serde(rename = "Audio/Mute")]
    mute: bool,
    #[serde(rename = "Boot/Fast")]
    fast_boot: Option<bool>,
    #[serde(rename = "Paths/Rom")]
    roms: Vec<String>,
}

#[test]
fn test_nested_lookup() {
    let doc = parse("Video\n  Driver: Metal\n  Multiplier: 2").unwrap();
    assert_eq!(doc.get("Video/Driver").string_or(""), "Metal");
    assert_eq!(doc.get("Video/Multiplier").int_or(0), 2);
}

#[test]
fn test_quoted_value_with_space() {
    let doc = parse("Node=\"Metal GPU\"").unwrap();
    assert_eq!(doc.children(), &[Node::with_value("Node", "Metal GPU")]);
}

#[test]
fn test_continuation_lines() {
    let doc = parse("Desc\n  : Line 1\n  : Line 2").unwrap();
    assert_eq!(doc.get("Desc").unwrap().value, "Line 1\nLine 2");
}

#[test]
fn test_unclosed_quote_fails() {
    let err = parse("Driver=\"Metal").unwrap_err();
    assert!(matches!(err, Error::UnclosedQuote { line: 1, col: 8, .. }));
}

#[test]
fn test_continuation_without_name_fails() {
    let err = parse("  : value").unwrap_err();
    assert!(matches!(err, Error::InvalidNodeName { line: 1, col: 3, .. }));
}

#[test]
fn test_remove_then_get() {
    let mut doc = parse("Video\n  Driver: Metal\n  Multiplier: 2").unwrap();
    assert!(doc.remove("Video/Driver"));
    assert!(doc.get("Video/Driver").is_none());
    assert!(!doc.remove("Video/Driver"));
    assert_eq!(doc.get("Video/Multiplier").int_or(0), 2);
}

#[test]
fn test_error_reports_physical_line() {
    let err = parse("// header\n\nVideo\n  Driver: Metal\n  ~bad").unwrap_err();
    assert_eq!(err.line(), Some(5));
    assert!(err.to_string().contains("~bad"));
}

#[test]
fn test_no_partial_tree_on_error() {
    let result: Result<Document, _> = "Video\n  Driver: Metal\nAudio volume=\"loud".parse();
    assert!(result.is_err());
}

#[test]
fn test_settings_file() {
    let doc = parse(SETTINGS).unwrap();
    assert_eq!(doc.children().len(), 3);
    assert_eq!(doc.get("Video/Luminance").float_or(0.0), 1.0);
    assert_eq!(doc.get("Video/Output/width").int_or(0), 256);
    assert_eq!(doc.get("Video/Output/height").int_or(0), 224);
    assert!(!doc.get("Audio/Mute").bool_or(true));
    assert!(doc.get("Boot/Fast").bool_or(false));
    assert_eq!(doc.get("Input/Port1").string_or("Gamepad"), "Gamepad");
}

#[test]
fn test_settings_round_trip() {
    let doc = parse(SETTINGS).unwrap();
    let reparsed = parse(&doc.to_string()).unwrap();
    assert_eq!(doc, reparsed);
}

#[test]
fn test_modify_and_serialize() {
    let mut doc = parse("Video\n  Driver: OpenGL\n  Multiplier: 1").unwrap();

    doc.get_mut("Video").set("Driver", "Metal");
    doc.get_mut("Video").set_int("Multiplier", 2);
    doc.get_mut("Video").set_bool("NewSetting", true);

    let text = doc.to_string();
    assert_eq!(
        text,
        "Video\n  Driver: Metal\n  Multiplier: 2\n  NewSetting: true\n"
    );

    let reparsed = parse(&text).unwrap();
    assert_eq!(reparsed.get("Video/Driver").string_or(""), "Metal");
    assert_eq!(reparsed.get("Video/Multiplier").int_or(0), 2);
    assert!(reparsed.get("Video/NewSetting").bool_or(false));
}

#[test]
fn test_value_and_continuation_combine() {
    let doc = parse("Notes: first\n  : second\n  Child: x\n  : third").unwrap();
    let notes = doc.get("Notes").unwrap();
    assert_eq!(notes.value, "first\nsecond\nthird");
    assert_eq!(notes.children, vec![Node::with_value("Child", "x")]);
}

#[test]
fn test_deserialize_settings() {
    let settings: Settings = from_str(SETTINGS).unwrap();
    assert_eq!(
        settings,
        Settings {
            video: Video {
                driver: "Metal".to_string(),
                multiplier: 2,
                luminance: 1.0,
            },
            audio_driver: "SDL".to_string(),
            mute: false,
            fast_boot: Some(true),
            roms: Vec::new(),
        }
    );
}

#[test]
fn test_serialize_settings() {
    let settings = Settings {
        video: Video {
            driver: "Vulkan".to_string(),
            multiplier: 3,
            luminance: 0.75,
        },
        audio_driver: "PulseAudio".to_string(),
        mute: true,
        fast_boot: None,
        roms: vec!["a.sfc".to_string(), "b.sfc".to_string()],
    };

    let text = to_string(&settings).unwrap();
    assert_eq!(
        text,
        "\
Video
  Driver: Vulkan
  Multiplier: 3
  Luminance: 0.75
Audio
  Driver: PulseAudio
  Mute: true
Paths
  Rom: a.sfc
  Rom: b.sfc
"
    );

    let back: Settings = from_str(&text).unwrap();
    assert_eq!(back, settings);
}

#[test]
fn test_unmarshal_missing_nodes_read_zero_values() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct Video {
        #[serde(rename = "Driver")]
        driver: String,
        #[serde(rename = "Multiplier")]
        multiplier: u32,
    }
    #[derive(Deserialize, Debug, PartialEq)]
    struct Audio {
        #[serde(rename = "Driver")]
        driver: String,
    }
    #[derive(Deserialize, Debug, PartialEq)]
    struct Partial {
        #[serde(rename = "Video")]
        video: Video,
        #[serde(rename = "Audio")]
        audio: Audio,
        #[serde(rename = "Paths/Rom")]
        roms: Vec<String>,
        #[serde(rename = "Audio/Mute")]
        mute: bool,
    }
    let partial: Partial = from_str("Video\n  Driver: Metal").unwrap();
    assert_eq!(
        partial,
        Partial {
            video: Video {
                driver: "Metal".to_string(),
                multiplier: 0,
            },
            audio: Audio {
                driver: String::new(),
            },
            roms: Vec::new(),
            mute: false,
        }
    );
}

#[test]
fn test_unmarshal_invalid_number() {
    let err = from_str::<Settings>("Video\n  Driver: x\n  Multiplier: 1.5\n  Luminance: 1").unwrap_err();
    assert_eq!(err, Error::type_mismatch("Multiplier", "integer", "1.5"));
}

#[test]
fn test_unmarshal_wide_integers() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Counters {
        small: i8,
        medium: u16,
        large: u64,
        ratio: f32,
    }
    let counters = Counters {
        small: -128,
        medium: 65535,
        large: u64::MAX,
        ratio: 0.1,
    };
    let text = to_string(&counters).unwrap();
    assert!(text.contains("large: 18446744073709551615\n"));
    assert!(text.contains("ratio: 0.1\n"));
    let back: Counters = from_str(&text).unwrap();
    assert_eq!(back, counters);
}

#[test]
fn test_bind_existing_tree() {
    let doc = parse(SETTINGS).unwrap();
    let video: Video = serde_bml::from_node(doc.get("Video").unwrap()).unwrap();
    assert_eq!(video.driver, "Metal");

    let settings: Settings = from_document(&doc).unwrap();
    assert_eq!(settings.video, video);
}

#[test]
fn test_to_document_then_edit() {
    let video = Video {
        driver: "Metal".to_string(),
        multiplier: 2,
        luminance: 1.5,
    };
    let mut doc = to_document(&video).unwrap();
    doc.set("Shader", "CRT");
    assert_eq!(
        doc.to_string(),
        "Driver: Metal\nMultiplier: 2\nLuminance: 1.5\nShader: CRT\n"
    );
}

#[test]
fn test_serialize_rejects_bad_names() {
    #[derive(Serialize)]
    struct Bad {
        #[serde(rename = "Video Driver")]
        driver: String,
    }
    let err = to_string(&Bad {
        driver: "Metal".to_string(),
    })
    .unwrap_err();
    assert_eq!(err, Error::InvalidKey("Video Driver".to_string()));
}

#[test]
fn test_serialize_top_level_scalar_fails() {
    assert!(matches!(to_string(&"text"), Err(Error::UnsupportedType(_))));
}

#[test]
fn test_nested_vec_of_structs() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Port {
        #[serde(rename = "Device")]
        device: String,
    }
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Input {
        #[serde(rename = "Input/Port")]
        ports: Vec<Port>,
    }
    let input = Input {
        ports: vec![
            Port {
                device: "Gamepad".to_string(),
            },
            Port {
                device: "Mouse".to_string(),
            },
        ],
    };
    let text = to_string(&input).unwrap();
    assert_eq!(
        text,
        "Input\n  Port\n    Device: Gamepad\n  Port\n    Device: Mouse\n"
    );
    let back: Input = from_str(&text).unwrap();
    assert_eq!(back, input);
}
