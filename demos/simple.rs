//! Parse, query and modify a BML settings file.
//!
//! Run with: cargo run --example simple

use serde_bml::{parse, Lookup, LookupMut};
use std::error::Error;

const SETTINGS: &str = "\
// emulator settings
Video
  Driver: OpenGL
  Multiplier: 2
  Luminance: 1.0
  Output width=256 height=224
Audio
  Driver: SDL
  Mute: false
";

fn main() -> Result<(), Box<dyn Error>> {
    let mut doc = parse(SETTINGS)?;

    // Missing settings fall back instead of failing
    println!("Driver:     {}", doc.get("Video/Driver").string_or("None"));
    println!("Multiplier: {}", doc.get("Video/Multiplier").int_or(1));
    println!("Width:      {}", doc.get("Video/Output/width").int_or(0));
    println!("Latency:    {}\n", doc.get("Audio/Latency").int_or(64));

    doc.get_mut("Video").set("Driver", "Metal");
    doc.get_mut("Video").set_int("Multiplier", 3);
    doc.root_mut().set_bool("Boot/Fast", true);
    doc.remove("Audio/Mute");

    println!("Modified:\n{}", doc);

    let reparsed = parse(&doc.to_string())?;
    assert_eq!(reparsed, doc);
    println!("✓ Round-trip successful");

    Ok(())
}
