//! Load and save a typed settings struct.
//!
//! Run with: cargo run --example settings

use serde::{Deserialize, Serialize};
use serde_bml::{from_str, to_string};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
enum Region {
    Ntsc,
    Pal,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Settings {
    #[serde(rename = "Video/Driver")]
    driver: String,
    #[serde(rename = "Video/Multiplier")]
    multiplier: u32,
    #[serde(rename = "Video/Luminance")]
    luminance: f64,
    #[serde(rename = "Audio/Volume")]
    volume: Option<f64>,
    #[serde(rename = "System/Region")]
    region: Region,
    #[serde(rename = "Paths/Recent")]
    recent: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let input = "\
Video
  Driver: Metal
  Multiplier: 2
  Luminance: 0.9
System Region=Ntsc
Paths
  Recent: super-mario-world.sfc
  Recent: chrono-trigger.sfc
";

    let mut settings: Settings = from_str(input)?;
    println!("Loaded: {:#?}\n", settings);

    settings.region = Region::Pal;
    settings.volume = Some(0.5);

    let output = to_string(&settings)?;
    println!("Saved:\n{}", output);

    let settings_back: Settings = from_str(&output)?;
    assert_eq!(settings, settings_back);
    println!("✓ Round-trip successful");

    Ok(())
}
