//! Customizing BML output with BmlOptions.
//!
//! Run with: cargo run --example custom_options

use serde::Serialize;
use serde_bml::{parse, to_string_with_options, BmlOptions};
use std::error::Error;

#[derive(Debug, Serialize)]
struct Output {
    width: u32,
    height: u32,
}

#[derive(Debug, Serialize)]
struct Video {
    #[serde(rename = "Driver")]
    driver: String,
    #[serde(rename = "Output")]
    output: Output,
}

fn main() -> Result<(), Box<dyn Error>> {
    let video = Video {
        driver: "Metal".to_string(),
        output: Output {
            width: 256,
            height: 224,
        },
    };

    println!("Default (2 spaces):");
    println!("{}", serde_bml::to_string(&video)?);

    println!("4 spaces:");
    let wide = to_string_with_options(&video, BmlOptions::new().with_indent(4))?;
    println!("{}", wide);

    println!("1 space:");
    let narrow = to_string_with_options(&video, BmlOptions::new().with_indent(1))?;
    println!("{}", narrow);

    // Indentation is re-measured on read, so every width parses the same
    assert_eq!(parse(&wide)?, parse(&narrow)?);

    Ok(())
}
