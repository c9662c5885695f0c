//! Building documents with the bml! macro.
//!
//! Run with: cargo run --example macro

use serde_bml::{bml, Lookup};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let driver = "Metal";

    let doc = bml!({
        "Video": {
            "Driver": driver,
            "Multiplier": 2,
            "Output": { "width": 256, "height": 224 }
        },
        "Paths": {
            "Recent": ["super-mario-world.sfc", "chrono-trigger.sfc"]
        },
        "Audio": { "Latency": (-1) }
    });

    println!("{}", doc);
    println!("Width: {}", doc.get("Video/Output/width").int_or(0));
    println!("Recent files: {}", doc.root().get_all("Paths/Recent").len());

    Ok(())
}
