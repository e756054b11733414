//! Value types shared across the pipeline.

mod colour;

pub use colour::{is_hex_colour, rgb_to_hex, Colour};
