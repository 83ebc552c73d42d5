//! Well-known block type tags.
//!
//! Tag values are the server's wire `type_id` strings; the model treats them
//! as opaque. Only AIR has reserved meaning (see `sandbox_world::BlockType`).

use sandbox_world::BlockType;

/// Random-texture block.
pub const RANDOM: &str = "1";
/// Solid green block.
pub const GREEN: &str = "2";
/// Solid gray block.
pub const GRAY: &str = "3";

/// Resolve a human-friendly console name to a type tag. Unrecognized names
/// pass through verbatim, so raw wire tags work everywhere a name does.
pub fn resolve(name: &str) -> BlockType {
    match name {
        "random" => BlockType::new(RANDOM),
        "green" => BlockType::new(GREEN),
        "gray" => BlockType::new(GRAY),
        "air" => BlockType::air(),
        other => BlockType::new(other),
    }
}
