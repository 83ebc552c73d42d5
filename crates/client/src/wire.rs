//! JSON wire model for the world server's HTTP contract.
//!
//! Shapes match the server exactly; conversions at the bottom translate to
//! and from the pure model types so nothing outside this module depends on
//! field layout. All list endpoints return bare top-level arrays, which
//! `serde_json` parses directly -- no envelope object.

use sandbox_world::{BlockPos, BlockType, OwnerKey};
use serde::{Deserialize, Serialize};

/// `point` object inside a block: `{x, y, z}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// `block_info` object: the type tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockInfo {
    pub type_id: String,
}

/// `block` object: position plus type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub point: Point,
    pub block_info: BlockInfo,
}

/// One entry of `/known_world_state`: a block and the key that declared it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockState {
    pub block: Block,
    pub pub_key: Vec<u8>,
}

/// One entry of `/tick_update_vec`: a changed block state plus the server's
/// change timestamp (informational only; application order is array order).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickUpdate {
    pub entry: BlockState,
    pub timestamp: String,
}

/// POST body for `/set_block`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetBlockRequest {
    pub duration: u32,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub info: BlockInfo,
}

/// POST body for `/remove_block`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveBlockRequest {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

// ── Model conversions ───────────────────────────────────────────────────────

impl From<Point> for BlockPos {
    fn from(p: Point) -> Self {
        BlockPos::new(p.x, p.y, p.z)
    }
}

impl From<BlockPos> for Point {
    fn from(pos: BlockPos) -> Self {
        Point { x: pos.x, y: pos.y, z: pos.z }
    }
}

impl BlockState {
    /// Split into the model triple the store's apply algorithm consumes.
    pub fn into_parts(self) -> (BlockPos, BlockType, OwnerKey) {
        (
            self.block.point.into(),
            BlockType::new(self.block.block_info.type_id),
            OwnerKey::new(self.pub_key),
        )
    }
}

impl SetBlockRequest {
    pub fn new(pos: BlockPos, kind: &BlockType, duration: u32) -> Self {
        Self {
            duration,
            x: pos.x,
            y: pos.y,
            z: pos.z,
            info: BlockInfo { type_id: kind.as_str().to_owned() },
        }
    }
}

impl From<BlockPos> for RemoveBlockRequest {
    fn from(pos: BlockPos) -> Self {
        Self { x: pos.x, y: pos.y, z: pos.z }
    }
}
