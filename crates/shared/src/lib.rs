//! Types shared between the editor core and its hosts (GUI chrome,
//! command dispatchers): colors, grid configuration, and the wire form
//! of placed voxels.

mod color;

pub use color::Color;

use serde::{Deserialize, Serialize};

/// Ground lattice configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of anchor points per side (the lattice is `size x size`).
    pub size: usize,
    /// Distance between adjacent anchor points, in world units.
    pub spacing: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 10,
            spacing: 1.0,
        }
    }
}

/// Wire form of a placed voxel, as reported by the inspect command.
///
/// `level` counts half-unit vertical steps: world height = `level * 0.5`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoxelRecord {
    pub x: i32,
    pub z: i32,
    pub level: i32,
    pub color: Color,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_config_default() {
        let cfg = GridConfig::default();
        assert_eq!(cfg.size, 10);
        assert_eq!(cfg.spacing, 1.0);
    }

    #[test]
    fn test_voxel_record_roundtrip() {
        let rec = VoxelRecord {
            x: 3,
            z: 4,
            level: 2,
            color: "#ff8800".parse().unwrap(),
        };
        let json = serde_json::to_string(&rec).unwrap();
        let back: VoxelRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(rec, back);
    }
}
