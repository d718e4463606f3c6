use anyhow::Result;
use opencv::core::Mat;
use opencv::prelude::*;

use crate::my_types::*;

/// Depth maps arrive as 16-bit millimeters.
const DEPTH_SCALE: f64 = 1e-3;

/// Pinhole intrinsics of the aligned depth stream.
#[derive(Debug, Clone, Copy)]
pub struct Intrinsics {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
}

impl Intrinsics {
    /// Deproject a pixel with a known depth into a camera-space point.
    pub fn deproject(&self, pixel: Vector2d, depth: f64) -> Vector3d {
        Vector3d::new(
            (pixel[0] - self.cx) / self.fx * depth,
            (pixel[1] - self.cy) / self.fy * depth,
            depth,
        )
    }

    pub fn project(&self, point: Vector3d) -> Option<Vector2d> {
        // point is behind camera
        if point[2] <= 0. {
            return None;
        }
        let z_inv = 1. / point[2];
        Some(Vector2d::new(
            point[0] * z_inv * self.fx + self.cx,
            point[1] * z_inv * self.fy + self.cy,
        ))
    }
}

/// Depth in meters at a pixel, clamped to the map bounds. A zero reading
/// means the sensor had no return there and deprojects to the origin.
pub fn depth_at(depth_map: &Mat, x: i32, y: i32) -> Result<f64> {
    let x = x.clamp(0, depth_map.cols() - 1);
    let y = y.clamp(0, depth_map.rows() - 1);
    let raw = *depth_map.at_2d::<u16>(y, x)?;
    Ok(raw as f64 * DEPTH_SCALE)
}
