use nalgebra as na;

pub type Vector2d = na::Vector2<f64>;
pub type Vector3d = na::Vector3<f64>;
