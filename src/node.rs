use nalgebra as na;

use crate::error::{VortexError, VortexResult};

/// A point of the airfoil's camber line, embedded in the z = 0 plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    coord: na::Point3<f64>,
    id: usize,
}

impl Node {
    /// `id` is 1-based, in reading order.
    pub fn new(x: f64, y: f64, id: usize) -> VortexResult<Self> {
        if !x.is_finite() || !y.is_finite() {
            return Err(VortexError::InvalidGeometry(format!(
                "node #{id} has non-finite coordinates ({x}, {y})"
            )));
        }
        if id == 0 {
            return Err(VortexError::InvalidGeometry(
                "node identifiers are 1-based".to_string(),
            ));
        }

        Ok(Node {
            coord: na::Point3::new(x, y, 0.0),
            id,
        })
    }

    pub fn coord(&self) -> &na::Point3<f64> {
        &self.coord
    }

    pub fn id(&self) -> usize {
        self.id
    }
}
