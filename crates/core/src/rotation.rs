//! Rotation table - the six axis-aligned 90° piece rotations
//!
//! Rotations are applied with exact axis-swap-and-negate formulas on integer offsets,
//! so any number of quarter turns stays on the lattice with no drift.

use crate::types::{IVec3, RotationDirection};

/// Euler-angle vector (degrees) for a rotation direction
///
/// The presentation layer negates this to animate a piece back from its
/// pre-rotation orientation.
pub fn vector_for(direction: RotationDirection) -> IVec3 {
    match direction {
        RotationDirection::XBackwards => IVec3::new(90, 0, 0),
        RotationDirection::XForwards => IVec3::new(-90, 0, 0),
        RotationDirection::YLeft => IVec3::new(0, -90, 0),
        RotationDirection::YRight => IVec3::new(0, 90, 0),
        RotationDirection::ZLeft => IVec3::new(0, 0, 90),
        RotationDirection::ZRight => IVec3::new(0, 0, -90),
    }
}

/// Rotate a point around the origin by 90° in the given direction
#[inline]
pub fn rotate(point: IVec3, direction: RotationDirection) -> IVec3 {
    let IVec3 { x, y, z } = point;
    match direction {
        RotationDirection::XBackwards => IVec3::new(x, -z, y),
        RotationDirection::XForwards => IVec3::new(x, z, -y),
        RotationDirection::YLeft => IVec3::new(-z, y, x),
        RotationDirection::YRight => IVec3::new(z, y, -x),
        RotationDirection::ZLeft => IVec3::new(-y, x, z),
        RotationDirection::ZRight => IVec3::new(y, -x, z),
    }
}

/// Rotate every point in place
pub fn rotate_all(points: &mut [IVec3], direction: RotationDirection) {
    for point in points {
        *point = rotate(*point, direction);
    }
}
