//! Tracking SDK contract
//!
//! The SDK's live object graph is consumed only through these traits.
//! Access is index based so a frame can be walked without allocating.
//! Native adapters implement them over the vendor objects; `crate::live`
//! implements them over owned data.

use crate::names::{BoneType, FingerType};

/// SDK native vector
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// SDK native transformation matrix (three axes and a translation)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub x_basis: Vector,
    pub y_basis: Vector,
    pub z_basis: Vector,
    pub origin: Vector,
}

impl Matrix {
    pub const fn identity() -> Self {
        Self {
            x_basis: Vector::new(1.0, 0.0, 0.0),
            y_basis: Vector::new(0.0, 1.0, 0.0),
            z_basis: Vector::new(0.0, 0.0, 1.0),
            origin: Vector::zero(),
        }
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

/// A tracking frame as reported by the SDK
pub trait TrackedFrame {
    /// False for the SDK's placeholder frame (no device, no data yet)
    fn is_valid(&self) -> bool;
    /// Monotonic sequence number from the device
    fn id(&self) -> i64;
    /// Device clock, microseconds
    fn timestamp(&self) -> i64;
    fn hand_count(&self) -> usize;
    /// Hand at `index` in SDK iteration order
    fn hand(&self, index: usize) -> Option<&dyn TrackedHand>;
}

pub trait TrackedHand {
    fn id(&self) -> i32;
    fn is_left(&self) -> bool;
    fn palm_position(&self) -> Vector;
    fn stabilized_palm_position(&self) -> Vector;
    fn palm_width(&self) -> f32;
    fn palm_velocity(&self) -> Vector;
    fn palm_normal(&self) -> Vector;
    fn direction(&self) -> Vector;
    fn basis(&self) -> Matrix;
    fn wrist_position(&self) -> Vector;
    fn sphere_center(&self) -> Vector;
    fn sphere_radius(&self) -> f32;
    fn pinch_strength(&self) -> f32;
    fn grab_strength(&self) -> f32;
    fn arm(&self) -> &dyn TrackedArm;
    fn finger_count(&self) -> usize;
    fn finger(&self, index: usize) -> Option<&dyn TrackedFinger>;
}

pub trait TrackedArm {
    fn width(&self) -> f32;
    fn basis(&self) -> Matrix;
    fn direction(&self) -> Vector;
    fn wrist_position(&self) -> Vector;
    fn center(&self) -> Vector;
    fn elbow_position(&self) -> Vector;
}

pub trait TrackedFinger {
    fn id(&self) -> i32;
    fn finger_type(&self) -> FingerType;
    fn tip_position(&self) -> Vector;
    fn tip_velocity(&self) -> Vector;
    fn length(&self) -> f32;
    fn width(&self) -> f32;
    /// Always answers; bones the device cannot observe report
    /// `is_valid() == false` with default geometry.
    fn bone(&self, kind: BoneType) -> &dyn TrackedBone;
}

pub trait TrackedBone {
    fn is_valid(&self) -> bool;
    fn bone_type(&self) -> BoneType;
    fn basis(&self) -> Matrix;
    fn prev_joint(&self) -> Vector;
    fn next_joint(&self) -> Vector;
    fn center(&self) -> Vector;
    fn direction(&self) -> Vector;
    fn length(&self) -> f32;
    fn width(&self) -> f32;
}
