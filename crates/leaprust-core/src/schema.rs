//! Snapshot schema - fixed-capacity frame records
//!
//! Every record is `#[repr(C)]`, `Copy`, and valid when all-zero, so a
//! buffer from `calloc` (or `Frame::default()`) is a well-formed empty
//! snapshot. Only slots `[0, count)` of each array are meaningful; the rest
//! keep whatever the buffer held before.

use crate::names::{BoneType, FingerType, BONE_NAMES, FINGER_NAMES};
use crate::vector::{Basis, Vector3};

/// Hands per frame
pub const MAX_HANDS: usize = 2;
/// Fingers per hand
pub const MAX_FINGERS: usize = FINGER_NAMES.len();
/// Bones per finger, thumb included
pub const BONES_PER_FINGER: usize = BONE_NAMES.len();

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bone {
    pub basis: Basis,
    pub prev_joint: Vector3,
    pub center: Vector3,
    pub next_joint: Vector3,
    pub direction: Vector3,
    /// `BoneType` discriminant
    pub bone_type: i32,
    pub length: f32,
    pub width: f32,
    /// 1 when the device observed this bone
    pub is_valid: i32,
}

impl Bone {
    pub fn kind(&self) -> Option<BoneType> {
        BoneType::from_index(self.bone_type)
    }

    pub fn valid(&self) -> bool {
        self.is_valid != 0
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Finger {
    /// `FingerType` discriminant
    pub finger_type: i32,
    pub tip_position: Vector3,
    pub tip_velocity: Vector3,
    pub id: i32,
    pub length: f32,
    pub width: f32,
    pub bone_count: i32,
    pub bones: [Bone; BONES_PER_FINGER],
}

impl Finger {
    pub fn kind(&self) -> Option<FingerType> {
        FingerType::from_index(self.finger_type)
    }

    pub fn bone(&self, kind: BoneType) -> &Bone {
        &self.bones[kind.index()]
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Arm {
    pub width: f32,
    pub basis: Basis,
    pub direction: Vector3,
    pub wrist_position: Vector3,
    pub center: Vector3,
    pub elbow_position: Vector3,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Hand {
    pub arm: Arm,
    pub id: i32,
    pub palm_position: Vector3,
    pub stabilized_palm_position: Vector3,
    pub palm_width: f32,
    pub palm_velocity: Vector3,
    pub palm_normal: Vector3,
    pub direction: Vector3,
    pub basis: Basis,
    pub is_left: i32,

    pub wrist_position: Vector3,
    /// Center of the sphere fit to the hand's curvature
    pub sphere_center: Vector3,
    pub sphere_radius: f32,
    /// 0.0 open .. 1.0 pinched
    pub pinch_strength: f32,
    /// 0.0 open .. 1.0 fist
    pub grab_strength: f32,

    pub finger_count: i32,
    pub fingers: [Finger; MAX_FINGERS],
}

impl Hand {
    pub fn left(&self) -> bool {
        self.is_left != 0
    }

    /// The populated fingers
    pub fn fingers(&self) -> &[Finger] {
        &self.fingers[..clamp_count(self.finger_count, MAX_FINGERS)]
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Frame {
    pub id: i32,
    /// Device clock, not wall clock
    pub timestamp: i32,
    pub hand_count: i32,
    pub hands: [Hand; MAX_HANDS],
}

impl Frame {
    /// A zeroed snapshot on the heap
    pub fn blank() -> Box<Frame> {
        Box::default()
    }

    /// The populated hands
    pub fn hands(&self) -> &[Hand] {
        &self.hands[..clamp_count(self.hand_count, MAX_HANDS)]
    }

    /// True for the zero id/timestamp the SDK reports without a device
    pub fn is_placeholder(&self) -> bool {
        self.id == 0 && self.timestamp == 0
    }
}

fn clamp_count(count: i32, max: usize) -> usize {
    usize::try_from(count).unwrap_or(0).min(max)
}
