//! Owned live frame graph
//!
//! An in-memory implementation of the SDK contract. Services that receive
//! tracking data out of process (or synthesize it) hold their latest frame
//! in this form.

use crate::names::{BoneType, FingerType};
use crate::sdk::{
    Matrix, TrackedArm, TrackedBone, TrackedFinger, TrackedFrame, TrackedHand, Vector,
};

/// Live bone
#[derive(Debug, Clone, PartialEq)]
pub struct LiveBone {
    pub valid: bool,
    pub kind: BoneType,
    pub basis: Matrix,
    pub prev_joint: Vector,
    pub next_joint: Vector,
    pub center: Vector,
    pub direction: Vector,
    pub length: f32,
    pub width: f32,
}

impl LiveBone {
    /// The SDK's answer for a bone it cannot observe
    pub fn invalid(kind: BoneType) -> Self {
        Self {
            valid: false,
            kind,
            basis: Matrix::identity(),
            prev_joint: Vector::zero(),
            next_joint: Vector::zero(),
            center: Vector::zero(),
            direction: Vector::zero(),
            length: 0.0,
            width: 0.0,
        }
    }

    /// A valid bone spanning `prev_joint` to `next_joint`
    pub fn between(kind: BoneType, prev_joint: Vector, next_joint: Vector, width: f32) -> Self {
        let dx = next_joint.x - prev_joint.x;
        let dy = next_joint.y - prev_joint.y;
        let dz = next_joint.z - prev_joint.z;
        let length = (dx * dx + dy * dy + dz * dz).sqrt();
        let direction = if length > f32::EPSILON {
            Vector::new(dx / length, dy / length, dz / length)
        } else {
            Vector::zero()
        };
        let center = Vector::new(
            prev_joint.x + dx * 0.5,
            prev_joint.y + dy * 0.5,
            prev_joint.z + dz * 0.5,
        );

        Self {
            valid: true,
            kind,
            basis: Matrix {
                origin: center,
                ..Matrix::identity()
            },
            prev_joint,
            next_joint,
            center,
            direction,
            length,
            width,
        }
    }
}

/// Live finger. Always carries all four bones.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveFinger {
    pub id: i32,
    pub kind: FingerType,
    pub tip_position: Vector,
    pub tip_velocity: Vector,
    pub length: f32,
    pub width: f32,
    pub bones: [LiveBone; 4],
}

impl LiveFinger {
    pub fn new(id: i32, kind: FingerType) -> Self {
        Self {
            id,
            kind,
            tip_position: Vector::zero(),
            tip_velocity: Vector::zero(),
            length: 0.0,
            width: 0.0,
            bones: BoneType::ALL.map(LiveBone::invalid),
        }
    }
}

/// Live arm
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LiveArm {
    pub width: f32,
    pub basis: Matrix,
    pub direction: Vector,
    pub wrist_position: Vector,
    pub center: Vector,
    pub elbow_position: Vector,
}

/// Live hand
#[derive(Debug, Clone, PartialEq)]
pub struct LiveHand {
    pub id: i32,
    pub is_left: bool,
    pub palm_position: Vector,
    pub stabilized_palm_position: Vector,
    pub palm_width: f32,
    pub palm_velocity: Vector,
    pub palm_normal: Vector,
    pub direction: Vector,
    pub basis: Matrix,
    pub wrist_position: Vector,
    pub sphere_center: Vector,
    pub sphere_radius: f32,
    pub pinch_strength: f32,
    pub grab_strength: f32,
    pub arm: LiveArm,
    pub fingers: Vec<LiveFinger>,
}

impl LiveHand {
    pub fn new(id: i32, is_left: bool) -> Self {
        Self {
            id,
            is_left,
            palm_position: Vector::zero(),
            stabilized_palm_position: Vector::zero(),
            palm_width: 0.0,
            palm_velocity: Vector::zero(),
            palm_normal: Vector::zero(),
            direction: Vector::zero(),
            basis: Matrix::identity(),
            wrist_position: Vector::zero(),
            sphere_center: Vector::zero(),
            sphere_radius: 0.0,
            pinch_strength: 0.0,
            grab_strength: 0.0,
            arm: LiveArm::default(),
            fingers: Vec::new(),
        }
    }
}

/// Live frame
#[derive(Debug, Clone, PartialEq)]
pub struct LiveFrame {
    pub valid: bool,
    pub id: i64,
    pub timestamp: i64,
    pub hands: Vec<LiveHand>,
}

impl LiveFrame {
    pub fn new(id: i64, timestamp: i64) -> Self {
        Self {
            valid: true,
            id,
            timestamp,
            hands: Vec::new(),
        }
    }

    /// The SDK's placeholder before the first frame or with no device
    pub fn invalid() -> Self {
        Self {
            valid: false,
            id: 0,
            timestamp: 0,
            hands: Vec::new(),
        }
    }

    pub fn with_hand(mut self, hand: LiveHand) -> Self {
        self.hands.push(hand);
        self
    }
}

impl Default for LiveFrame {
    fn default() -> Self {
        Self::invalid()
    }
}

impl TrackedFrame for LiveFrame {
    fn is_valid(&self) -> bool {
        self.valid
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn timestamp(&self) -> i64 {
        self.timestamp
    }

    fn hand_count(&self) -> usize {
        self.hands.len()
    }

    fn hand(&self, index: usize) -> Option<&dyn TrackedHand> {
        self.hands.get(index).map(|h| h as &dyn TrackedHand)
    }
}

impl TrackedHand for LiveHand {
    fn id(&self) -> i32 {
        self.id
    }

    fn is_left(&self) -> bool {
        self.is_left
    }

    fn palm_position(&self) -> Vector {
        self.palm_position
    }

    fn stabilized_palm_position(&self) -> Vector {
        self.stabilized_palm_position
    }

    fn palm_width(&self) -> f32 {
        self.palm_width
    }

    fn palm_velocity(&self) -> Vector {
        self.palm_velocity
    }

    fn palm_normal(&self) -> Vector {
        self.palm_normal
    }

    fn direction(&self) -> Vector {
        self.direction
    }

    fn basis(&self) -> Matrix {
        self.basis
    }

    fn wrist_position(&self) -> Vector {
        self.wrist_position
    }

    fn sphere_center(&self) -> Vector {
        self.sphere_center
    }

    fn sphere_radius(&self) -> f32 {
        self.sphere_radius
    }

    fn pinch_strength(&self) -> f32 {
        self.pinch_strength
    }

    fn grab_strength(&self) -> f32 {
        self.grab_strength
    }

    fn arm(&self) -> &dyn TrackedArm {
        &self.arm
    }

    fn finger_count(&self) -> usize {
        self.fingers.len()
    }

    fn finger(&self, index: usize) -> Option<&dyn TrackedFinger> {
        self.fingers.get(index).map(|f| f as &dyn TrackedFinger)
    }
}

impl TrackedArm for LiveArm {
    fn width(&self) -> f32 {
        self.width
    }

    fn basis(&self) -> Matrix {
        self.basis
    }

    fn direction(&self) -> Vector {
        self.direction
    }

    fn wrist_position(&self) -> Vector {
        self.wrist_position
    }

    fn center(&self) -> Vector {
        self.center
    }

    fn elbow_position(&self) -> Vector {
        self.elbow_position
    }
}

impl TrackedFinger for LiveFinger {
    fn id(&self) -> i32 {
        self.id
    }

    fn finger_type(&self) -> FingerType {
        self.kind
    }

    fn tip_position(&self) -> Vector {
        self.tip_position
    }

    fn tip_velocity(&self) -> Vector {
        self.tip_velocity
    }

    fn length(&self) -> f32 {
        self.length
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn bone(&self, kind: BoneType) -> &dyn TrackedBone {
        &self.bones[kind.index()]
    }
}

impl TrackedBone for LiveBone {
    fn is_valid(&self) -> bool {
        self.valid
    }

    fn bone_type(&self) -> BoneType {
        self.kind
    }

    fn basis(&self) -> Matrix {
        self.basis
    }

    fn prev_joint(&self) -> Vector {
        self.prev_joint
    }

    fn next_joint(&self) -> Vector {
        self.next_joint
    }

    fn center(&self) -> Vector {
        self.center
    }

    fn direction(&self) -> Vector {
        self.direction
    }

    fn length(&self) -> f32 {
        self.length
    }

    fn width(&self) -> f32 {
        self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_frame_defaults() {
        let frame = LiveFrame::invalid();
        assert!(!frame.is_valid());
        assert_eq!(frame.id(), 0);
        assert_eq!(frame.timestamp(), 0);
        assert_eq!(frame.hand_count(), 0);
        assert!(frame.hand(0).is_none());
    }

    #[test]
    fn test_new_finger_has_four_invalid_bones() {
        let finger = LiveFinger::new(10, FingerType::Index);
        for kind in BoneType::ALL {
            let bone = finger.bone(kind);
            assert!(!bone.is_valid());
            assert_eq!(bone.bone_type(), kind);
            assert_eq!(bone.length(), 0.0);
        }
    }

    #[test]
    fn test_bone_between() {
        let bone = LiveBone::between(
            BoneType::Proximal,
            Vector::new(0.0, 0.0, 0.0),
            Vector::new(0.0, 0.0, -10.0),
            2.0,
        );
        assert!(bone.valid);
        assert!((bone.length - 10.0).abs() < 1e-6);
        assert_eq!(bone.direction, Vector::new(0.0, 0.0, -1.0));
        assert_eq!(bone.center, Vector::new(0.0, 0.0, -5.0));
    }
}
