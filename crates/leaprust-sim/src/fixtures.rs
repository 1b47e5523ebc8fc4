//! Live frame builders

use leaprust_core::sdk::{Matrix, Vector};
use leaprust_core::{BoneType, FingerType, LiveBone, LiveFinger, LiveFrame, LiveHand};

/// Bone lengths per finger, metacarpal to distal (mm)
const BONE_LENGTHS: [[f32; 4]; 5] = [
    [0.0, 46.0, 32.0, 26.0],
    [68.0, 39.0, 22.0, 16.0],
    [64.0, 44.0, 26.0, 17.0],
    [58.0, 41.0, 25.0, 17.0],
    [53.0, 32.0, 18.0, 15.0],
];

/// Lateral offset of each finger's base from the palm center (mm)
const FINGER_SPREAD: [f32; 5] = [-40.0, -20.0, 0.0, 20.0, 38.0];

fn add(a: Vector, b: Vector) -> Vector {
    Vector::new(a.x + b.x, a.y + b.y, a.z + b.z)
}

fn scale(v: Vector, s: f32) -> Vector {
    Vector::new(v.x * s, v.y * s, v.z * s)
}

/// A fully tracked finger extending from `base` along -z.
///
/// The thumb's metacarpal is zero length but still valid.
pub fn finger_at(id: i32, kind: FingerType, base: Vector) -> LiveFinger {
    let forward = Vector::new(0.0, 0.0, -1.0);
    let lengths = BONE_LENGTHS[kind.index()];
    let width = if kind == FingerType::Thumb { 20.0 } else { 17.0 };

    let mut finger = LiveFinger::new(id, kind);
    let mut joint = base;
    for (slot, bone_type) in BoneType::ALL.into_iter().enumerate() {
        let next = add(joint, scale(forward, lengths[slot]));
        finger.bones[slot] = LiveBone::between(bone_type, joint, next, width);
        joint = next;
    }

    finger.tip_position = joint;
    finger.length = lengths[1..].iter().sum();
    finger.width = width;
    finger
}

pub fn finger(id: i32, kind: FingerType) -> LiveFinger {
    finger_at(id, kind, Vector::zero())
}

/// A hand with `fingers` fingers at `palm`; finger kinds cycle past five
pub fn hand_at(id: i32, is_left: bool, fingers: usize, palm: Vector) -> LiveHand {
    let mut hand = LiveHand::new(id, is_left);
    let side = if is_left { -1.0 } else { 1.0 };

    hand.palm_position = palm;
    hand.stabilized_palm_position = palm;
    hand.palm_width = 85.0;
    hand.palm_normal = Vector::new(0.0, -1.0, 0.0);
    hand.direction = Vector::new(0.0, 0.0, -1.0);
    hand.basis = Matrix {
        x_basis: Vector::new(side, 0.0, 0.0),
        origin: palm,
        ..Matrix::identity()
    };
    hand.wrist_position = add(palm, Vector::new(0.0, 0.0, 60.0));
    hand.sphere_center = add(palm, Vector::new(0.0, 40.0, -20.0));
    hand.sphere_radius = 80.0;

    hand.arm.width = 60.0;
    hand.arm.basis = hand.basis;
    hand.arm.direction = hand.direction;
    hand.arm.wrist_position = hand.wrist_position;
    hand.arm.elbow_position = add(palm, Vector::new(0.0, -30.0, 300.0));
    hand.arm.center = add(palm, Vector::new(0.0, -15.0, 180.0));

    for i in 0..fingers {
        let kind = FingerType::ALL[i % FingerType::ALL.len()];
        let base = add(
            palm,
            Vector::new(side * FINGER_SPREAD[kind.index()], 0.0, -40.0),
        );
        hand.fingers.push(finger_at(id * 10 + i as i32, kind, base));
    }
    hand
}

pub fn hand(id: i32, is_left: bool, fingers: usize) -> LiveHand {
    let x = if is_left { -80.0 } else { 80.0 };
    hand_at(id, is_left, fingers, Vector::new(x, 200.0, 0.0))
}

/// A valid frame with one hand per `(is_left, finger_count)` entry
pub fn frame(id: i64, timestamp: i64, hands: &[(bool, usize)]) -> LiveFrame {
    let mut frame = LiveFrame::new(id, timestamp);
    for (i, (is_left, fingers)) in hands.iter().enumerate() {
        frame.hands.push(hand(i as i32 + 1, *is_left, *fingers));
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaprust_core::sdk::{TrackedBone, TrackedFinger};

    #[test]
    fn test_finger_bones_are_connected() {
        let f = finger(1, FingerType::Index);
        for pair in f.bones.windows(2) {
            assert_eq!(pair[0].next_joint, pair[1].prev_joint);
        }
        assert_eq!(f.tip_position, f.bones[3].next_joint);
        assert!(f.bones.iter().all(|b| b.valid));
    }

    #[test]
    fn test_thumb_metacarpal_is_zero_length() {
        let thumb = finger(1, FingerType::Thumb);
        let metacarpal = thumb.bone(BoneType::Metacarpal);
        assert!(metacarpal.is_valid());
        assert_eq!(metacarpal.length(), 0.0);
    }

    #[test]
    fn test_frame_builder() {
        let f = frame(42, 1000, &[(true, 3), (false, 5)]);
        assert_eq!(f.hands.len(), 2);
        assert!(f.hands[0].is_left);
        assert_eq!(f.hands[0].fingers.len(), 3);
        assert_eq!(f.hands[1].fingers[4].kind, FingerType::Pinky);
    }
}
