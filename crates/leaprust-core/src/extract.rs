//! Frame extractor
//!
//! Walks a live SDK frame and writes it field by field into a caller-owned
//! snapshot. Hands and fingers over capacity are dropped in SDK iteration
//! order; every finger gets all four bones whether or not the device saw
//! them. Nothing is allocated and slots past the written counts are left
//! untouched.

use crate::names::BoneType;
use crate::schema::{Arm, Bone, Finger, Frame, Hand, MAX_FINGERS, MAX_HANDS};
use crate::sdk::{TrackedArm, TrackedBone, TrackedFinger, TrackedFrame, TrackedHand};

/// What the extractor saw versus what fit in the snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub hands_seen: usize,
    pub hands_written: usize,
    pub fingers_seen: usize,
    pub fingers_written: usize,
}

impl ExtractSummary {
    pub fn truncated(&self) -> bool {
        self.hands_seen > self.hands_written || self.fingers_seen > self.fingers_written
    }
}

/// Populate `out` from `live`.
///
/// Ids and timestamps are narrowed to their low 32 bits.
pub fn extract_frame(live: &dyn TrackedFrame, out: &mut Frame) -> ExtractSummary {
    let hands_seen = live.hand_count();

    out.id = live.id() as i32;
    out.timestamp = live.timestamp() as i32;

    let mut summary = ExtractSummary {
        hands_seen,
        ..ExtractSummary::default()
    };

    // A source may answer fewer hands than it counts; only filled slots count
    for (index, slot) in out.hands.iter_mut().take(hands_seen.min(MAX_HANDS)).enumerate() {
        let Some(hand) = live.hand(index) else {
            break;
        };
        let (seen, written) = extract_hand(hand, slot);
        summary.hands_written += 1;
        summary.fingers_seen += seen;
        summary.fingers_written += written;
    }
    out.hand_count = summary.hands_written as i32;

    summary
}

/// Returns (fingers seen, fingers written)
fn extract_hand(hand: &dyn TrackedHand, out: &mut Hand) -> (usize, usize) {
    let fingers_seen = hand.finger_count();

    out.is_left = hand.is_left() as i32;
    extract_arm(hand.arm(), &mut out.arm);

    out.id = hand.id();
    out.palm_position = hand.palm_position().into();
    out.stabilized_palm_position = hand.stabilized_palm_position().into();
    out.palm_width = hand.palm_width();
    out.palm_velocity = hand.palm_velocity().into();
    out.palm_normal = hand.palm_normal().into();
    out.direction = hand.direction().into();
    out.basis = hand.basis().into();
    out.wrist_position = hand.wrist_position().into();
    out.sphere_center = hand.sphere_center().into();
    out.sphere_radius = hand.sphere_radius();
    out.pinch_strength = hand.pinch_strength();
    out.grab_strength = hand.grab_strength();

    let mut fingers_written = 0;
    for (index, slot) in out.fingers.iter_mut().take(fingers_seen.min(MAX_FINGERS)).enumerate() {
        let Some(finger) = hand.finger(index) else {
            break;
        };
        extract_finger(finger, slot);
        fingers_written += 1;
    }
    out.finger_count = fingers_written as i32;

    (fingers_seen, fingers_written)
}

fn extract_arm(arm: &dyn TrackedArm, out: &mut Arm) {
    out.width = arm.width();
    out.basis = arm.basis().into();
    out.direction = arm.direction().into();
    out.wrist_position = arm.wrist_position().into();
    out.center = arm.center().into();
    out.elbow_position = arm.elbow_position().into();
}

fn extract_finger(finger: &dyn TrackedFinger, out: &mut Finger) {
    out.finger_type = finger.finger_type() as i32;
    out.tip_position = finger.tip_position().into();
    out.tip_velocity = finger.tip_velocity().into();
    out.id = finger.id();
    out.length = finger.length();
    out.width = finger.width();

    out.bone_count = out.bones.len() as i32;
    for (kind, slot) in BoneType::ALL.into_iter().zip(out.bones.iter_mut()) {
        extract_bone(finger.bone(kind), kind, slot);
    }
}

fn extract_bone(bone: &dyn TrackedBone, kind: BoneType, out: &mut Bone) {
    out.basis = bone.basis().into();
    out.prev_joint = bone.prev_joint().into();
    out.next_joint = bone.next_joint().into();
    out.center = bone.center().into();
    out.direction = bone.direction().into();
    // Slot position, not the SDK's answer, decides the tag
    out.bone_type = kind as i32;
    out.length = bone.length();
    out.width = bone.width();
    out.is_valid = bone.is_valid() as i32;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live::{LiveBone, LiveFinger, LiveFrame, LiveHand};
    use crate::names::FingerType;
    use crate::sdk::{Matrix, Vector};
    use crate::vector::Vector3;

    fn hand_with_fingers(id: i32, is_left: bool, fingers: usize) -> LiveHand {
        let mut hand = LiveHand::new(id, is_left);
        for i in 0..fingers {
            let kind = FingerType::ALL[i % FingerType::ALL.len()];
            let mut finger = LiveFinger::new(id * 10 + i as i32, kind);
            finger.tip_position = Vector::new(i as f32, 1.0, 2.0);
            hand.fingers.push(finger);
        }
        hand
    }

    #[test]
    fn test_single_left_hand() {
        let live = LiveFrame::new(42, 1000).with_hand(hand_with_fingers(7, true, 3));
        let mut out = Frame::default();

        let summary = extract_frame(&live, &mut out);

        assert_eq!(out.id, 42);
        assert_eq!(out.timestamp, 1000);
        assert_eq!(out.hand_count, 1);
        assert_eq!(out.hands[0].is_left, 1);
        assert_eq!(out.hands[0].id, 7);
        assert_eq!(out.hands[0].finger_count, 3);
        assert_eq!(out.hands[0].fingers[2].id, 72);
        assert_eq!(out.hands[0].fingers[2].tip_position, Vector3::new(2.0, 1.0, 2.0));
        assert_eq!(out.hands[0].fingers[3], Finger::default());
        assert_eq!(out.hands[0].fingers[4], Finger::default());
        assert!(!summary.truncated());
    }

    #[test]
    fn test_three_hands_clamped_to_two() {
        let live = LiveFrame::new(1, 2)
            .with_hand(hand_with_fingers(1, true, 5))
            .with_hand(hand_with_fingers(2, false, 5))
            .with_hand(hand_with_fingers(3, false, 5));
        let mut out = Frame::default();

        let summary = extract_frame(&live, &mut out);

        assert_eq!(out.hand_count, 2);
        assert_eq!(out.hands[0].id, 1);
        assert_eq!(out.hands[1].id, 2);
        assert_eq!(summary.hands_seen, 3);
        assert_eq!(summary.hands_written, 2);
        assert!(summary.truncated());
    }

    #[test]
    fn test_extra_fingers_dropped() {
        let live = LiveFrame::new(1, 2).with_hand(hand_with_fingers(1, false, 7));
        let mut out = Frame::default();

        let summary = extract_frame(&live, &mut out);

        assert_eq!(out.hands[0].finger_count, 5);
        assert_eq!(out.hands[0].fingers[4].id, 14);
        assert_eq!(summary.fingers_seen, 7);
        assert_eq!(summary.fingers_written, 5);
    }

    #[test]
    fn test_bones_always_four_with_validity() {
        let mut hand = hand_with_fingers(1, true, 1);
        hand.fingers[0].bones[1] = LiveBone::between(
            BoneType::Proximal,
            Vector::new(0.0, 0.0, 0.0),
            Vector::new(0.0, 3.0, 4.0),
            1.5,
        );
        let live = LiveFrame::new(5, 6).with_hand(hand);
        let mut out = Frame::default();

        extract_frame(&live, &mut out);

        let finger = &out.hands[0].fingers[0];
        assert_eq!(finger.bone_count, 4);
        for (i, bone) in finger.bones.iter().enumerate() {
            assert_eq!(bone.bone_type, i as i32);
        }
        assert_eq!(finger.bones[0].is_valid, 0);
        assert_eq!(finger.bones[1].is_valid, 1);
        assert!((finger.bones[1].length - 5.0).abs() < 1e-6);
        assert_eq!(finger.bones[1].width, 1.5);
        assert_eq!(finger.bones[2].is_valid, 0);
        assert_eq!(finger.bones[3].is_valid, 0);
    }

    #[test]
    fn test_invalid_frame_leaves_slots_untouched() {
        let mut out = Frame::default();
        out.hands[0].id = 99;
        out.hands[0].palm_width = 80.0;

        extract_frame(&LiveFrame::invalid(), &mut out);

        assert_eq!(out.id, 0);
        assert_eq!(out.timestamp, 0);
        assert_eq!(out.hand_count, 0);
        assert_eq!(out.hands[0].id, 99);
        assert_eq!(out.hands[0].palm_width, 80.0);
    }

    #[test]
    fn test_hand_and_arm_fields() {
        let mut hand = LiveHand::new(3, false);
        hand.palm_position = Vector::new(1.0, 2.0, 3.0);
        hand.stabilized_palm_position = Vector::new(1.1, 2.1, 3.1);
        hand.sphere_radius = 44.0;
        hand.pinch_strength = 0.25;
        hand.grab_strength = 0.75;
        hand.arm.width = 55.0;
        hand.arm.elbow_position = Vector::new(-1.0, -2.0, -3.0);
        hand.arm.basis = Matrix {
            origin: Vector::new(9.0, 9.0, 9.0),
            ..Matrix::identity()
        };
        let live = LiveFrame::new(1, 1).with_hand(hand);
        let mut out = Frame::default();

        extract_frame(&live, &mut out);

        let h = &out.hands[0];
        assert_eq!(h.is_left, 0);
        assert_eq!(h.palm_position, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(h.stabilized_palm_position, Vector3::new(1.1, 2.1, 3.1));
        assert_eq!(h.sphere_radius, 44.0);
        assert_eq!(h.pinch_strength, 0.25);
        assert_eq!(h.grab_strength, 0.75);
        assert_eq!(h.arm.width, 55.0);
        assert_eq!(h.arm.elbow_position, Vector3::new(-1.0, -2.0, -3.0));
        assert_eq!(h.arm.basis.origin, Vector3::new(9.0, 9.0, 9.0));
        assert_eq!(h.finger_count, 0);
    }

    #[test]
    fn test_repeated_extraction_is_stable() {
        let live = LiveFrame::new(77, 123_456).with_hand(hand_with_fingers(1, true, 5));
        let mut first = Frame::default();
        let mut second = Frame::default();

        extract_frame(&live, &mut first);
        extract_frame(&live, &mut second);

        assert_eq!(first, second);
    }

    #[test]
    fn test_wide_ids_are_narrowed() {
        let live = LiveFrame::new((1_i64 << 32) + 5, (3_i64 << 32) + 9);
        let mut out = Frame::default();

        extract_frame(&live, &mut out);

        assert_eq!(out.id, 5);
        assert_eq!(out.timestamp, 9);
    }

    /// Reports more hands and fingers than it hands out
    struct Overcounting {
        frame: LiveFrame,
        hands: Vec<OvercountingHand>,
    }

    struct OvercountingHand(LiveHand);

    impl TrackedFrame for Overcounting {
        fn is_valid(&self) -> bool {
            true
        }
        fn id(&self) -> i64 {
            self.frame.id
        }
        fn timestamp(&self) -> i64 {
            self.frame.timestamp
        }
        fn hand_count(&self) -> usize {
            self.hands.len() + 3
        }
        fn hand(&self, index: usize) -> Option<&dyn TrackedHand> {
            self.hands.get(index).map(|h| h as &dyn TrackedHand)
        }
    }

    impl TrackedHand for OvercountingHand {
        fn id(&self) -> i32 {
            self.0.id()
        }
        fn is_left(&self) -> bool {
            self.0.is_left()
        }
        fn palm_position(&self) -> Vector {
            self.0.palm_position()
        }
        fn stabilized_palm_position(&self) -> Vector {
            self.0.stabilized_palm_position()
        }
        fn palm_width(&self) -> f32 {
            self.0.palm_width()
        }
        fn palm_velocity(&self) -> Vector {
            self.0.palm_velocity()
        }
        fn palm_normal(&self) -> Vector {
            self.0.palm_normal()
        }
        fn direction(&self) -> Vector {
            self.0.direction()
        }
        fn basis(&self) -> Matrix {
            self.0.basis()
        }
        fn wrist_position(&self) -> Vector {
            self.0.wrist_position()
        }
        fn sphere_center(&self) -> Vector {
            self.0.sphere_center()
        }
        fn sphere_radius(&self) -> f32 {
            self.0.sphere_radius()
        }
        fn pinch_strength(&self) -> f32 {
            self.0.pinch_strength()
        }
        fn grab_strength(&self) -> f32 {
            self.0.grab_strength()
        }
        fn arm(&self) -> &dyn TrackedArm {
            self.0.arm()
        }
        fn finger_count(&self) -> usize {
            self.0.finger_count() + 2
        }
        fn finger(&self, index: usize) -> Option<&dyn TrackedFinger> {
            self.0.finger(index)
        }
    }

    #[test]
    fn test_counts_follow_filled_slots() {
        let live = Overcounting {
            frame: LiveFrame::new(8, 80),
            hands: vec![OvercountingHand(hand_with_fingers(1, true, 2))],
        };
        let mut out = Frame::default();
        out.hand_count = 2;
        out.hands[0].finger_count = 5;

        let summary = extract_frame(&live, &mut out);

        assert_eq!(out.hand_count, 1);
        assert_eq!(out.hands[0].finger_count, 2);
        assert_eq!(out.hands().len(), 1);
        assert_eq!(summary.hands_seen, 4);
        assert_eq!(summary.hands_written, 1);
        assert_eq!(summary.fingers_seen, 4);
        assert_eq!(summary.fingers_written, 2);
    }
}
