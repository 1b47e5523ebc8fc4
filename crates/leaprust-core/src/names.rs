//! Finger, bone and state name tables
//!
//! The table lengths double as the snapshot capacities, so the schema and
//! the lookup tables can never disagree on how many fingers or bones exist.

use std::fmt;

/// Finger names by index
pub const FINGER_NAMES: [&str; 5] = ["Thumb", "Index", "Middle", "Ring", "Pinky"];

/// Bone names by index. The intermediate bone is reported as "Middle".
pub const BONE_NAMES: [&str; 4] = ["Metacarpal", "Proximal", "Middle", "Distal"];

/// Tracking state names by index
pub const STATE_NAMES: [&str; 4] = [
    "STATE_INVALID",
    "STATE_START",
    "STATE_UPDATE",
    "STATE_END",
];

/// Anatomical finger kind
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FingerType {
    #[default]
    Thumb = 0,
    Index = 1,
    Middle = 2,
    Ring = 3,
    Pinky = 4,
}

impl FingerType {
    pub const ALL: [FingerType; 5] = [
        FingerType::Thumb,
        FingerType::Index,
        FingerType::Middle,
        FingerType::Ring,
        FingerType::Pinky,
    ];

    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        FINGER_NAMES[self.index()]
    }
}

impl fmt::Display for FingerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bone kind, ordered from the wrist to the tip
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoneType {
    /// Bone connected to the wrist inside the palm
    #[default]
    Metacarpal = 0,
    /// Bone connecting to the palm
    Proximal = 1,
    /// Bone between the tip and the base
    Intermediate = 2,
    /// Bone at the tip of the finger
    Distal = 3,
}

impl BoneType {
    pub const ALL: [BoneType; 4] = [
        BoneType::Metacarpal,
        BoneType::Proximal,
        BoneType::Intermediate,
        BoneType::Distal,
    ];

    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        BONE_NAMES[self.index()]
    }
}

impl fmt::Display for BoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tracking state tag.
///
/// Informational only: no snapshot field carries a state.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrameState {
    #[default]
    Invalid = 0,
    Start = 1,
    Update = 2,
    End = 3,
}

impl FrameState {
    pub const ALL: [FrameState; 4] = [
        FrameState::Invalid,
        FrameState::Start,
        FrameState::Update,
        FrameState::End,
    ];

    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn name(self) -> &'static str {
        STATE_NAMES[self as usize]
    }
}

impl fmt::Display for FrameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finger_names() {
        assert_eq!(FingerType::Thumb.name(), "Thumb");
        assert_eq!(FingerType::Pinky.name(), "Pinky");
        assert_eq!(FingerType::from_index(2), Some(FingerType::Middle));
        assert_eq!(FingerType::from_index(5), None);
        assert_eq!(FingerType::from_index(-1), None);
    }

    #[test]
    fn test_bone_names() {
        assert_eq!(BoneType::Intermediate.name(), "Middle");
        assert_eq!(BoneType::Distal.to_string(), "Distal");
        assert_eq!(BoneType::from_index(3), Some(BoneType::Distal));
        assert_eq!(BoneType::from_index(4), None);
    }

    #[test]
    fn test_state_names() {
        assert_eq!(FrameState::Invalid.name(), "STATE_INVALID");
        assert_eq!(FrameState::from_index(2), Some(FrameState::Update));
        assert_eq!(FrameState::from_index(4), None);
    }

    #[test]
    fn test_discriminants_match_table_order() {
        for (i, finger) in FingerType::ALL.iter().enumerate() {
            assert_eq!(finger.index(), i);
            assert_eq!(*finger as i32, i as i32);
        }
        for (i, bone) in BoneType::ALL.iter().enumerate() {
            assert_eq!(bone.index(), i);
        }
    }
}
