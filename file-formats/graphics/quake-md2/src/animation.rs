//! Named animation sequences and time-to-keyframe resolution
//!
//! Standard MD2 player models carry 199 keyframes partitioned into 21
//! fixed sequences (stand, run, attack, ...). The table below is the
//! compiled-in description of that partition: bounds, native playback
//! rate, and length. It is constant data, never per-model state.

use std::fmt;

/// Number of named animation sequences
pub const SEQUENCE_COUNT: usize = 21;

/// Identifier for one of the standard animation sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceId {
    /// Idle stance
    Stand,
    /// Running cycle
    Run,
    /// Weapon attack
    Attack,
    /// Pain reaction A
    PainA,
    /// Pain reaction B
    PainB,
    /// Pain reaction C
    PainC,
    /// Jump
    Jump,
    /// Front flip
    Flip,
    /// Salute gesture
    Salute,
    /// Knocked backwards
    Fallback,
    /// Wave gesture
    Wave,
    /// Point gesture
    Point,
    /// Crouched idle
    CrouchStand,
    /// Crouched walk cycle
    CrouchWalk,
    /// Crouched attack
    CrouchAttack,
    /// Crouched pain reaction
    CrouchPain,
    /// Crouched death
    CrouchDeath,
    /// Death, falling backward
    DeathFallback,
    /// Death, falling forward
    DeathFallForward,
    /// Death, falling backward slowly
    DeathFallBackSlow,
    /// Gibbed
    Boom,
}

impl SequenceId {
    /// All sequence ids in table order
    pub const ALL: [Self; SEQUENCE_COUNT] = [
        Self::Stand,
        Self::Run,
        Self::Attack,
        Self::PainA,
        Self::PainB,
        Self::PainC,
        Self::Jump,
        Self::Flip,
        Self::Salute,
        Self::Fallback,
        Self::Wave,
        Self::Point,
        Self::CrouchStand,
        Self::CrouchWalk,
        Self::CrouchAttack,
        Self::CrouchPain,
        Self::CrouchDeath,
        Self::DeathFallback,
        Self::DeathFallForward,
        Self::DeathFallBackSlow,
        Self::Boom,
    ];

    /// The sequence description this id selects
    pub fn sequence(self) -> &'static Sequence {
        &SEQUENCES[self as usize]
    }

    /// The sequence's table name
    pub fn name(self) -> &'static str {
        self.sequence().name
    }

    /// Looks an id up by table name, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|id| id.name().eq_ignore_ascii_case(name))
            .copied()
    }
}

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named keyframe range with its native playback rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sequence {
    /// Table name of the sequence
    pub name: &'static str,
    /// First keyframe of the range
    pub first_frame: u32,
    /// Last keyframe of the range, inclusive
    pub last_frame: u32,
    /// Native playback rate in keyframes per second
    pub fps: u32,
    /// Length of the range in keyframes
    pub frame_len: u32,
}

impl Sequence {
    /// Playback length in seconds at the native rate
    pub fn duration(&self) -> f64 {
        self.frame_len as f64 / self.fps as f64
    }

    /// Maps a progress value in units of whole sequence playbacks onto a
    /// keyframe pair and blend fraction
    ///
    /// Returns `(start, end, fraction)` where `end` wraps to the
    /// sequence's first frame when `start` lands on its last. `progress`
    /// is not reduced modulo 1, so values past 1.0 resolve to frames past
    /// the sequence; the model-level bound check decides their fate.
    pub(crate) fn resolve(&self, progress: f64) -> (u64, u64, f64) {
        let scaled = self.frame_len as f64 * progress;
        // the float-to-int cast saturates, so huge progress values stay
        // representable and fail the caller's bound check instead
        let start = (self.first_frame as u64).saturating_add(scaled.floor() as u64);
        let end = if start == self.last_frame as u64 {
            self.first_frame as u64
        } else {
            start.saturating_add(1)
        };
        (start, end, scaled.fract())
    }
}

/// The standard sequence table
pub const SEQUENCES: [Sequence; SEQUENCE_COUNT] = [
    seq("stand", 0, 39, 9),
    seq("run", 40, 45, 10),
    seq("attack", 46, 53, 10),
    seq("pain_a", 54, 57, 7),
    seq("pain_b", 58, 61, 7),
    seq("pain_c", 62, 65, 7),
    seq("jump", 66, 71, 7),
    seq("flip", 72, 83, 7),
    seq("salute", 84, 94, 7),
    seq("fallback", 95, 111, 10),
    seq("wave", 112, 122, 7),
    seq("point", 123, 134, 6),
    seq("crouch_stand", 135, 153, 10),
    seq("crouch_walk", 154, 159, 7),
    seq("crouch_attack", 160, 168, 10),
    seq("crouch_pain", 169, 172, 7),
    seq("crouch_death", 173, 177, 5),
    seq("death_fallback", 178, 183, 7),
    seq("death_fallforward", 184, 189, 7),
    seq("death_fallbackslow", 190, 197, 7),
    seq("boom", 198, 198, 5),
];

const fn seq(name: &'static str, first: u32, last: u32, fps: u32) -> Sequence {
    Sequence {
        name,
        first_frame: first,
        last_frame: last,
        fps,
        frame_len: last - first + 1,
    }
}

/// A resolved keyframe pair and the blend fraction between them
///
/// Consumers blend linearly: `value = at(start) * (1 - fraction) +
/// at(end) * fraction`. Blended normals are not re-normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameBlend {
    /// Keyframe the pose starts from
    pub start: usize,
    /// Keyframe the pose blends toward
    pub end: usize,
    /// Interpolation weight
    pub fraction: f32,
}
