use serde::{Deserialize, Serialize};

/// Kinds of scent markers drones leave for indirect coordination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    /// "A drone passed through here."
    Trail,
    /// "Found too many problems in too small an area."
    NeedHelp,
    /// "This neighborhood is under control."
    AreaCleared,
    /// "A victim was located at this cell."
    VictimFound,
}

/// One decaying marker owned by the cell it was emitted into.
///
/// `intensity` is the value at emission and never changes; `strength`
/// is recomputed from it on every decay pass, so decay is idempotent
/// and order-independent. Signals are pure values: no drone holds a
/// reference after emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub kind: SignalKind,
    pub message: String,
    pub emitted_at: u64,
    pub intensity: f32,
    pub strength: f32,
}

impl Signal {
    #[must_use]
    pub fn new(kind: SignalKind, message: impl Into<String>, emitted_at: u64, intensity: f32) -> Self {
        Self {
            kind,
            message: message.into(),
            emitted_at,
            intensity,
            strength: intensity,
        }
    }

    #[must_use]
    pub fn age(&self, current_tick: u64) -> u64 {
        current_tick.saturating_sub(self.emitted_at)
    }
}
