//! Controllable objects: anything the session can freeze and resume in bulk

use serde::{Deserialize, Serialize};

/// Freeze/restore motion
pub trait Controllable {
    /// Freeze motion, remembering the current velocity
    fn stop(&mut self);
    /// Restore the remembered velocity (no-op if not stopped)
    fn resume(&mut self);
}

/// A registered control target, resolved against the world on use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlTarget {
    Player,
    Enemy(u32),
}

/// Snapshot of targets taken at registration time.
///
/// Not auto-tracking: targets removed after registration stay listed and are
/// skipped when resolved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControlSet {
    targets: Vec<ControlTarget>,
}

impl ControlSet {
    pub fn clear(&mut self) {
        self.targets.clear();
    }

    pub fn push(&mut self, target: ControlTarget) {
        self.targets.push(target);
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = ControlTarget> + '_ {
        self.targets.iter().copied()
    }

    pub fn contains(&self, target: ControlTarget) -> bool {
        self.targets.contains(&target)
    }
}
