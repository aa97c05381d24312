//! Per-room game settings.

use std::time::Duration;

use super::entity::Phase;

/// Minimum number of players before the ready-gate can open.
pub const MIN_PLAYERS: usize = 4;

/// Largest room allowed.
pub const MAX_PLAYERS: usize = 12;

/// Room size used when `create-room` carries no `maxPlayers`.
pub const DEFAULT_MAX_PLAYERS: usize = 8;

/// Default maximum number of chat messages kept per room
pub const DEFAULT_CHAT_CAPACITY: usize = 500;

/// How long each timed phase lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDurations {
    pub role_assignment: Duration,
    pub night: Duration,
    pub day: Duration,
    pub voting: Duration,
    pub elimination: Duration,
}

impl PhaseDurations {
    /// Duration of `phase`, or `None` for untimed phases (lobby, game-over).
    pub fn for_phase(&self, phase: Phase) -> Option<Duration> {
        match phase {
            Phase::RoleAssignment => Some(self.role_assignment),
            Phase::Night => Some(self.night),
            Phase::Day => Some(self.day),
            Phase::Voting => Some(self.voting),
            Phase::Elimination => Some(self.elimination),
            Phase::Lobby | Phase::GameOver => None,
        }
    }
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            role_assignment: Duration::from_secs(5),
            night: Duration::from_secs(30),
            day: Duration::from_secs(120),
            voting: Duration::from_secs(30),
            elimination: Duration::from_secs(8),
        }
    }
}

/// Optional special roles dealt alongside mafia and villagers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSet {
    pub doctor: bool,
    pub detective: bool,
}

impl Default for RoleSet {
    fn default() -> Self {
        Self {
            doctor: true,
            detective: true,
        }
    }
}

/// Settings every room is created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub durations: PhaseDurations,
    pub roles: RoleSet,
    pub chat_capacity: usize,
    /// Interval between `timer-update` events.
    pub tick_interval: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            durations: PhaseDurations::default(),
            roles: RoleSet::default(),
            chat_capacity: DEFAULT_CHAT_CAPACITY,
            tick_interval: Duration::from_secs(1),
        }
    }
}
