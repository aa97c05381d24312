//! Command-line configuration.

use std::time::Duration;

use clap::Parser;

use crate::domain::{
    GameConfig, PhaseDurations, RoleSet,
    settings::DEFAULT_CHAT_CAPACITY,
};

#[derive(Parser, Debug, Clone)]
#[command(name = "mafia-server", version, about = "Mafia game room and phase coordinator")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, short, default_value_t = 3001)]
    pub port: u16,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[arg(long, default_value_t = 5)]
    pub role_assignment_secs: u64,

    #[arg(long, default_value_t = 30)]
    pub night_secs: u64,

    #[arg(long, default_value_t = 120)]
    pub day_secs: u64,

    #[arg(long, default_value_t = 30)]
    pub voting_secs: u64,

    /// How long the elimination result is shown before the next night
    #[arg(long, default_value_t = 8)]
    pub elimination_secs: u64,

    /// Interval between timer-update events
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_millis: u64,

    /// Deal no doctor
    #[arg(long)]
    pub no_doctor: bool,

    /// Deal no detective
    #[arg(long)]
    pub no_detective: bool,

    /// Maximum chat messages kept per room
    #[arg(long, default_value_t = DEFAULT_CHAT_CAPACITY)]
    pub chat_capacity: usize,
}

impl ServerConfig {
    pub fn addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }

    /// Game rules derived from the flags.
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            durations: PhaseDurations {
                role_assignment: Duration::from_secs(self.role_assignment_secs),
                night: Duration::from_secs(self.night_secs),
                day: Duration::from_secs(self.day_secs),
                voting: Duration::from_secs(self.voting_secs),
                elimination: Duration::from_secs(self.elimination_secs),
            },
            roles: RoleSet {
                doctor: !self.no_doctor,
                detective: !self.no_detective,
            },
            chat_capacity: self.chat_capacity,
            tick_interval: Duration::from_millis(self.tick_millis),
        }
    }
}
