//! The per-room game-phase state machine.
//!
//! `lobby → role-assignment → night → day → voting → elimination →
//! (night | game-over)`. Every transition goes through [`Room::enter_phase`],
//! which bumps `phase_seq` so that timer signals from an earlier phase are
//! recognised as stale.

use super::{
    entity::{EliminationCause, NightAction, Phase, Role, Room, Winner},
    error::RoomError,
    event::{Outgoing, RoomEvent},
    rules,
    value_object::PlayerId,
};

impl Room {
    fn enter_phase(&mut self, phase: Phase) -> Outgoing {
        self.phase = phase;
        self.phase_seq += 1;
        let timer = self
            .config
            .durations
            .for_phase(phase)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Outgoing::room(RoomEvent::PhaseChanged {
            phase,
            timer,
            day_count: self.day_count,
            night_count: self.night_count,
        })
    }

    pub(crate) fn begin_role_assignment(&mut self) -> Vec<Outgoing> {
        self.day_count = 0;
        self.night_count = 0;
        self.votes.clear();
        self.night_actions.clear();
        self.confirmations.clear();
        self.last_eliminated = None;
        self.winner = None;

        let ids: Vec<PlayerId> = self.players.iter().map(|p| p.id.clone()).collect();
        let dealt = rules::assign_roles(&ids, self.config.roles, &mut rand::rng());
        for (id, role) in dealt {
            if let Some(player) = self.get_player_mut(&id) {
                player.role = Some(role);
                player.is_alive = true;
            }
        }

        let phase_changed = self.enter_phase(Phase::RoleAssignment);
        let mafia = self.mafia_ids();
        let mut events = vec![Outgoing::room(RoomEvent::GameStarted {
            phase: self.phase,
            players: self.players.clone(),
        })];
        for player in &self.players {
            let Some(role) = player.role else { continue };
            let teammates = if role == Role::Mafia {
                mafia.iter().filter(|id| **id != player.id).cloned().collect()
            } else {
                Vec::new()
            };
            events.push(Outgoing::player(
                player.id.clone(),
                RoomEvent::RoleAssigned {
                    player_id: player.id.clone(),
                    role,
                    teammates,
                },
            ));
        }
        events.push(phase_changed);
        events
    }

    /// Acknowledge a role during role assignment. Once everyone has confirmed
    /// the first night begins without waiting for the timer.
    pub fn confirm_role(&mut self, player_id: &PlayerId) -> Result<Vec<Outgoing>, RoomError> {
        self.ensure_phase(Phase::RoleAssignment)?;
        self.member(player_id)?;
        if !self.confirmations.insert(player_id.clone()) {
            return Ok(Vec::new());
        }

        let mut events = vec![Outgoing::room(RoomEvent::RoleConfirmed {
            player_id: player_id.clone(),
        })];
        if self.all_confirmed() {
            events.extend(self.begin_night());
        }
        Ok(events)
    }

    fn all_confirmed(&self) -> bool {
        self.players
            .iter()
            .all(|p| self.confirmations.contains(&p.id))
    }

    fn begin_night(&mut self) -> Vec<Outgoing> {
        self.night_count += 1;
        self.night_actions.clear();
        vec![self.enter_phase(Phase::Night)]
    }

    /// Living players entitled to a night action.
    fn night_actors(&self) -> impl Iterator<Item = &PlayerId> {
        self.living()
            .filter(|p| p.role.is_some_and(Role::has_night_action))
            .map(|p| &p.id)
    }

    fn all_night_actions_in(&self) -> bool {
        self.night_actors()
            .all(|id| self.night_actions.contains_key(id))
    }

    /// Record a night action.
    ///
    /// # Errors
    ///
    /// Outside the night, from a dead player, with a claimed role that is not
    /// the actor's own, from a role without a night action, twice in one
    /// night, or against an invalid target.
    pub fn submit_night_action(
        &mut self,
        actor_id: &PlayerId,
        target_id: &PlayerId,
        claimed_role: Role,
    ) -> Result<Vec<Outgoing>, RoomError> {
        self.ensure_phase(Phase::Night)?;
        let actor = self.member(actor_id)?;
        if !actor.is_alive {
            return Err(RoomError::PlayerDead);
        }
        let role = actor.role.ok_or(RoomError::RoleMismatch(claimed_role))?;
        if role != claimed_role {
            return Err(RoomError::RoleMismatch(claimed_role));
        }
        if !role.has_night_action() {
            return Err(RoomError::NoNightAction(role));
        }
        if self.night_actions.contains_key(actor_id) {
            return Err(RoomError::ActionAlreadySubmitted);
        }

        let target = self
            .get_player(target_id)
            .filter(|t| t.is_alive)
            .ok_or(RoomError::InvalidTarget)?;
        let invalid = match role {
            Role::Mafia => target.is_mafia(),
            Role::Detective => target_id == actor_id,
            Role::Doctor | Role::Villager => false,
        };
        if invalid {
            return Err(RoomError::InvalidTarget);
        }

        self.night_actions.insert(
            actor_id.clone(),
            NightAction {
                role,
                target: target_id.clone(),
            },
        );

        let received = RoomEvent::NightActionReceived {
            player_id: actor_id.clone(),
            target_id: target_id.clone(),
            role,
        };
        let mut events = vec![if role == Role::Mafia {
            Outgoing::mafia(received)
        } else {
            Outgoing::player(actor_id.clone(), received)
        }];
        if self.all_night_actions_in() {
            events.extend(self.resolve_night());
        }
        Ok(events)
    }

    fn resolve_night(&mut self) -> Vec<Outgoing> {
        let actions = std::mem::take(&mut self.night_actions);
        let mut events = Vec::new();

        let protected = actions
            .values()
            .find(|a| a.role == Role::Doctor)
            .map(|a| a.target.clone());
        let victim = rules::mafia_victim(
            actions
                .values()
                .filter(|a| a.role == Role::Mafia)
                .map(|a| &a.target),
        );

        for (detective, action) in actions.iter().filter(|(_, a)| a.role == Role::Detective) {
            let is_mafia = self
                .get_player(&action.target)
                .is_some_and(|t| t.is_mafia());
            events.push(Outgoing::player(
                detective.clone(),
                RoomEvent::InvestigationResult {
                    target_id: action.target.clone(),
                    is_mafia,
                },
            ));
        }

        if let Some(victim) = victim.filter(|v| protected.as_ref() != Some(v)) {
            events.extend(self.eliminate(&victim, EliminationCause::Night));
        }

        match self.check_winner() {
            Some(winner) => events.extend(self.finish(winner)),
            None => {
                self.day_count += 1;
                events.push(self.enter_phase(Phase::Day));
            }
        }
        events
    }

    fn eliminate(&mut self, player_id: &PlayerId, cause: EliminationCause) -> Vec<Outgoing> {
        let Some(player) = self.get_player_mut(player_id).filter(|p| p.is_alive) else {
            return Vec::new();
        };
        player.is_alive = false;
        let snapshot = player.clone();
        self.last_eliminated = Some(snapshot.clone());
        vec![Outgoing::room(RoomEvent::PlayerEliminated {
            player: snapshot,
            cause,
        })]
    }

    fn begin_voting(&mut self) -> Vec<Outgoing> {
        self.votes.clear();
        vec![self.enter_phase(Phase::Voting)]
    }

    /// Cast (or change) a vote. `None` abstains.
    ///
    /// # Errors
    ///
    /// Outside voting, from a dead voter, for oneself, or for a target that
    /// is not a living member.
    pub fn cast_vote(
        &mut self,
        voter_id: &PlayerId,
        target_id: Option<&PlayerId>,
    ) -> Result<Vec<Outgoing>, RoomError> {
        self.ensure_phase(Phase::Voting)?;
        if !self.member(voter_id)?.is_alive {
            return Err(RoomError::PlayerDead);
        }
        if let Some(target_id) = target_id {
            if target_id == voter_id {
                return Err(RoomError::SelfVote);
            }
            if !self.get_player(target_id).is_some_and(|t| t.is_alive) {
                return Err(RoomError::InvalidTarget);
            }
        }

        self.votes.insert(voter_id.clone(), target_id.cloned());
        let mut events = vec![Outgoing::room(RoomEvent::VoteReceived {
            voter_id: voter_id.clone(),
            target_id: target_id.cloned(),
        })];
        if self.all_votes_in() {
            events.extend(self.resolve_votes());
        }
        Ok(events)
    }

    fn all_votes_in(&self) -> bool {
        self.living().all(|p| self.votes.contains_key(&p.id))
    }

    fn resolve_votes(&mut self) -> Vec<Outgoing> {
        let votes = std::mem::take(&mut self.votes);
        let condemned = rules::strict_plurality(votes.values().flatten());

        let mut events = Vec::new();
        if let Some(condemned) = condemned {
            events.extend(self.eliminate(&condemned, EliminationCause::Vote));
        }
        events.push(self.enter_phase(Phase::Elimination));
        if let Some(winner) = self.check_winner() {
            events.extend(self.finish(winner));
        }
        events
    }

    /// Evaluate the win condition over living players.
    pub fn check_winner(&self) -> Option<Winner> {
        let (mafia, others): (Vec<_>, Vec<_>) = self.living().partition(|p| p.is_mafia());
        rules::winner(mafia.len(), others.len())
    }

    fn finish(&mut self, winner: Winner) -> Vec<Outgoing> {
        self.winner = Some(winner);
        self.votes.clear();
        self.night_actions.clear();
        let phase_changed = self.enter_phase(Phase::GameOver);
        vec![
            phase_changed,
            Outgoing::room(RoomEvent::GameOver {
                winner,
                players: self.players.clone(),
            }),
        ]
    }

    /// Host-only return from `game-over` to a fresh lobby.
    pub fn reset(&mut self, requester: &PlayerId) -> Result<Vec<Outgoing>, RoomError> {
        self.ensure_phase(Phase::GameOver)?;
        self.ensure_host(requester)?;

        for player in &mut self.players {
            player.role = None;
            player.is_ready = false;
            player.is_alive = true;
        }
        self.day_count = 0;
        self.night_count = 0;
        self.votes.clear();
        self.night_actions.clear();
        self.confirmations.clear();
        self.chat_log.clear();
        self.last_eliminated = None;
        self.winner = None;

        let phase_changed = self.enter_phase(Phase::Lobby);
        Ok(vec![
            Outgoing::room(RoomEvent::GameReset {
                players: self.players.clone(),
            }),
            phase_changed,
        ])
    }

    /// Advance the state machine when the phase timer runs out.
    ///
    /// Signals armed for an earlier phase (`seq` mismatch) are ignored.
    pub fn on_timer_expired(&mut self, seq: u64) -> Vec<Outgoing> {
        if seq != self.phase_seq {
            return Vec::new();
        }
        match self.phase {
            Phase::RoleAssignment | Phase::Elimination => self.begin_night(),
            Phase::Night => self.resolve_night(),
            Phase::Day => self.begin_voting(),
            Phase::Voting => self.resolve_votes(),
            Phase::Lobby | Phase::GameOver => Vec::new(),
        }
    }

    /// Countdown notification for the current phase.
    pub fn on_timer_tick(&self, seq: u64, remaining_secs: u64) -> Vec<Outgoing> {
        if seq != self.phase_seq || !self.phase.is_in_game() {
            return Vec::new();
        }
        vec![Outgoing::room(RoomEvent::TimerUpdate {
            timer: remaining_secs,
        })]
    }

    /// Keep an in-progress game consistent after a player has been removed.
    pub(crate) fn after_departure(&mut self, removed: &PlayerId) -> Vec<Outgoing> {
        if !self.phase.is_in_game() {
            return Vec::new();
        }
        self.confirmations.remove(removed);
        self.votes.remove(removed);
        self.votes.retain(|_, target| target.as_ref() != Some(removed));
        self.night_actions.remove(removed);
        self.night_actions.retain(|_, action| &action.target != removed);

        if let Some(winner) = self.check_winner() {
            return self.finish(winner);
        }
        match self.phase {
            Phase::RoleAssignment if self.all_confirmed() => self.begin_night(),
            Phase::Night if self.all_night_actions_in() => self.resolve_night(),
            Phase::Voting if self.all_votes_in() => self.resolve_votes(),
            _ => Vec::new(),
        }
    }
}
