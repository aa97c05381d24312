//! Pure game rules: dealing roles, tallying, and the win condition.

use std::collections::BTreeMap;

use rand::{Rng, seq::SliceRandom};

use super::{
    entity::{Role, Winner},
    settings::RoleSet,
    value_object::PlayerId,
};

/// Number of mafia seats for `player_count` players: one per four, at least one.
pub fn mafia_seats(player_count: usize) -> usize {
    (player_count / 4).max(1)
}

/// Build the role deck for `player_count` players, before shuffling.
///
/// Doctor and detective seats are only dealt when enough non-mafia seats
/// remain to keep at least one plain villager.
pub fn role_deck(player_count: usize, role_set: RoleSet) -> Vec<Role> {
    let mafia = mafia_seats(player_count).min(player_count);
    let mut deck = vec![Role::Mafia; mafia];
    let mut remaining = player_count - mafia;

    for (enabled, role) in [(role_set.doctor, Role::Doctor), (role_set.detective, Role::Detective)] {
        if enabled && remaining > 1 {
            deck.push(role);
            remaining -= 1;
        }
    }
    deck.extend(std::iter::repeat_n(Role::Villager, remaining));
    deck
}

/// Deal roles to `players` in a random order.
pub fn assign_roles<R: Rng + ?Sized>(
    players: &[PlayerId],
    role_set: RoleSet,
    rng: &mut R,
) -> Vec<(PlayerId, Role)> {
    let mut seats = players.to_vec();
    seats.shuffle(rng);
    seats
        .into_iter()
        .zip(role_deck(players.len(), role_set))
        .collect()
}

fn tally<'a>(targets: impl IntoIterator<Item = &'a PlayerId>) -> BTreeMap<&'a PlayerId, usize> {
    let mut counts = BTreeMap::new();
    for target in targets {
        *counts.entry(target).or_insert(0) += 1;
    }
    counts
}

/// The target with strictly more votes than every other, if any.
///
/// An exact tie at the top, or no votes at all, yields `None`.
pub fn strict_plurality<'a>(targets: impl IntoIterator<Item = &'a PlayerId>) -> Option<PlayerId> {
    let counts = tally(targets);
    let top = counts.values().copied().max()?;
    let mut leaders = counts.into_iter().filter(|(_, n)| *n == top);
    let (leader, _) = leaders.next()?;
    if leaders.next().is_some() {
        return None;
    }
    Some(leader.clone())
}

/// The mafia's chosen victim: plurality, with ties going to the lowest player id.
///
/// "Lowest" is lexicographic `String` order, so `"p10"` sorts before `"p2"`.
pub fn mafia_victim<'a>(targets: impl IntoIterator<Item = &'a PlayerId>) -> Option<PlayerId> {
    let counts = tally(targets);
    let top = counts.values().copied().max()?;
    // BTreeMap iterates in ascending id order, so the first leader is the lowest id.
    counts
        .into_iter()
        .find(|(_, n)| *n == top)
        .map(|(id, _)| id.clone())
}

/// Win condition evaluated over living players.
pub fn winner(living_mafia: usize, living_others: usize) -> Option<Winner> {
    if living_mafia == 0 {
        Some(Winner::Villagers)
    } else if living_mafia >= living_others {
        Some(Winner::Mafia)
    } else {
        None
    }
}
