//! Domain factories for creating domain entities and value objects.

use rand::Rng;

use super::{
    error::ValueObjectError,
    value_object::{ROOM_CODE_ALPHABET, ROOM_CODE_LENGTH, RoomCode},
};

/// Upper bound on regeneration attempts before giving up on a code.
pub const MAX_CODE_ATTEMPTS: usize = 64;

/// Factory for generating RoomCode instances.
///
/// This factory encapsulates the logic for generating new room codes,
/// separating the generation concern from the validation logic in RoomCode.
pub struct RoomCodeFactory;

impl RoomCodeFactory {
    /// Draw a random 6-character code from the 36-symbol alphabet.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for consistency
    /// with the domain error handling pattern.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Result<RoomCode, ValueObjectError> {
        let code: String = (0..ROOM_CODE_LENGTH)
            .map(|_| {
                let index = rng.random_range(0..ROOM_CODE_ALPHABET.len());
                char::from(ROOM_CODE_ALPHABET[index])
            })
            .collect();
        RoomCode::new(code)
    }

    /// Draw codes until one is not `taken`.
    ///
    /// Returns `None` if `MAX_CODE_ATTEMPTS` draws all collided.
    pub fn generate_unique<R: Rng + ?Sized>(
        rng: &mut R,
        taken: impl Fn(&RoomCode) -> bool,
    ) -> Option<RoomCode> {
        (0..MAX_CODE_ATTEMPTS)
            .filter_map(|_| Self::generate(rng).ok())
            .find(|code| !taken(code))
    }
}
