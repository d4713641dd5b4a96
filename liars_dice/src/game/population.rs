//! Keyed store of all games.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock},
};

use super::entities::{Game, GameId};

/// Handle to a single game's lock.
pub type GameHandle = Arc<Mutex<Game>>;

/// Mapping from game id to game, shared between the engine and its caller.
///
/// Each game sits behind its own mutex. Engine operations hold that lock for
/// their whole validate-then-mutate sequence, so actions on one game are
/// serialized while different games proceed independently.
#[derive(Debug, Default)]
pub struct GamePopulation {
    games: RwLock<HashMap<GameId, GameHandle>>,
}

impl GamePopulation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a game, returning the handle of the replaced one.
    pub fn insert(&self, game_id: impl Into<GameId>, game: Game) -> Option<GameHandle> {
        let mut games = self.games.write().unwrap_or_else(PoisonError::into_inner);
        games.insert(game_id.into(), Arc::new(Mutex::new(game)))
    }

    #[must_use]
    pub fn get(&self, game_id: &str) -> Option<GameHandle> {
        let games = self.games.read().unwrap_or_else(PoisonError::into_inner);
        games.get(game_id).cloned()
    }

    #[must_use]
    pub fn contains(&self, game_id: &str) -> bool {
        let games = self.games.read().unwrap_or_else(PoisonError::into_inner);
        games.contains_key(game_id)
    }

    /// Remove a game. The engine never calls this; removal is up to the owner.
    pub fn remove(&self, game_id: &str) -> Option<GameHandle> {
        let mut games = self.games.write().unwrap_or_else(PoisonError::into_inner);
        games.remove(game_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        let games = self.games.read().unwrap_or_else(PoisonError::into_inner);
        games.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of a game's current state.
    #[must_use]
    pub fn snapshot(&self, game_id: &str) -> Option<Game> {
        let handle = self.get(game_id)?;
        let game = lock(&handle).clone();
        Some(game)
    }

    /// Whether any game other than `except` satisfies `predicate`.
    ///
    /// Games are locked one at a time. Callers must not hold another game's
    /// lock while calling this.
    pub fn any_game(&self, except: Option<&str>, mut predicate: impl FnMut(&Game) -> bool) -> bool {
        let handles: Vec<GameHandle> = {
            let games = self.games.read().unwrap_or_else(PoisonError::into_inner);
            games
                .iter()
                .filter(|(id, _)| except != Some(id.as_str()))
                .map(|(_, handle)| handle.clone())
                .collect()
        };

        handles.iter().any(|handle| predicate(&*lock(handle)))
    }
}

/// Lock a game, recovering the data if a previous holder panicked.
pub(crate) fn lock(handle: &GameHandle) -> MutexGuard<'_, Game> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}
