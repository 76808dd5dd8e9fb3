use crate::{dto::game::GameSummary, error::ServiceError, state::SharedState};

/// Games that can host rooms.
pub fn list_games(state: &SharedState) -> Vec<GameSummary> {
    state.config().active_games().map(GameSummary::from).collect()
}

/// One game of the catalog.
pub fn get_game(state: &SharedState, slug: &str) -> Result<GameSummary, ServiceError> {
    state
        .config()
        .game(slug)
        .filter(|game| game.is_active)
        .map(GameSummary::from)
        .ok_or_else(|| ServiceError::NotFound(format!("game `{slug}` not found")))
}
