//! Application-level configuration loading, including the game catalog and secret words.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use rand::{rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "CINESOCIAL_GAMES_CONFIG_PATH";
/// Word used when a game ships without any word list.
const FALLBACK_WORD: &str = "cinema";

/// Kind of game a definition describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    /// One player draws, the others guess.
    DrawGuess,
    /// Match actors to the movies they played in.
    ActorMovie,
    /// Trivia questions about movies.
    MovieQuiz,
    /// Reconstruct a movie from scrambled clues.
    MoviePuzzle,
}

/// Static description of a playable game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDefinition {
    /// Stable identifier used by rooms.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Short presentation text.
    pub description: String,
    /// Kind of game.
    pub game_type: GameType,
    /// Players required before the host may start.
    pub min_players: u32,
    /// Default room capacity.
    pub max_players: u32,
    /// Expected duration in minutes.
    pub duration_minutes: u32,
    /// Points awarded for a correct guess.
    pub points: i32,
    /// Inactive games are hidden and cannot host new rooms.
    pub is_active: bool,
    /// Pool of secret words drawn for each round.
    pub words: Vec<String>,
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    games: Vec<GameDefinition>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the built-in catalog.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        count = app_config.games.len(),
                        "loaded game catalog from config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Build a configuration from an explicit catalog.
    pub fn from_games(games: Vec<GameDefinition>) -> Self {
        Self { games }
    }

    /// Every game of the catalog, active or not.
    pub fn games(&self) -> &[GameDefinition] {
        &self.games
    }

    /// Games that can currently host rooms.
    pub fn active_games(&self) -> impl Iterator<Item = &GameDefinition> {
        self.games.iter().filter(|game| game.is_active)
    }

    /// Look up a game by slug.
    pub fn game(&self, slug: &str) -> Option<&GameDefinition> {
        self.games.iter().find(|game| game.slug == slug)
    }

    /// Game used when a room is created without naming one: the first active entry.
    pub fn default_game(&self) -> Option<&GameDefinition> {
        self.active_games().next()
    }
}

impl GameDefinition {
    /// Draw a random secret word for a new round.
    pub fn pick_word(&self) -> String {
        self.words
            .choose(&mut rng())
            .cloned()
            .unwrap_or_else(|| FALLBACK_WORD.to_owned())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            games: default_games(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    games: Vec<RawGame>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let games = value.games.into_iter().map(Into::into).collect::<Vec<_>>();
        Self { games }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of a single game entry inside the configuration file.
struct RawGame {
    slug: String,
    name: String,
    #[serde(default)]
    description: String,
    game_type: GameType,
    #[serde(default = "default_min_players")]
    min_players: u32,
    #[serde(default = "default_max_players")]
    max_players: u32,
    #[serde(default = "default_duration")]
    duration_minutes: u32,
    #[serde(default = "default_points")]
    points: i32,
    #[serde(default = "default_active")]
    is_active: bool,
    #[serde(default)]
    words: Vec<String>,
}

fn default_min_players() -> u32 {
    2
}

fn default_max_players() -> u32 {
    4
}

fn default_duration() -> u32 {
    15
}

fn default_points() -> i32 {
    100
}

fn default_active() -> bool {
    true
}

impl From<RawGame> for GameDefinition {
    fn from(value: RawGame) -> Self {
        let words = value
            .words
            .into_iter()
            .map(|word| word.trim().to_owned())
            .filter(|word| !word.is_empty())
            .collect();

        Self {
            slug: value.slug,
            name: value.name,
            description: value.description,
            game_type: value.game_type,
            min_players: value.min_players,
            max_players: value.max_players.max(value.min_players),
            duration_minutes: value.duration_minutes,
            points: value.points,
            is_active: value.is_active,
            words,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|word| (*word).to_owned()).collect()
}

/// Built-in catalog shipped with the binary.
fn default_games() -> Vec<GameDefinition> {
    let movies = words(&[
        "Inception",
        "Titanic",
        "Jaws",
        "Alien",
        "Casablanca",
        "Vertigo",
        "Amelie",
        "Gladiator",
        "Interstellar",
        "Psycho",
    ]);

    vec![
        GameDefinition {
            slug: "draw_guess".into(),
            name: "Draw & Guess".into(),
            description: "One player draws a movie, everyone else races to name it.".into(),
            game_type: GameType::DrawGuess,
            min_players: default_min_players(),
            max_players: default_max_players(),
            duration_minutes: default_duration(),
            points: default_points(),
            is_active: true,
            words: words(&[
                "popcorn", "director", "camera", "ticket", "oscar", "villain", "spaceship",
                "dinosaur", "elephant", "robot", "pirate", "vampire",
            ]),
        },
        GameDefinition {
            slug: "actor_movie".into(),
            name: "Actor & Movie".into(),
            description: "Name the movie an actor starred in.".into(),
            game_type: GameType::ActorMovie,
            min_players: default_min_players(),
            max_players: default_max_players(),
            duration_minutes: default_duration(),
            points: default_points(),
            is_active: true,
            words: movies.clone(),
        },
        GameDefinition {
            slug: "movie_quiz".into(),
            name: "Movie Quiz".into(),
            description: "Trivia rounds about cinema history.".into(),
            game_type: GameType::MovieQuiz,
            min_players: default_min_players(),
            max_players: default_max_players(),
            duration_minutes: default_duration(),
            points: default_points(),
            is_active: true,
            words: movies.clone(),
        },
        GameDefinition {
            slug: "movie_puzzle".into(),
            name: "Movie Puzzle".into(),
            description: "Rebuild a movie title from scrambled clues.".into(),
            game_type: GameType::MoviePuzzle,
            min_players: default_min_players(),
            max_players: default_max_players(),
            duration_minutes: default_duration(),
            points: default_points(),
            is_active: true,
            words: movies,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_game_fills_defaults_and_trims_words() {
        let raw: RawConfig = serde_json::from_str(
            r#"{"games":[{"slug":"g","name":"G","game_type":"draw_guess","words":[" cat ",""]}]}"#,
        )
        .unwrap();
        let config = AppConfig::from(raw);
        let game = config.game("g").unwrap();

        assert_eq!(game.min_players, 2);
        assert_eq!(game.max_players, 4);
        assert_eq!(game.points, 100);
        assert!(game.is_active);
        assert_eq!(game.words, vec!["cat".to_owned()]);
    }

    #[test]
    fn pick_word_falls_back_when_list_is_empty() {
        let mut game = AppConfig::default().games()[0].clone();
        game.words.clear();
        assert_eq!(game.pick_word(), FALLBACK_WORD);
    }

    #[test]
    fn default_game_is_draw_guess() {
        let config = AppConfig::default();
        assert_eq!(config.default_game().unwrap().slug, "draw_guess");
        assert_eq!(config.active_games().count(), 4);
    }
}
