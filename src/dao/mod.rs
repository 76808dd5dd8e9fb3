/// Database model definitions.
pub mod models;
/// Room, player, round, guess and chat persistence.
pub mod room_store;
/// Storage abstraction layer for database operations.
pub mod storage;
