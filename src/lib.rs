//! Library crate for the CineSocial game room backend.
//!
//! Exposes the modules used by the binaries and the integration tests.

pub mod config;
pub mod dao;
pub mod dto;
pub mod error;
pub mod identity;
pub mod routes;
pub mod services;
pub mod state;
