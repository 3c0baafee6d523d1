// src/handlers/mod.rs

pub mod achievements;
pub mod admin;
pub mod auth;
pub mod feedback;
pub mod journey;
pub mod preferences;
pub mod session;
