// src/models/mod.rs

pub mod badge;
pub mod challenge;
pub mod feedback;
pub mod journey;
pub mod progress;
pub mod submission;
pub mod user;
