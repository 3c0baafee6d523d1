// src/session/mod.rs

pub mod controller;
pub mod registry;

pub use controller::{
    CompletionEvent, Phase, ProgressionController, ProgressionError, SessionSnapshot,
    SubmitOutcome, Verdict,
};
pub use registry::SessionRegistry;
