// src/playback/mod.rs

pub mod scheduler;

pub use scheduler::{
    PlaybackScheduler, PlaybackState, PlaybackStatus, SeekOutcome, SessionToken, TickOutcome,
};
