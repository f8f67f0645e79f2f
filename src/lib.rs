#![no_std]

pub mod audio;
pub mod drivers;
pub mod time;

pub use audio::{SharedToneGen, ToneError};
pub use drivers::audio::{
    tone_gen::{ToneGen, ToneSession, ToneState},
    ToneTimer,
};
pub use time::{Tick, TickSource};
