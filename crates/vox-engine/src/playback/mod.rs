//! Audio playback abstraction.
//!
//! Playback consumes audio produced by the cache; the cache never calls it.

mod command;
mod traits;

pub use command::CommandPlayer;
pub use traits::AudioPlayer;
