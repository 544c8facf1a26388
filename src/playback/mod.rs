pub mod player;
pub mod sink;

pub use player::{PlaybackManager, MIN_PLAYABLE_BYTES};
pub use sink::{AudioGate, NullGate, NullSink, PlaybackSink, RodioSink, SoundHandle};
