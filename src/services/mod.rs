pub mod catalog;
pub mod intent;
pub mod recommendations;
pub mod scorer;
pub mod transcription;

pub use catalog::ActivityCatalog;
pub use intent::IntentExtractor;
pub use transcription::{Transcriber, WhisperTranscriber};
