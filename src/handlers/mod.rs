pub mod api;
pub mod transcribe;

pub use api::health_check;
pub use transcribe::transcribe_audio;
