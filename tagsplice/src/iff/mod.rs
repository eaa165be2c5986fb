//! RIFF chunk handling and the WAV container

pub(crate) mod chunk;
pub(crate) mod wav;
