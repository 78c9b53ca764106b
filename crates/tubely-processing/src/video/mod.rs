//! Video processing: orientation probing and fast-start rewriting.

pub mod faststart;
pub mod probe;

pub use faststart::{FastStartTranscoder, TranscodedFile};
pub use probe::MediaProbe;
