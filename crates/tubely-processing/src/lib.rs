//! Media processing for uploads: external process execution, ffprobe-based
//! aspect classification, fast-start rewriting and media-type validation.

pub mod error;
pub mod process;
pub mod validator;
pub mod video;

pub use error::{ProcessingError, ProcessingResult};
pub use process::{ProcessOutput, ProcessRunner, TokioProcessRunner};
pub use validator::MediaTypeRule;
pub use video::{FastStartTranscoder, MediaProbe, TranscodedFile};
