pub mod video;

pub use video::{AspectClass, VideoRecord};
