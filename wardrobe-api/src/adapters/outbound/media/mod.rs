mod avatar_processor;

pub use avatar_processor::JpegAvatarProcessor;
