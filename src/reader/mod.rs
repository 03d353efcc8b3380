mod builder;
mod file;
mod sequence;
mod shared;

pub use builder::TwoBitReaderBuilder;
pub use file::TwoBitFile;
pub use sequence::SequenceHandle;
pub use shared::SharedTwoBitFile;
