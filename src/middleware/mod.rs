mod ack;
mod extractor;

pub use ack::*;
pub use extractor::*;
