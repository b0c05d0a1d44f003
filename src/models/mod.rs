pub mod ai;
pub mod notion;
pub mod slack;

pub use ai::*;
pub use notion::*;
pub use slack::*;
