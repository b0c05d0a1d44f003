mod bridge_service;
mod document_assembler;
mod notion_service;
mod payload_service;
mod signature_service;
mod slack_service;
mod summary_service;
mod thread_collector;

pub use bridge_service::*;
pub use document_assembler::*;
pub use notion_service::*;
pub use payload_service::*;
pub use signature_service::*;
pub use slack_service::*;
pub use summary_service::*;
pub use thread_collector::*;
