pub mod element;
pub mod event;
pub mod process;

pub use element::ElementDescriptor;
pub use event::{EventRecord, EventType};
pub use process::Process;
