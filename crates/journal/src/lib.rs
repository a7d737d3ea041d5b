//! Journal sessions: drawing and editing walks, sampling their elevation
//! and ranking what was recorded.

pub mod config;
pub mod editor;
pub mod highlights;
pub mod runtime;
pub mod sampler;
pub mod session;
pub mod stats;
pub mod store;
pub mod surface;

pub use config::JournalConfig;
pub use runtime::{run, SessionError, SessionRef, Services};
pub use session::{Effect, EntryDraft, Event, Mode, Session};
pub use store::{JsonFileStore, MemoryStore, Store, StoreError};
