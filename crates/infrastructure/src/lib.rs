//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_session_storage;
mod json_file_session_storage;
mod recording_navigator;
mod reqwest_http_transport;
mod system_clock;

pub use in_memory_session_storage::InMemorySessionStorage;
pub use json_file_session_storage::JsonFileSessionStorage;
pub use recording_navigator::RecordingNavigator;
pub use reqwest_http_transport::ReqwestHttpTransport;
pub use system_clock::SystemClock;
