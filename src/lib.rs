pub mod cli;
pub mod client;
pub mod core;
pub mod request;
pub mod stream;

pub use client::ChatClient;
pub use crate::core::{Config, StreamingError};
pub use request::{Model, StreamRequest};
pub use stream::{ContentStream, ReadErrorPolicy};
