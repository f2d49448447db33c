mod api;
mod client;
pub mod crypto;
pub mod dto;
mod session;

pub use client::{NcmClient, NcmClientConfig};
pub use session::Session;
