mod client;

pub use client::{GrokClient, grok_client};
