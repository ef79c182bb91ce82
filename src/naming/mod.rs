/// Naming request client
///
/// One outbound call per image: encoded bytes plus a style-derived
/// instruction in, a short title out. No streaming, no multi-turn state.

pub mod client;
pub mod prompt;

pub use client::{GenerationError, NamingClient, GENERATION_ERROR_MESSAGE};
