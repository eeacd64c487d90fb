pub mod admin;
pub mod api;
pub mod config;
pub mod d1;
pub mod error;
pub mod pagination;
pub mod store;
pub mod submission;
pub mod turnstile;
pub mod util;

#[cfg(target_arch = "wasm32")]
mod worker_wasm;

#[cfg(target_arch = "wasm32")]
pub use worker_wasm::*;

/// This crate is intended to be built for Cloudflare Workers (wasm32-unknown-unknown).
///
/// Everything outside `worker_wasm` is host-independent so the comment logic can be
/// checked and tested on a typical dev machine.
#[cfg(not(target_arch = "wasm32"))]
pub fn build_target_hint() -> &'static str {
    "marginalia-worker is intended for wasm32-unknown-unknown (Cloudflare Workers)"
}
