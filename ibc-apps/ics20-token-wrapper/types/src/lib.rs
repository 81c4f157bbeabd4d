//! Data structures of the ICS-20 token wrapper middleware, which converts a
//! token between its counterparty-chain precision and its native precision
//! while it crosses one designated transfer channel.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::disallowed_methods, clippy::disallowed_types))]
#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod denom;
mod precision;
mod settings;

pub use denom::*;
pub use precision::*;
pub use settings::*;
pub mod error;
pub mod events;

/// Re-exports the ICS-20 amount type and its backing integer for convenience.
pub use ibc_app_transfer_types::{Amount, U256};

/// Module identifier of the token wrapper middleware.
pub const MODULE_ID_STR: &str = "tokenwrapper";
