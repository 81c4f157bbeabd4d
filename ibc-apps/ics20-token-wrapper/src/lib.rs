//! Implementation of the ICS-20 token wrapper middleware.
//!
//! The middleware sits between the core channel handler and an ICS-20
//! transfer application. For one designated channel it swaps received
//! vouchers for the chain's native token, scaled down to native precision,
//! and swaps outgoing native tokens back into vouchers, scaled up to the
//! counterparty precision. Every other packet passes through untouched.
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

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod accounting;
pub mod context;
pub mod handler;
pub mod module;
pub mod stack;
pub mod validation;

/// Re-exports the token wrapper domain types.
pub mod types {
    #[doc(inline)]
    pub use ibc_app_token_wrapper_types::*;
}
