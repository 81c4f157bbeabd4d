//! Derivation of the hashed voucher denominations that ICS-20 mints for
//! tokens arriving over a channel.
use ibc_core::primitives::prelude::*;
use sha2::{Digest, Sha256};

/// Prefix of every hashed voucher denomination, e.g. `ibc/27394FB0...`.
pub const IBC_DENOM_PREFIX: &str = "ibc";

/// Returns the trace prefix a hop over `port_id`/`channel_id` adds to a
/// denomination, i.e. `{port_id}/{channel_id}/`.
pub fn denom_trace_prefix(port_id: &str, channel_id: &str) -> String {
    format!("{port_id}/{channel_id}/")
}

/// Returns the full trace of `denom` after one more hop over
/// `port_id`/`channel_id`.
///
/// Multi-hop traces read left to right from the outermost to the innermost
/// hop, so the new hop is prepended.
pub fn denom_trace(port_id: &str, channel_id: &str, denom: &str) -> String {
    let mut trace = denom_trace_prefix(port_id, channel_id);
    trace.push_str(denom);
    trace
}

/// Hashes a full denomination trace into its voucher form:
/// `ibc/` followed by the upper-case hex SHA-256 of the trace.
pub fn hashed_denom(trace: &str) -> String {
    let digest = Sha256::digest(trace.as_bytes());
    format!("{IBC_DENOM_PREFIX}/{}", hex::encode_upper(digest))
}

/// Returns the voucher denomination of `denom` received over
/// `port_id`/`channel_id`.
pub fn voucher_denom(port_id: &str, channel_id: &str, denom: &str) -> String {
    hashed_denom(&denom_trace(port_id, channel_id, denom))
}
