//! Defines the wrap configuration and the running transfer totals kept by the
//! settings store.
use alloc::collections::BTreeSet;
use core::str::FromStr;

use ibc_app_transfer_types::Amount;
use ibc_core::host::types::identifiers::{ChannelId, ClientId, PortId};
use ibc_core::primitives::prelude::*;

use crate::denom::denom_trace;
use crate::error::TokenWrapperError;
use crate::precision::MAX_DECIMAL_DIFFERENCE;

/// Configuration of the channel and token the middleware wraps.
///
/// Identifier fields are kept as plain strings: governance may populate them
/// one at a time, and a partially populated record must be representable
/// (and treated as not configured).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WrapSettings {
    /// Port on this chain the wrapped channel is bound to.
    pub native_port: String,
    /// Channel on this chain over which tokens are wrapped.
    pub native_channel: String,
    /// Port of the channel end on the counterparty chain.
    pub counterparty_port: String,
    /// Channel on the counterparty chain.
    pub counterparty_channel: String,
    /// Denomination of the token as the counterparty chain sends it.
    pub wrapped_denom: String,
    /// Light client tracking the counterparty chain on this chain.
    pub native_client_id: String,
    /// Light client tracking this chain on the counterparty chain.
    pub counterparty_client_id: String,
    /// Extra decimal places of the counterparty representation; amounts are
    /// converted with the factor `10^decimal_difference`.
    pub decimal_difference: u32,
    pub enabled: bool,
    pub operator_address: String,
    pub proposed_operator_address: String,
    pub pauser_addresses: BTreeSet<String>,
}

impl WrapSettings {
    /// Returns true iff the channel pair and the wrapped denomination are all
    /// set. Any partial configuration counts as not configured.
    pub fn is_configured(&self) -> bool {
        !self.native_port.is_empty()
            && !self.native_channel.is_empty()
            && !self.counterparty_port.is_empty()
            && !self.counterparty_channel.is_empty()
            && !self.wrapped_denom.is_empty()
    }

    /// Trace of the wrapped token as it leaves this chain over the native
    /// channel, e.g. `transfer/channel-0/uzig`.
    pub fn outbound_trace(&self) -> String {
        denom_trace(&self.native_port, &self.native_channel, &self.wrapped_denom)
    }

    /// Returns true if `address` may pause the middleware.
    pub fn is_pauser(&self, address: &str) -> bool {
        self.operator_address == address || self.pauser_addresses.contains(address)
    }

    /// Performs stateless validation of a fully populated configuration.
    pub fn validate_basic(&self) -> Result<(), TokenWrapperError> {
        if !self.is_configured() {
            return Err(TokenWrapperError::NotConfigured);
        }

        PortId::from_str(&self.native_port)?;
        ChannelId::from_str(&self.native_channel)?;
        PortId::from_str(&self.counterparty_port)?;
        ChannelId::from_str(&self.counterparty_channel)?;

        if self.native_client_id.is_empty() || self.counterparty_client_id.is_empty() {
            return Err(TokenWrapperError::MissingClientIds);
        }
        ClientId::from_str(&self.native_client_id)?;
        ClientId::from_str(&self.counterparty_client_id)?;

        if self.decimal_difference > MAX_DECIMAL_DIFFERENCE {
            return Err(TokenWrapperError::InvalidDecimalDifference {
                decimal_difference: self.decimal_difference,
                max: MAX_DECIMAL_DIFFERENCE,
            });
        }

        Ok(())
    }
}

/// Running totals of the value wrapped in and unwrapped out, in native
/// precision.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferTotals {
    pub transferred_in: Amount,
    pub transferred_out: Amount,
}

impl Default for TransferTotals {
    fn default() -> Self {
        Self {
            transferred_in: Amount::from(0u64),
            transferred_out: Amount::from(0u64),
        }
    }
}

impl TransferTotals {
    pub fn record_transferred_in(&mut self, amount: Amount) -> Result<(), TokenWrapperError> {
        self.transferred_in = self
            .transferred_in
            .checked_add(amount)
            .ok_or(TokenWrapperError::TotalsOverflow)?;
        Ok(())
    }

    pub fn record_transferred_out(&mut self, amount: Amount) -> Result<(), TokenWrapperError> {
        self.transferred_out = self
            .transferred_out
            .checked_add(amount)
            .ok_or(TokenWrapperError::TotalsOverflow)?;
        Ok(())
    }

    /// Takes a refunded amount back out of the outgoing total, flooring at
    /// zero.
    pub fn release_transferred_out(&mut self, amount: Amount) {
        self.transferred_out = self
            .transferred_out
            .checked_sub(amount)
            .unwrap_or_else(|| Amount::from(0u64));
    }
}
