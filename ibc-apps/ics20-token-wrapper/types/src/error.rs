//! Defines the token wrapper error type
use displaydoc::Display;
use ibc_app_transfer_types::error::TokenTransferError;
use ibc_app_transfer_types::Amount;
use ibc_core::channel::types::acknowledgement::StatusValue;
use ibc_core::channel::types::channel::State;
use ibc_core::host::types::error::IdentifierError;
use ibc_core::host::types::identifiers::{ChannelId, ConnectionId, PortId};
use ibc_core::primitives::prelude::*;

#[derive(Display, Debug)]
pub enum TokenWrapperError {
    /// channel not found for port_id `{port_id}` and channel_id `{channel_id}`
    ChannelNotFound {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// channel `{port_id}/{channel_id}` is not open: current state is `{state}`
    ChannelNotOpen {
        port_id: PortId,
        channel_id: ChannelId,
        state: State,
    },
    /// counterparty port and channel are not configured
    MissingCounterpartyConfig,
    /// channel `{port_id}/{channel_id}` has no counterparty channel
    MissingCounterpartyChannel {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// counterparty mismatch: expected `{expected}`, got `{actual}`
    CounterpartyMismatch { expected: String, actual: String },
    /// native and counterparty client ids are not configured
    MissingClientIds,
    /// channel `{port_id}/{channel_id}` has no connection hops
    EmptyConnectionHops {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// connection not found: `{connection_id}`
    ConnectionNotFound { connection_id: ConnectionId },
    /// native client id mismatch: expected `{expected}`, got `{actual}`
    ClientIdMismatch { expected: String, actual: String },
    /// counterparty client id mismatch: expected `{expected}`, got `{actual}`
    CounterpartyClientIdMismatch { expected: String, actual: String },
    /// token wrapper settings are not configured
    NotConfigured,
    /// token wrapper is disabled
    ModuleDisabled,
    /// invalid decimal difference `{decimal_difference}`: must not exceed `{max}`
    InvalidDecimalDifference { decimal_difference: u32, max: u32 },
    /// invalid identifier: `{0}`
    InvalidIdentifier(IdentifierError),
    /// failed to deserialize packet data
    PacketDataDeserialization,
    /// failed to serialize packet data
    PacketDataSerialization,
    /// failed to deserialize acknowledgement
    AckDeserialization,
    /// sender address is empty
    EmptySender,
    /// receiver address is empty
    EmptyReceiver,
    /// failed to parse `{address}` as an account
    ParseAccountFailure { address: String },
    /// amount must be positive
    NonPositiveAmount,
    /// converting `{amount}` with decimal difference `{decimal_difference}` yields a non-positive amount
    NonPositiveResult {
        amount: Amount,
        decimal_difference: u32,
    },
    /// converting `{amount}` with decimal difference `{decimal_difference}` overflows
    ConversionOverflow {
        amount: Amount,
        decimal_difference: u32,
    },
    /// insufficient funds: `{holder}` holds `{available}`, needs `{required}`
    InsufficientFunds {
        holder: String,
        required: String,
        available: String,
    },
    /// sender does not hold the unescrowed coin `{coin}`
    MissingCoin { coin: String },
    /// transfer totals overflow
    TotalsOverflow,
    /// bank operation failed: `{description}`
    Bank { description: String },
    /// host failure: `{description}`
    Host { description: String },
    /// invalid denomination `{denom}`: {description}
    InvalidDenom { denom: String, description: String },
    /// token transfer error: `{0}`
    TokenTransfer(TokenTransferError),
}

#[cfg(feature = "std")]
impl std::error::Error for TokenWrapperError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::InvalidIdentifier(e) => Some(e),
            Self::TokenTransfer(e) => Some(e),
            _ => None,
        }
    }
}

impl From<IdentifierError> for TokenWrapperError {
    fn from(err: IdentifierError) -> Self {
        Self::InvalidIdentifier(err)
    }
}

impl From<TokenTransferError> for TokenWrapperError {
    fn from(err: TokenTransferError) -> Self {
        Self::TokenTransfer(err)
    }
}

impl From<TokenWrapperError> for StatusValue {
    fn from(err: TokenWrapperError) -> Self {
        StatusValue::new(err.to_string()).expect("error message must not be empty")
    }
}
