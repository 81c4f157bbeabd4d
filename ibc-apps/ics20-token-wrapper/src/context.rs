//! Defines the role traits the host implements for the token wrapper.
//!
//! Each trait covers a single concern so that the validation engine, the
//! accounting engine and the packet handlers depend only on the capabilities
//! they actually use.

use ibc_app_token_wrapper_types::error::TokenWrapperError;
use ibc_app_token_wrapper_types::{Amount, TransferTotals, WrapSettings};
use ibc_app_transfer_types::BaseCoin;
use ibc_core::channel::types::channel::ChannelEnd;
use ibc_core::channel::types::packet::Packet;
use ibc_core::connection::types::ConnectionEnd;
use ibc_core::host::types::identifiers::{ChannelId, ConnectionId, PortId, Sequence};
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;
use ibc_core::router::types::event::ModuleEvent;

/// Read access to the wrap configuration and the running totals.
pub trait WrapSettingsReader {
    fn wrap_settings(&self) -> Result<WrapSettings, TokenWrapperError>;

    fn transfer_totals(&self) -> Result<TransferTotals, TokenWrapperError>;

    /// Base denomination of the chain's native token, e.g. `uzig`.
    fn native_denom(&self) -> String;
}

/// Write access to the settings store.
///
/// Packet handlers only ever write the totals; the settings themselves are
/// changed by governance outside of packet processing.
pub trait WrapSettingsKeeper: WrapSettingsReader {
    fn store_wrap_settings(&mut self, settings: WrapSettings) -> Result<(), TokenWrapperError>;

    fn store_transfer_totals(&mut self, totals: TransferTotals) -> Result<(), TokenWrapperError>;
}

/// Read-only view of the host's channel ends.
pub trait ChannelReader {
    fn channel_end(&self, port_id: &PortId, channel_id: &ChannelId) -> Option<ChannelEnd>;
}

/// Read-only view of the host's connection ends.
pub trait ConnectionReader {
    fn connection_end(&self, connection_id: &ConnectionId) -> Option<ConnectionEnd>;
}

/// Balance queries and transfers against the host's bank.
pub trait BankKeeper {
    type AccountId: TryFrom<Signer>;

    /// Module-controlled account holding the locked vouchers and the native
    /// tokens released to users.
    fn reserve_account(&self) -> Self::AccountId;

    /// Deterministic escrow account of a transfer channel.
    fn escrow_account(&self, port_id: &PortId, channel_id: &ChannelId) -> Self::AccountId;

    fn balance(&self, account: &Self::AccountId, denom: &str) -> Amount;

    fn has_balance(&self, account: &Self::AccountId, coin: &BaseCoin) -> bool {
        self.balance(account, coin.denom.as_str()) >= coin.amount
    }

    fn send_coins(
        &mut self,
        from: &Self::AccountId,
        to: &Self::AccountId,
        coin: &BaseCoin,
    ) -> Result<(), TokenWrapperError>;

    /// Destroys `coin` held by `account`.
    fn burn_coins(&mut self, account: &Self::AccountId, coin: &BaseCoin)
        -> Result<(), TokenWrapperError>;
}

/// Sink for events and log lines that are not returned through
/// `ModuleExtras`.
pub trait EventEmitter {
    fn emit_event(&mut self, event: ModuleEvent);

    fn log_message(&mut self, message: String);
}

/// The core channel handler that finally commits an outgoing packet.
pub trait PacketSender {
    fn send_packet(&mut self, packet: Packet) -> Result<Sequence, TokenWrapperError>;
}

/// Capabilities required by the validation engine.
pub trait ValidationContext: WrapSettingsReader + ChannelReader + ConnectionReader {}

impl<T> ValidationContext for T where T: WrapSettingsReader + ChannelReader + ConnectionReader {}

/// Every capability the token wrapper handlers use.
pub trait TokenWrapperExecutionContext:
    ValidationContext + WrapSettingsKeeper + BankKeeper + EventEmitter
{
}

impl<T> TokenWrapperExecutionContext for T where
    T: ValidationContext + WrapSettingsKeeper + BankKeeper + EventEmitter
{
}
