use alloc::collections::{BTreeMap, BTreeSet};
use core::fmt::{Display, Error as FmtError, Formatter};
use core::str::FromStr;

use ibc_app_token_wrapper::context::{
    BankKeeper, ChannelReader, ConnectionReader, EventEmitter, PacketSender, WrapSettingsKeeper,
    WrapSettingsReader,
};
use ibc_app_token_wrapper_types::error::TokenWrapperError;
use ibc_app_token_wrapper_types::{Amount, TransferTotals, WrapSettings};
use ibc_app_transfer_types::BaseCoin;
use ibc_core::channel::types::channel::{ChannelEnd, State};
use ibc_core::channel::types::packet::Packet;
use ibc_core::connection::types::ConnectionEnd;
use ibc_core::host::types::identifiers::{ChannelId, ConnectionId, PortId, Sequence};
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;
use ibc_core::router::types::event::ModuleEvent;
use tracing::debug;

use crate::fixtures::applications::token_wrapper::NATIVE_DENOM;
use crate::fixtures::core::channel::dummy_channel_end;
use crate::fixtures::core::connection::dummy_connection_end;

/// Address of the module reserve on the mock chain.
pub const RESERVE_ADDRESS: &str = "tokenwrapperreserve";

/// An account of the mock bank. Addresses parsed from packets must be
/// non-empty and ASCII alphanumeric.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct MockAccount(String);

impl MockAccount {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for MockAccount {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MockAccount {
    type Err = TokenWrapperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(TokenWrapperError::ParseAccountFailure {
                address: s.to_string(),
            });
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<Signer> for MockAccount {
    type Error = TokenWrapperError;

    fn try_from(signer: Signer) -> Result<Self, Self::Error> {
        Self::from_str(signer.as_ref())
    }
}

/// In-memory host implementing every role the token wrapper consumes.
///
/// Failure switches let tests break the bank or the channel at a precise
/// step of a packet lifecycle.
#[derive(Debug)]
pub struct MockWrapperContext {
    pub settings: WrapSettings,
    pub totals: TransferTotals,
    pub native_denom: String,
    pub channels: BTreeMap<(PortId, ChannelId), ChannelEnd>,
    pub connections: BTreeMap<ConnectionId, ConnectionEnd>,
    pub balances: BTreeMap<(MockAccount, String), Amount>,
    pub events: Vec<ModuleEvent>,
    pub logs: Vec<String>,
    pub sent_packets: Vec<Packet>,
    /// Makes every burn fail.
    pub fail_burn: bool,
    /// Makes the core channel handler reject every packet.
    pub fail_send_packet: bool,
    /// Accounts that cannot send coins.
    pub frozen_accounts: BTreeSet<MockAccount>,
}

impl Default for MockWrapperContext {
    fn default() -> Self {
        Self {
            settings: WrapSettings::default(),
            totals: TransferTotals::default(),
            native_denom: NATIVE_DENOM.to_string(),
            channels: BTreeMap::new(),
            connections: BTreeMap::new(),
            balances: BTreeMap::new(),
            events: Vec::new(),
            logs: Vec::new(),
            sent_packets: Vec::new(),
            fail_burn: false,
            fail_send_packet: false,
            frozen_accounts: BTreeSet::new(),
        }
    }
}

impl MockWrapperContext {
    /// Returns a host configured with `settings` whose wrapped channel is
    /// open and runs over a connection between the configured clients.
    pub fn with_settings(settings: WrapSettings) -> Self {
        let mut ctx = Self::default();
        ctx.open_wrapped_channel(&settings);
        ctx.settings = settings;
        ctx
    }

    fn open_wrapped_channel(&mut self, settings: &WrapSettings) {
        let (Ok(port_id), Ok(channel_id)) = (
            PortId::from_str(&settings.native_port),
            ChannelId::from_str(&settings.native_channel),
        ) else {
            return;
        };

        let connection_id = ConnectionId::zero();
        self.channels.insert(
            (port_id, channel_id),
            dummy_channel_end(
                State::Open,
                &settings.counterparty_port,
                Some(settings.counterparty_channel.as_str()),
                connection_id.clone(),
            ),
        );
        self.connections.insert(
            connection_id,
            dummy_connection_end(
                &settings.native_client_id,
                &settings.counterparty_client_id,
            ),
        );
    }

    pub fn with_channel(mut self, port_id: PortId, channel_id: ChannelId, end: ChannelEnd) -> Self {
        self.channels.insert((port_id, channel_id), end);
        self
    }

    pub fn with_connection(mut self, connection_id: ConnectionId, end: ConnectionEnd) -> Self {
        self.connections.insert(connection_id, end);
        self
    }

    pub fn account(address: &str) -> MockAccount {
        MockAccount(address.to_string())
    }

    pub fn reserve() -> MockAccount {
        Self::account(RESERVE_ADDRESS)
    }

    pub fn escrow(port_id: &PortId, channel_id: &ChannelId) -> MockAccount {
        MockAccount(format!("escrow/{port_id}/{channel_id}"))
    }

    /// Creates `amount` of `denom` out of thin air for `account`.
    pub fn mint_coins(&mut self, account: &MockAccount, denom: &str, amount: Amount) {
        let balance = self.balance(account, denom);
        let minted = balance
            .checked_add(amount)
            .expect("mock balances never overflow");
        self.balances
            .insert((account.clone(), denom.to_string()), minted);
    }

    pub fn balance_of(&self, address: &str, denom: &str) -> Amount {
        self.balance(&Self::account(address), denom)
    }

    pub fn freeze(&mut self, account: MockAccount) {
        self.frozen_accounts.insert(account);
    }

    /// Returns the events of the given kind in emission order.
    pub fn events_of_kind(&self, kind: &str) -> Vec<&ModuleEvent> {
        self.events.iter().filter(|e| e.kind == kind).collect()
    }

    fn debit(&mut self, account: &MockAccount, coin: &BaseCoin) -> Result<(), TokenWrapperError> {
        let balance = self.balance(account, coin.denom.as_str());
        let remaining = balance
            .checked_sub(coin.amount)
            .ok_or_else(|| TokenWrapperError::Bank {
                description: format!("{account} holds {balance}{}, needs {coin}", coin.denom),
            })?;
        self.balances
            .insert((account.clone(), coin.denom.to_string()), remaining);
        Ok(())
    }
}

impl WrapSettingsReader for MockWrapperContext {
    fn wrap_settings(&self) -> Result<WrapSettings, TokenWrapperError> {
        Ok(self.settings.clone())
    }

    fn transfer_totals(&self) -> Result<TransferTotals, TokenWrapperError> {
        Ok(self.totals.clone())
    }

    fn native_denom(&self) -> String {
        self.native_denom.clone()
    }
}

impl WrapSettingsKeeper for MockWrapperContext {
    fn store_wrap_settings(&mut self, settings: WrapSettings) -> Result<(), TokenWrapperError> {
        self.settings = settings;
        Ok(())
    }

    fn store_transfer_totals(&mut self, totals: TransferTotals) -> Result<(), TokenWrapperError> {
        self.totals = totals;
        Ok(())
    }
}

impl ChannelReader for MockWrapperContext {
    fn channel_end(&self, port_id: &PortId, channel_id: &ChannelId) -> Option<ChannelEnd> {
        self.channels
            .get(&(port_id.clone(), channel_id.clone()))
            .cloned()
    }
}

impl ConnectionReader for MockWrapperContext {
    fn connection_end(&self, connection_id: &ConnectionId) -> Option<ConnectionEnd> {
        self.connections.get(connection_id).cloned()
    }
}

impl BankKeeper for MockWrapperContext {
    type AccountId = MockAccount;

    fn reserve_account(&self) -> Self::AccountId {
        Self::reserve()
    }

    fn escrow_account(&self, port_id: &PortId, channel_id: &ChannelId) -> Self::AccountId {
        Self::escrow(port_id, channel_id)
    }

    fn balance(&self, account: &Self::AccountId, denom: &str) -> Amount {
        self.balances
            .get(&(account.clone(), denom.to_string()))
            .copied()
            .unwrap_or_else(|| Amount::from(0u64))
    }

    fn send_coins(
        &mut self,
        from: &Self::AccountId,
        to: &Self::AccountId,
        coin: &BaseCoin,
    ) -> Result<(), TokenWrapperError> {
        if self.frozen_accounts.contains(from) {
            return Err(TokenWrapperError::Bank {
                description: format!("account {from} is frozen"),
            });
        }
        self.debit(from, coin)?;
        self.mint_coins(to, coin.denom.as_str(), coin.amount);
        debug!(%from, %to, %coin, "mock bank transfer");
        Ok(())
    }

    fn burn_coins(
        &mut self,
        account: &Self::AccountId,
        coin: &BaseCoin,
    ) -> Result<(), TokenWrapperError> {
        if self.fail_burn {
            return Err(TokenWrapperError::Bank {
                description: format!("burning {coin} is disabled"),
            });
        }
        self.debit(account, coin)
    }
}

impl EventEmitter for MockWrapperContext {
    fn emit_event(&mut self, event: ModuleEvent) {
        self.events.push(event);
    }

    fn log_message(&mut self, message: String) {
        self.logs.push(message);
    }
}

impl PacketSender for MockWrapperContext {
    fn send_packet(&mut self, packet: Packet) -> Result<Sequence, TokenWrapperError> {
        if self.fail_send_packet {
            return Err(TokenWrapperError::Host {
                description: format!(
                    "channel `{}/{}` rejected the packet",
                    packet.port_id_on_a, packet.chan_id_on_a
                ),
            });
        }
        let sequence = packet.seq_on_a;
        self.sent_packets.push(packet);
        Ok(sequence)
    }
}
