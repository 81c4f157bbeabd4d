use ibc_app_token_wrapper::accounting::base_coin;
use ibc_app_token_wrapper::context::BankKeeper;
use ibc_app_token_wrapper::stack::{MiddlewareStack, TransferModule};
use ibc_app_token_wrapper_types::error::TokenWrapperError;
use ibc_app_token_wrapper_types::hashed_denom;
use ibc_app_transfer_types::packet::PacketData;
use ibc_app_transfer_types::{
    ack_success_b64, is_receiver_chain_source, is_sender_chain_source, PrefixedDenom, TracePrefix,
};
use ibc_core::channel::types::acknowledgement::{Acknowledgement, AcknowledgementStatus};
use ibc_core::channel::types::packet::Packet;
use ibc_core::host::types::identifiers::Sequence;
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;
use ibc_core::router::types::event::ModuleEvent;
use ibc_core::router::types::module::ModuleExtras;

use super::context::{MockAccount, MockWrapperContext};

/// Event emitted by the mock transfer application for every packet it
/// handles.
pub const EVENT_TYPE_PACKET: &str = "fungible_token_packet";

/// A minimal ICS-20 application moving balances of a [`MockWrapperContext`]
/// the way the transfer module does: escrow and unescrow for tokens whose
/// source is the sending chain, mint and burn of vouchers otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub struct MockTransferModule {
    /// Answers every received packet with an error acknowledgement.
    pub fail_recv: bool,
    /// Makes every refund fail.
    pub fail_refund: bool,
}

/// Denomination under which a prefixed token is held in the mock bank.
/// Tokens without a trace keep their base denomination; vouchers are held
/// under the hash of their full trace.
pub fn ledger_denom(denom: &PrefixedDenom) -> String {
    if denom.trace_path.is_empty() {
        denom.base_denom.to_string()
    } else {
        hashed_denom(&denom.to_string())
    }
}

fn decode(packet: &Packet) -> Result<PacketData, TokenWrapperError> {
    serde_json::from_slice(&packet.data).map_err(|_| TokenWrapperError::PacketDataDeserialization)
}

fn account(signer: &Signer) -> Result<MockAccount, TokenWrapperError> {
    MockAccount::try_from(signer.clone())
}

fn packet_event(data: &PacketData, success: bool) -> ModuleEvent {
    ModuleEvent {
        kind: EVENT_TYPE_PACKET.to_string(),
        attributes: vec![
            ("module", "transfer").into(),
            ("sender", data.sender.clone()).into(),
            ("receiver", data.receiver.clone()).into(),
            ("denom", data.token.denom.clone()).into(),
            ("amount", data.token.amount).into(),
            ("success", success).into(),
        ],
    }
}

impl MockTransferModule {
    fn receive(
        &self,
        ctx: &mut MockWrapperContext,
        packet: &Packet,
    ) -> Result<PacketData, TokenWrapperError> {
        if self.fail_recv {
            return Err(TokenWrapperError::Host {
                description: "transfer application refused the packet".to_string(),
            });
        }

        let data = decode(packet)?;
        let receiver = account(&data.receiver)?;

        if is_receiver_chain_source(
            packet.port_id_on_a.clone(),
            packet.chan_id_on_a.clone(),
            &data.token.denom,
        ) {
            let mut denom = data.token.denom.clone();
            denom.remove_trace_prefix(&TracePrefix::new(
                packet.port_id_on_a.clone(),
                packet.chan_id_on_a.clone(),
            ));
            let escrow = ctx.escrow_account(&packet.port_id_on_b, &packet.chan_id_on_b);
            move_coins(ctx, &escrow, &receiver, &ledger_denom(&denom), &data)?;
        } else {
            let mut denom = data.token.denom.clone();
            denom.add_trace_prefix(TracePrefix::new(
                packet.port_id_on_b.clone(),
                packet.chan_id_on_b.clone(),
            ));
            ctx.mint_coins(&receiver, &ledger_denom(&denom), data.token.amount);
        }

        Ok(data)
    }

    fn refund(
        &self,
        ctx: &mut MockWrapperContext,
        packet: &Packet,
    ) -> Result<PacketData, TokenWrapperError> {
        if self.fail_refund {
            return Err(TokenWrapperError::Host {
                description: "transfer application failed to refund".to_string(),
            });
        }

        let data = decode(packet)?;
        let sender = account(&data.sender)?;
        let denom = ledger_denom(&data.token.denom);

        if is_sender_chain_source(
            packet.port_id_on_a.clone(),
            packet.chan_id_on_a.clone(),
            &data.token.denom,
        ) {
            let escrow = ctx.escrow_account(&packet.port_id_on_a, &packet.chan_id_on_a);
            move_coins(ctx, &escrow, &sender, &denom, &data)?;
        } else {
            ctx.mint_coins(&sender, &denom, data.token.amount);
        }

        Ok(data)
    }
}

fn move_coins(
    ctx: &mut MockWrapperContext,
    from: &MockAccount,
    to: &MockAccount,
    denom: &str,
    data: &PacketData,
) -> Result<(), TokenWrapperError> {
    let coin = base_coin(denom, data.token.amount)?;
    ctx.send_coins(from, to, &coin)
}

impl TransferModule<MockWrapperContext> for MockTransferModule {
    fn on_recv_packet_execute(
        &self,
        ctx: &mut MockWrapperContext,
        packet: &Packet,
        _relayer: &Signer,
    ) -> (ModuleExtras, Acknowledgement) {
        match self.receive(ctx, packet) {
            Ok(data) => {
                let extras = ModuleExtras {
                    events: vec![packet_event(&data, true)],
                    log: Vec::new(),
                };
                (
                    extras,
                    AcknowledgementStatus::success(ack_success_b64()).into(),
                )
            }
            Err(err) => (
                ModuleExtras::empty(),
                AcknowledgementStatus::error(err.into()).into(),
            ),
        }
    }

    fn on_acknowledgement_packet_execute(
        &self,
        ctx: &mut MockWrapperContext,
        packet: &Packet,
        acknowledgement: &Acknowledgement,
        _relayer: &Signer,
    ) -> (ModuleExtras, Result<(), TokenWrapperError>) {
        let Ok(status) =
            serde_json::from_slice::<AcknowledgementStatus>(acknowledgement.as_ref())
        else {
            return (
                ModuleExtras::empty(),
                Err(TokenWrapperError::AckDeserialization),
            );
        };

        if status.is_successful() {
            return (ModuleExtras::empty(), Ok(()));
        }

        match self.refund(ctx, packet) {
            Ok(data) => {
                let extras = ModuleExtras {
                    events: vec![packet_event(&data, false)],
                    log: Vec::new(),
                };
                (extras, Ok(()))
            }
            Err(err) => (ModuleExtras::empty(), Err(err)),
        }
    }

    fn on_timeout_packet_execute(
        &self,
        ctx: &mut MockWrapperContext,
        packet: &Packet,
        _relayer: &Signer,
    ) -> (ModuleExtras, Result<(), TokenWrapperError>) {
        match self.refund(ctx, packet) {
            Ok(data) => {
                let extras = ModuleExtras {
                    events: vec![packet_event(&data, false)],
                    log: Vec::new(),
                };
                (extras, Ok(()))
            }
            Err(err) => (ModuleExtras::empty(), Err(err)),
        }
    }
}

/// Initiates a transfer the way the ICS-20 `MsgTransfer` handler does: the
/// sender's tokens are escrowed or burned and the packet is then sent down
/// `stack`. Balances are not restored when the send fails; a real host would
/// discard the whole transaction.
pub fn send_transfer_execute(
    ctx: &mut MockWrapperContext,
    stack: &MiddlewareStack<MockWrapperContext>,
    packet: Packet,
) -> Result<Sequence, TokenWrapperError> {
    let data = decode(&packet)?;
    let sender = account(&data.sender)?;
    let denom = ledger_denom(&data.token.denom);
    let coin = base_coin(&denom, data.token.amount)?;

    if is_sender_chain_source(
        packet.port_id_on_a.clone(),
        packet.chan_id_on_a.clone(),
        &data.token.denom,
    ) {
        let escrow = ctx.escrow_account(&packet.port_id_on_a, &packet.chan_id_on_a);
        ctx.send_coins(&sender, &escrow, &coin)?;
    } else {
        ctx.burn_coins(&sender, &coin)?;
    }

    stack.send_packet(ctx, packet)
}
