use ibc_app_token_wrapper_types::error::TokenWrapperError;
use ibc_app_token_wrapper_types::events::{ErrorEvent, WrapEvent};
use ibc_app_token_wrapper_types::{scale_down, voucher_denom};
use ibc_app_transfer_types::packet::PacketData;
use ibc_core::channel::types::acknowledgement::{Acknowledgement, AcknowledgementStatus};
use ibc_core::channel::types::packet::Packet;
use ibc_core::primitives::prelude::*;
use ibc_core::router::types::module::ModuleExtras;
use tracing::info;

use super::{decode_packet_data, ensure_positive, is_successful_ack, Skip};
use crate::accounting::{
    base_coin, check_balances, lock_coins, parse_account, record_transferred_in, unlock_coins,
};
use crate::context::TokenWrapperExecutionContext;
use crate::validation::{
    denom_is_wrapped, not_already_source_chain, recv_addressing_matches,
    verify_channel_open, verify_connection_client_ids, verify_counterparty,
};

/// Handles an incoming transfer packet.
///
/// The packet is first checked and decoded; any failure there is answered
/// with an error acknowledgement. The underlying application then receives
/// the packet through `call_down`. Only when it acknowledges success does the
/// wrapper attempt to swap the freshly received voucher for the native token,
/// and from that point on every failure is recorded as an event while the
/// success acknowledgement is returned unchanged.
pub fn on_recv_packet_execute<Ctx, F>(
    ctx: &mut Ctx,
    packet: &Packet,
    call_down: F,
) -> (ModuleExtras, Acknowledgement)
where
    Ctx: TokenWrapperExecutionContext,
    F: FnOnce(&mut Ctx) -> (ModuleExtras, Acknowledgement),
{
    let data = match decode_recv_packet(ctx, packet) {
        Ok(data) => data,
        Err(err) => {
            tracing::error!(error = %err, "rejecting received packet");
            let extras = ModuleExtras {
                events: vec![ErrorEvent::from(&err).into()],
                log: Vec::new(),
            };
            return (extras, AcknowledgementStatus::error(err.into()).into());
        }
    };

    let (mut extras, ack) = call_down(ctx);
    if !is_successful_ack(&ack) {
        return (extras, ack);
    }

    match wrap_received_tokens(ctx, packet, data) {
        Ok(event) => extras.events.push(event.into()),
        Err(skip) => extras.events.push(skip.into_event()),
    }

    (extras, ack)
}

fn decode_recv_packet<Ctx>(ctx: &Ctx, packet: &Packet) -> Result<PacketData, TokenWrapperError>
where
    Ctx: TokenWrapperExecutionContext,
{
    verify_channel_open(ctx, &packet.port_id_on_b, &packet.chan_id_on_b)?;

    let data = decode_packet_data(packet)?;
    if data.sender.as_ref().is_empty() {
        return Err(TokenWrapperError::EmptySender);
    }
    parse_account::<Ctx>(&data.receiver)?;
    ensure_positive(&data)?;

    Ok(data)
}

fn wrap_received_tokens<Ctx>(
    ctx: &mut Ctx,
    packet: &Packet,
    data: PacketData,
) -> Result<WrapEvent, Skip>
where
    Ctx: TokenWrapperExecutionContext,
{
    let settings = ctx.wrap_settings()?;

    verify_counterparty(ctx, &settings, &packet.port_id_on_b, &packet.chan_id_on_b)?;
    verify_connection_client_ids(ctx, &settings, &packet.port_id_on_b, &packet.chan_id_on_b)?;

    if !settings.is_configured() {
        return Err(Skip::Info(TokenWrapperError::NotConfigured.to_string()));
    }

    let denom = data.token.denom.to_string();
    if !denom_is_wrapped(&settings, &denom) {
        return Err(Skip::Info(format!(
            "denom `{denom}` is not the wrapped denom `{}`",
            settings.wrapped_denom
        )));
    }

    if !not_already_source_chain(&data.token.denom, &packet.port_id_on_a, &packet.chan_id_on_a) {
        return Err(Skip::Info(format!(
            "denom `{denom}` is returning to its source over `{}/{}`",
            packet.port_id_on_a, packet.chan_id_on_a
        )));
    }

    if !settings.enabled {
        return Err(Skip::Info(TokenWrapperError::ModuleDisabled.to_string()));
    }

    if !recv_addressing_matches(&settings, packet) {
        return Err(Skip::Info(format!(
            "packet from `{}/{}` to `{}/{}` does not use the wrapped channel",
            packet.port_id_on_a, packet.chan_id_on_a, packet.port_id_on_b, packet.chan_id_on_b
        )));
    }

    let receiver = parse_account::<Ctx>(&data.receiver)?;
    let amount = data.token.amount;
    let voucher = voucher_denom(
        packet.port_id_on_b.as_str(),
        packet.chan_id_on_b.as_str(),
        &denom,
    );
    let converted = scale_down(amount, settings.decimal_difference)?;

    let native_denom = ctx.native_denom();
    let voucher_coin = base_coin(&voucher, amount)?;
    let native_coin = base_coin(&native_denom, converted)?;

    check_balances(
        ctx,
        &receiver,
        data.receiver.as_ref(),
        &voucher_coin,
        &native_coin,
    )?;

    lock_coins(ctx, &receiver, &voucher_coin)?;

    unlock_coins(ctx, &receiver, &native_coin).map_err(|err| {
        Skip::Error(format!(
            "{voucher_coin} of {} stays locked in the reserve: {err}",
            data.receiver
        ))
    })?;

    record_transferred_in(ctx, converted)?;

    info!(
        receiver = %data.receiver,
        amount = %converted,
        denom = %native_denom,
        "wrapped received tokens"
    );

    Ok(WrapEvent {
        sender: data.sender,
        receiver: data.receiver,
        amount: converted,
        denom: native_denom,
        source_port: packet.port_id_on_a.clone(),
        source_channel: packet.chan_id_on_a.clone(),
        dest_port: packet.port_id_on_b.clone(),
        dest_channel: packet.chan_id_on_b.clone(),
    })
}
