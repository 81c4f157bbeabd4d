use core::str::FromStr;

use ibc_app_token_wrapper_types::error::TokenWrapperError;
use ibc_app_token_wrapper_types::events::UnwrapEvent;
use ibc_app_token_wrapper_types::{denom_trace, hashed_denom, scale_up};
use ibc_app_transfer_types::PrefixedDenom;
use ibc_core::channel::types::packet::Packet;
use ibc_core::host::types::identifiers::Sequence;
use ibc_core::primitives::prelude::*;
use tracing::{debug, info};

use super::{decode_packet_data, ensure_positive, fail, sender_account};
use crate::accounting::{
    base_coin, burn_voucher_or_unlock, check_balances, lock_coins, record_transferred_out,
};
use crate::context::TokenWrapperExecutionContext;
use crate::validation::{
    not_already_source_chain, send_targets_wrap_route, verify_channel_open,
    verify_connection_client_ids, verify_counterparty,
};

/// Intercepts an outgoing transfer packet before it reaches the channel.
///
/// Packets that do not carry the wrapped token over the wrapped channel are
/// forwarded untouched through `call_down`. For the ones that do, the native
/// tokens escrowed by the transfer application are swapped back into the
/// voucher at counterparty precision: the native amount is locked in the
/// reserve, the matching voucher amount is burned, and the packet is
/// rewritten to carry it. Every failure aborts the send.
pub fn send_packet_execute<Ctx, F>(
    ctx: &mut Ctx,
    mut packet: Packet,
    call_down: F,
) -> Result<Sequence, TokenWrapperError>
where
    Ctx: TokenWrapperExecutionContext,
    F: FnOnce(&mut Ctx, Packet) -> Result<Sequence, TokenWrapperError>,
{
    let port_id = packet.port_id_on_a.clone();
    let channel_id = packet.chan_id_on_a.clone();

    verify_channel_open(ctx, &port_id, &channel_id).map_err(|e| fail(ctx, e))?;

    let mut data = decode_packet_data(&packet).map_err(|e| fail(ctx, e))?;
    let settings = ctx.wrap_settings().map_err(|e| fail(ctx, e))?;
    let native_denom = ctx.native_denom();

    // the native denom travels as the wrapped denom
    let denom = data.token.denom.to_string();
    let route_denom = if denom == native_denom && !settings.wrapped_denom.is_empty() {
        settings.wrapped_denom.clone()
    } else {
        denom
    };

    let targets_wrap = send_targets_wrap_route(&settings, &route_denom, &port_id, &channel_id);

    if targets_wrap && !settings.enabled {
        return Err(fail(ctx, TokenWrapperError::ModuleDisabled));
    }

    if !not_already_source_chain(&data.token.denom, &port_id, &channel_id)
        || !settings.is_configured()
        || !targets_wrap
    {
        debug!(
            denom = %data.token.denom,
            port_id = %port_id,
            channel_id = %channel_id,
            "forwarding packet without unwrapping"
        );
        return call_down(ctx, packet);
    }

    verify_counterparty(ctx, &settings, &port_id, &channel_id).map_err(|e| fail(ctx, e))?;
    verify_connection_client_ids(ctx, &settings, &port_id, &channel_id)
        .map_err(|e| fail(ctx, e))?;

    let sender = sender_account::<Ctx>(&data.sender).map_err(|e| fail(ctx, e))?;
    if data.receiver.as_ref().is_empty() {
        return Err(fail(ctx, TokenWrapperError::EmptyReceiver));
    }
    ensure_positive(&data).map_err(|e| fail(ctx, e))?;

    let amount = data.token.amount;
    let native_coin = base_coin(&native_denom, amount).map_err(|e| fail(ctx, e))?;

    let escrow = ctx.escrow_account(&port_id, &channel_id);
    ctx.send_coins(&escrow, &sender, &native_coin)
        .map_err(|e| fail(ctx, e))?;

    if !ctx.has_balance(&sender, &native_coin) {
        return Err(fail(
            ctx,
            TokenWrapperError::MissingCoin {
                coin: native_coin.to_string(),
            },
        ));
    }

    let trace = denom_trace(port_id.as_str(), channel_id.as_str(), &settings.wrapped_denom);
    let converted = scale_up(amount, settings.decimal_difference).map_err(|e| fail(ctx, e))?;
    let voucher_coin = base_coin(&hashed_denom(&trace), converted).map_err(|e| fail(ctx, e))?;

    check_balances(
        ctx,
        &sender,
        data.sender.as_ref(),
        &native_coin,
        &voucher_coin,
    )
    .map_err(|e| fail(ctx, e))?;

    data.token.denom = outbound_denom(&trace).map_err(|e| fail(ctx, e))?;
    data.token.amount = converted;
    packet.data = serde_json::to_vec(&data)
        .map_err(|_| fail(ctx, TokenWrapperError::PacketDataSerialization))?;

    lock_coins(ctx, &sender, &native_coin).map_err(|e| fail(ctx, e))?;

    burn_voucher_or_unlock(
        ctx,
        &sender,
        data.sender.as_ref(),
        &native_coin,
        &voucher_coin,
    )?;

    let sequence = call_down(ctx, packet.clone()).map_err(|e| fail(ctx, e))?;

    record_transferred_out(ctx, amount).map_err(|e| fail(ctx, e))?;

    info!(
        sender = %data.sender,
        amount = %amount,
        denom = %native_denom,
        sequence = %sequence,
        "unwrapped outgoing tokens"
    );
    ctx.log_message(format!(
        "token wrapper: unwrapped {native_coin} from {} into {voucher_coin}",
        data.sender
    ));
    ctx.emit_event(
        UnwrapEvent {
            sender: data.sender,
            receiver: data.receiver,
            amount,
            denom: native_denom,
            source_port: packet.port_id_on_a,
            source_channel: packet.chan_id_on_a,
            dest_port: packet.port_id_on_b,
            dest_channel: packet.chan_id_on_b,
        }
        .into(),
    );

    Ok(sequence)
}

/// Parses the trace an unwrapped packet is rewritten to carry.
fn outbound_denom(trace: &str) -> Result<PrefixedDenom, TokenWrapperError> {
    PrefixedDenom::from_str(trace).map_err(|e| TokenWrapperError::InvalidDenom {
        denom: trace.to_string(),
        description: e.to_string(),
    })
}
