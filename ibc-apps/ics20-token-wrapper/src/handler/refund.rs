use ibc_app_token_wrapper_types::error::TokenWrapperError;
use ibc_app_token_wrapper_types::events::{ErrorEvent, RefundEvent};
use ibc_app_token_wrapper_types::{hashed_denom, scale_down, Amount};
use ibc_app_transfer_types::PrefixedDenom;
use ibc_core::channel::types::packet::Packet;
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;
use ibc_core::router::types::module::ModuleExtras;
use tracing::info;

use super::{decode_packet_data, ensure_positive, sender_account, Skip};
use crate::accounting::{
    base_coin, check_balances, lock_coins, release_transferred_out, unlock_coins,
};
use crate::context::{BankKeeper, TokenWrapperExecutionContext};
use crate::validation::{denom_is_outbound_wrapped, send_addressing_matches, verify_channel_open};

/// A sent packet whose unwrap must be reversed once the underlying
/// application has refunded the voucher.
struct PendingRefund<AccountId> {
    sender: AccountId,
    sender_signer: Signer,
    denom: PrefixedDenom,
    amount: Amount,
    decimal_difference: u32,
}

/// Runs the underlying refund through `call_down` and, for unwrapped
/// packets, swaps the refunded voucher back into the native token.
///
/// Packets the wrapper did not unwrap are delegated as they are. The result
/// of the underlying application is authoritative; a failing wrapper refund
/// after it is only recorded as an error event.
pub(super) fn refund_execute<Ctx, F>(
    ctx: &mut Ctx,
    packet: &Packet,
    reason: &str,
    call_down: F,
) -> (ModuleExtras, Result<(), TokenWrapperError>)
where
    Ctx: TokenWrapperExecutionContext,
    F: FnOnce(&mut Ctx) -> (ModuleExtras, Result<(), TokenWrapperError>),
{
    let pending = match prepare_refund(ctx, packet) {
        Ok(pending) => pending,
        Err(skip) => {
            let (mut extras, result) = call_down(ctx);
            extras.events.push(skip.into_event());
            return (extras, result);
        }
    };

    let (mut extras, result) = call_down(ctx);
    if result.is_err() {
        return (extras, result);
    }

    match refund_wrapped_tokens(ctx, pending, reason) {
        Ok(event) => extras.events.push(event.into()),
        Err(err) => {
            tracing::error!(error = %err, reason, "failed to refund wrapped tokens");
            extras.events.push(ErrorEvent::from(&err).into());
        }
    }

    (extras, Ok(()))
}

fn prepare_refund<Ctx>(
    ctx: &Ctx,
    packet: &Packet,
) -> Result<PendingRefund<<Ctx as BankKeeper>::AccountId>, Skip>
where
    Ctx: TokenWrapperExecutionContext,
{
    verify_channel_open(ctx, &packet.port_id_on_a, &packet.chan_id_on_a)?;

    let data = decode_packet_data(packet)?;
    let sender = sender_account::<Ctx>(&data.sender)?;
    ensure_positive(&data)?;

    let settings = ctx.wrap_settings()?;
    if !settings.is_configured() {
        return Err(Skip::Info(TokenWrapperError::NotConfigured.to_string()));
    }

    if !denom_is_outbound_wrapped(&settings, &data.token.denom) {
        return Err(Skip::Info(format!(
            "denom `{}` was not unwrapped by the token wrapper",
            data.token.denom
        )));
    }

    if !send_addressing_matches(&settings, packet) {
        return Err(Skip::Info(format!(
            "packet from `{}/{}` to `{}/{}` does not use the wrapped channel",
            packet.port_id_on_a, packet.chan_id_on_a, packet.port_id_on_b, packet.chan_id_on_b
        )));
    }

    if !settings.enabled {
        return Err(Skip::Info(TokenWrapperError::ModuleDisabled.to_string()));
    }

    Ok(PendingRefund {
        sender,
        sender_signer: data.sender,
        denom: data.token.denom,
        amount: data.token.amount,
        decimal_difference: settings.decimal_difference,
    })
}

fn refund_wrapped_tokens<Ctx>(
    ctx: &mut Ctx,
    pending: PendingRefund<<Ctx as BankKeeper>::AccountId>,
    reason: &str,
) -> Result<RefundEvent, TokenWrapperError>
where
    Ctx: TokenWrapperExecutionContext,
{
    let converted = scale_down(pending.amount, pending.decimal_difference)?;

    let native_denom = ctx.native_denom();
    let voucher_coin = base_coin(&hashed_denom(&pending.denom.to_string()), pending.amount)?;
    let native_coin = base_coin(&native_denom, converted)?;

    check_balances(
        ctx,
        &pending.sender,
        pending.sender_signer.as_ref(),
        &voucher_coin,
        &native_coin,
    )?;

    lock_coins(ctx, &pending.sender, &voucher_coin)?;
    unlock_coins(ctx, &pending.sender, &native_coin)?;

    release_transferred_out(ctx, converted)?;

    info!(
        receiver = %pending.sender_signer,
        amount = %converted,
        denom = %native_denom,
        reason,
        "refunded wrapped tokens"
    );

    Ok(RefundEvent {
        refund_receiver: pending.sender_signer,
        refund_denom: native_denom,
        refund_amount: converted,
        reason: reason.to_string(),
    })
}
