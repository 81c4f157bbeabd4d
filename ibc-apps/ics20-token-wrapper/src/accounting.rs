//! Balance movements between user accounts and the module reserve, and the
//! running totals kept next to the settings.
use core::str::FromStr;

use ibc_app_token_wrapper_types::error::TokenWrapperError;
use ibc_app_token_wrapper_types::events::{ErrorEvent, InfoEvent};
use ibc_app_token_wrapper_types::Amount;
use ibc_app_transfer_types::{BaseCoin, BaseDenom};
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;

use crate::context::{BankKeeper, EventEmitter, WrapSettingsKeeper};

/// Label used for the module reserve in balance errors.
pub const RESERVE_HOLDER: &str = "reserve";

pub fn base_coin(denom: &str, amount: Amount) -> Result<BaseCoin, TokenWrapperError> {
    let denom = BaseDenom::from_str(denom).map_err(|e| TokenWrapperError::Bank {
        description: e.to_string(),
    })?;
    Ok(BaseCoin { denom, amount })
}

/// Parses a packet address into a host account.
pub fn parse_account<Ctx>(signer: &Signer) -> Result<Ctx::AccountId, TokenWrapperError>
where
    Ctx: BankKeeper,
{
    signer
        .clone()
        .try_into()
        .map_err(|_| TokenWrapperError::ParseAccountFailure {
            address: signer.to_string(),
        })
}

/// Verifies, before anything moves, that `holder` owns `holder_coin` and the
/// reserve owns `reserve_coin`. The error names the party that falls short.
pub fn check_balances<Ctx>(
    ctx: &Ctx,
    holder: &Ctx::AccountId,
    holder_name: &str,
    holder_coin: &BaseCoin,
    reserve_coin: &BaseCoin,
) -> Result<(), TokenWrapperError>
where
    Ctx: BankKeeper,
{
    if !ctx.has_balance(holder, holder_coin) {
        return Err(insufficient_funds(ctx, holder, holder_name, holder_coin));
    }

    let reserve = ctx.reserve_account();
    if !ctx.has_balance(&reserve, reserve_coin) {
        return Err(insufficient_funds(ctx, &reserve, RESERVE_HOLDER, reserve_coin));
    }

    Ok(())
}

fn insufficient_funds<Ctx>(
    ctx: &Ctx,
    account: &Ctx::AccountId,
    holder_name: &str,
    coin: &BaseCoin,
) -> TokenWrapperError
where
    Ctx: BankKeeper,
{
    let available = ctx.balance(account, coin.denom.as_str());
    TokenWrapperError::InsufficientFunds {
        holder: holder_name.to_string(),
        required: coin.to_string(),
        available: format!("{available}{}", coin.denom),
    }
}

/// Moves `coin` from `holder` into the reserve.
pub fn lock_coins<Ctx>(
    ctx: &mut Ctx,
    holder: &Ctx::AccountId,
    coin: &BaseCoin,
) -> Result<(), TokenWrapperError>
where
    Ctx: BankKeeper,
{
    let reserve = ctx.reserve_account();
    ctx.send_coins(holder, &reserve, coin)
}

/// Releases `coin` from the reserve to `holder`.
pub fn unlock_coins<Ctx>(
    ctx: &mut Ctx,
    holder: &Ctx::AccountId,
    coin: &BaseCoin,
) -> Result<(), TokenWrapperError>
where
    Ctx: BankKeeper,
{
    let reserve = ctx.reserve_account();
    ctx.send_coins(&reserve, holder, coin)
}

/// Burns `voucher` out of the reserve. If the burn fails, the native coin
/// locked from `sender` beforehand is handed back on a best-effort basis.
///
/// Both the burn failure and the outcome of the compensating unlock are
/// emitted as events here; the returned error is the burn error and must not
/// be reported again by the caller.
pub fn burn_voucher_or_unlock<Ctx>(
    ctx: &mut Ctx,
    sender: &Ctx::AccountId,
    sender_name: &str,
    native: &BaseCoin,
    voucher: &BaseCoin,
) -> Result<(), TokenWrapperError>
where
    Ctx: BankKeeper + EventEmitter,
{
    let reserve = ctx.reserve_account();
    let Err(burn_err) = ctx.burn_coins(&reserve, voucher) else {
        return Ok(());
    };

    tracing::error!(%voucher, error = %burn_err, "failed to burn voucher from reserve");
    ctx.emit_event(ErrorEvent::from(&burn_err).into());

    match unlock_coins(ctx, sender, native) {
        Ok(()) => {
            tracing::info!(%native, sender = sender_name, "returned locked coins after failed burn");
            ctx.emit_event(
                InfoEvent::new(format!(
                    "returned {native} to {sender_name} after failed voucher burn"
                ))
                .into(),
            );
        }
        Err(unlock_err) => {
            tracing::error!(%native, sender = sender_name, error = %unlock_err, "failed to return locked coins");
            ctx.emit_event(
                ErrorEvent::new(format!(
                    "failed to return {native} to {sender_name} after failed voucher burn: {unlock_err}"
                ))
                .into(),
            );
        }
    }

    Err(burn_err)
}

pub fn record_transferred_in<Ctx>(ctx: &mut Ctx, amount: Amount) -> Result<(), TokenWrapperError>
where
    Ctx: WrapSettingsKeeper,
{
    let mut totals = ctx.transfer_totals()?;
    totals.record_transferred_in(amount)?;
    ctx.store_transfer_totals(totals)
}

pub fn record_transferred_out<Ctx>(ctx: &mut Ctx, amount: Amount) -> Result<(), TokenWrapperError>
where
    Ctx: WrapSettingsKeeper,
{
    let mut totals = ctx.transfer_totals()?;
    totals.record_transferred_out(amount)?;
    ctx.store_transfer_totals(totals)
}

/// Takes a refunded amount back out of the outgoing total.
pub fn release_transferred_out<Ctx>(ctx: &mut Ctx, amount: Amount) -> Result<(), TokenWrapperError>
where
    Ctx: WrapSettingsKeeper,
{
    let mut totals = ctx.transfer_totals()?;
    totals.release_transferred_out(amount);
    ctx.store_transfer_totals(totals)
}
