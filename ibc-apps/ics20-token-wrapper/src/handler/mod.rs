//! Implements the packet lifecycle of the token wrapper: receive, send,
//! timeout and acknowledgement.
mod on_acknowledgement_packet;
mod on_recv_packet;
mod on_timeout_packet;
mod refund;
mod send_packet;

pub use on_acknowledgement_packet::*;
pub use on_recv_packet::*;
pub use on_timeout_packet::*;
pub use send_packet::*;

use ibc_app_token_wrapper_types::error::TokenWrapperError;
use ibc_app_token_wrapper_types::events::{ErrorEvent, Event, InfoEvent};
use ibc_app_token_wrapper_types::Amount;
use ibc_app_transfer_types::packet::PacketData;
use ibc_core::channel::types::acknowledgement::{Acknowledgement, AcknowledgementStatus};
use ibc_core::channel::types::packet::Packet;
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;
use ibc_core::router::types::event::ModuleEvent;

use crate::accounting::parse_account;
use crate::context::{BankKeeper, EventEmitter};

/// Reason a wrapper step was abandoned while the underlying transfer outcome
/// is kept as it is.
#[derive(Debug)]
pub(crate) enum Skip {
    /// The packet is simply not one the wrapper acts on.
    Info(String),
    /// The wrapper should have acted but could not.
    Error(String),
}

impl Skip {
    pub(crate) fn into_event(self) -> ModuleEvent {
        let event: Event = match self {
            Self::Info(message) => {
                tracing::debug!(%message, "token wrapper skipped packet");
                InfoEvent::new(message).into()
            }
            Self::Error(message) => {
                tracing::warn!(%message, "token wrapper step failed");
                ErrorEvent::new(message).into()
            }
        };
        event.into()
    }
}

impl From<TokenWrapperError> for Skip {
    fn from(err: TokenWrapperError) -> Self {
        Self::Error(err.to_string())
    }
}

/// Records a hard failure as an error event before handing it back.
pub(crate) fn fail<Ctx>(ctx: &mut Ctx, err: TokenWrapperError) -> TokenWrapperError
where
    Ctx: EventEmitter,
{
    tracing::error!(error = %err, "token wrapper rejected packet");
    ctx.emit_event(ErrorEvent::from(&err).into());
    err
}

pub(crate) fn decode_packet_data(packet: &Packet) -> Result<PacketData, TokenWrapperError> {
    serde_json::from_slice::<PacketData>(&packet.data)
        .map_err(|_| TokenWrapperError::PacketDataDeserialization)
}

/// Returns true only for a well-formed success acknowledgement.
pub(crate) fn is_successful_ack(acknowledgement: &Acknowledgement) -> bool {
    serde_json::from_slice::<AcknowledgementStatus>(acknowledgement.as_ref())
        .map(|status| status.is_successful())
        .unwrap_or(false)
}

/// Checks the sender of a transfer and resolves it to a host account.
pub(crate) fn sender_account<Ctx>(sender: &Signer) -> Result<Ctx::AccountId, TokenWrapperError>
where
    Ctx: BankKeeper,
{
    if sender.as_ref().is_empty() {
        return Err(TokenWrapperError::EmptySender);
    }
    parse_account::<Ctx>(sender)
}

pub(crate) fn ensure_positive(data: &PacketData) -> Result<(), TokenWrapperError> {
    if data.token.amount == Amount::from(0u64) {
        return Err(TokenWrapperError::NonPositiveAmount);
    }
    Ok(())
}
