//! Defines all token wrapper event types
use derive_more::From;
use ibc_app_transfer_types::Amount;
use ibc_core::host::types::identifiers::{ChannelId, PortId};
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;
use ibc_core::router::types::event::ModuleEvent;

use crate::error::TokenWrapperError;
use crate::MODULE_ID_STR;

pub const EVENT_TYPE_INFO: &str = "token_wrapper_info";
pub const EVENT_TYPE_ERROR: &str = "token_wrapper_error";
pub const EVENT_TYPE_WRAPPED: &str = "token_wrapped";
pub const EVENT_TYPE_UNWRAPPED: &str = "token_unwrapped";
pub const EVENT_TYPE_REFUND: &str = "token_wrapper_refund";

/// Contains all events variants that can be emitted from the token wrapper
#[derive(From)]
pub enum Event {
    Info(InfoEvent),
    Error(ErrorEvent),
    Wrapped(WrapEvent),
    Unwrapped(UnwrapEvent),
    Refund(RefundEvent),
}

/// Records a step the middleware skipped or a compensation that succeeded.
pub struct InfoEvent {
    pub message: String,
}

impl InfoEvent {
    pub fn new(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl From<InfoEvent> for ModuleEvent {
    fn from(ev: InfoEvent) -> Self {
        Self {
            kind: EVENT_TYPE_INFO.to_string(),
            attributes: vec![("module", MODULE_ID_STR).into(), ("info", ev.message).into()],
        }
    }
}

/// Records a wrapper failure, whether it was swallowed or surfaced.
pub struct ErrorEvent {
    pub message: String,
}

impl ErrorEvent {
    pub fn new(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl From<&TokenWrapperError> for ErrorEvent {
    fn from(err: &TokenWrapperError) -> Self {
        Self::new(err)
    }
}

impl From<ErrorEvent> for ModuleEvent {
    fn from(ev: ErrorEvent) -> Self {
        Self {
            kind: EVENT_TYPE_ERROR.to_string(),
            attributes: vec![("module", MODULE_ID_STR).into(), ("error", ev.message).into()],
        }
    }
}

/// Emitted once a received voucher has been swapped for the native token.
pub struct WrapEvent {
    pub sender: Signer,
    pub receiver: Signer,
    pub amount: Amount,
    pub denom: String,
    pub source_port: PortId,
    pub source_channel: ChannelId,
    pub dest_port: PortId,
    pub dest_channel: ChannelId,
}

impl From<WrapEvent> for ModuleEvent {
    fn from(ev: WrapEvent) -> Self {
        let WrapEvent {
            sender,
            receiver,
            amount,
            denom,
            source_port,
            source_channel,
            dest_port,
            dest_channel,
        } = ev;
        Self {
            kind: EVENT_TYPE_WRAPPED.to_string(),
            attributes: vec![
                ("sender", sender).into(),
                ("receiver", receiver).into(),
                ("amount", amount).into(),
                ("denom", denom).into(),
                ("source_port", source_port).into(),
                ("source_channel", source_channel).into(),
                ("dest_port", dest_port).into(),
                ("dest_channel", dest_channel).into(),
            ],
        }
    }
}

/// Emitted after a native token has been swapped back into the voucher and
/// the rewritten packet was handed to the channel.
pub struct UnwrapEvent {
    pub sender: Signer,
    pub receiver: Signer,
    pub amount: Amount,
    pub denom: String,
    pub source_port: PortId,
    pub source_channel: ChannelId,
    pub dest_port: PortId,
    pub dest_channel: ChannelId,
}

impl From<UnwrapEvent> for ModuleEvent {
    fn from(ev: UnwrapEvent) -> Self {
        let UnwrapEvent {
            sender,
            receiver,
            amount,
            denom,
            source_port,
            source_channel,
            dest_port,
            dest_channel,
        } = ev;
        Self {
            kind: EVENT_TYPE_UNWRAPPED.to_string(),
            attributes: vec![
                ("sender", sender).into(),
                ("receiver", receiver).into(),
                ("amount", amount).into(),
                ("denom", denom).into(),
                ("source_port", source_port).into(),
                ("source_channel", source_channel).into(),
                ("dest_port", dest_port).into(),
                ("dest_channel", dest_channel).into(),
            ],
        }
    }
}

/// Emitted when a timed out or rejected unwrap has been paid back in the
/// native token.
pub struct RefundEvent {
    pub refund_receiver: Signer,
    pub refund_denom: String,
    pub refund_amount: Amount,
    pub reason: String,
}

impl From<RefundEvent> for ModuleEvent {
    fn from(ev: RefundEvent) -> Self {
        let RefundEvent {
            refund_receiver,
            refund_denom,
            refund_amount,
            reason,
        } = ev;
        Self {
            kind: EVENT_TYPE_REFUND.to_string(),
            attributes: vec![
                ("module", MODULE_ID_STR).into(),
                ("refund_receiver", refund_receiver).into(),
                ("refund_denom", refund_denom).into(),
                ("refund_amount", refund_amount).into(),
                ("reason", reason).into(),
            ],
        }
    }
}

impl From<Event> for ModuleEvent {
    fn from(ev: Event) -> Self {
        match ev {
            Event::Info(ev) => ev.into(),
            Event::Error(ev) => ev.into(),
            Event::Wrapped(ev) => ev.into(),
            Event::Unwrapped(ev) => ev.into(),
            Event::Refund(ev) => ev.into(),
        }
    }
}
