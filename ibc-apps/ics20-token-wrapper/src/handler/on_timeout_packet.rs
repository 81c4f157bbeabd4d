use ibc_app_token_wrapper_types::error::TokenWrapperError;
use ibc_core::channel::types::packet::Packet;
use ibc_core::router::types::module::ModuleExtras;

use super::refund::refund_execute;
use crate::context::TokenWrapperExecutionContext;

pub const REFUND_REASON_TIMEOUT: &str = "timeout";

/// Handles the timeout of a sent transfer packet.
///
/// The underlying application always gets to refund the sender. Packets that
/// were unwrapped on the way out are additionally swapped back into the
/// native token.
pub fn on_timeout_packet_execute<Ctx, F>(
    ctx: &mut Ctx,
    packet: &Packet,
    call_down: F,
) -> (ModuleExtras, Result<(), TokenWrapperError>)
where
    Ctx: TokenWrapperExecutionContext,
    F: FnOnce(&mut Ctx) -> (ModuleExtras, Result<(), TokenWrapperError>),
{
    refund_execute(ctx, packet, REFUND_REASON_TIMEOUT, call_down)
}
