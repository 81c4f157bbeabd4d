use ibc_app_token_wrapper_types::error::TokenWrapperError;
use ibc_core::channel::types::acknowledgement::{Acknowledgement, AcknowledgementStatus};
use ibc_core::channel::types::packet::Packet;
use ibc_core::router::types::module::ModuleExtras;
use tracing::debug;

use super::refund::refund_execute;
use crate::context::TokenWrapperExecutionContext;

pub const REFUND_REASON_ACK_ERROR: &str = "acknowledgement error";

/// Handles the acknowledgement of a sent transfer packet.
///
/// Success acknowledgements, and acknowledgements that cannot be decoded,
/// are delegated untouched. An error acknowledgement is treated like a
/// timeout: the underlying application refunds the sender, then unwrapped
/// packets are swapped back into the native token.
pub fn on_acknowledgement_packet_execute<Ctx, F>(
    ctx: &mut Ctx,
    packet: &Packet,
    acknowledgement: &Acknowledgement,
    call_down: F,
) -> (ModuleExtras, Result<(), TokenWrapperError>)
where
    Ctx: TokenWrapperExecutionContext,
    F: FnOnce(&mut Ctx) -> (ModuleExtras, Result<(), TokenWrapperError>),
{
    match serde_json::from_slice::<AcknowledgementStatus>(acknowledgement.as_ref()) {
        Ok(status) if !status.is_successful() => {
            debug!(%status, "refunding packet after error acknowledgement");
            refund_execute(ctx, packet, REFUND_REASON_ACK_ERROR, call_down)
        }
        _ => call_down(ctx),
    }
}
