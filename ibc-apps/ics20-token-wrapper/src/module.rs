use ibc_app_token_wrapper_types::error::TokenWrapperError;
use ibc_core::channel::types::acknowledgement::Acknowledgement;
use ibc_core::channel::types::packet::Packet;
use ibc_core::host::types::identifiers::Sequence;
use ibc_core::primitives::Signer;
use ibc_core::router::types::module::ModuleExtras;

use crate::context::{PacketSender, TokenWrapperExecutionContext};
use crate::handler::{
    on_acknowledgement_packet_execute, on_recv_packet_execute, on_timeout_packet_execute,
    send_packet_execute,
};
use crate::stack::{Next, PacketMiddleware, SendNext};

/// The token wrapper as a layer of a [`MiddlewareStack`](crate::stack::MiddlewareStack).
#[derive(Clone, Copy, Debug, Default)]
pub struct TokenWrapperMiddleware;

impl<Ctx> PacketMiddleware<Ctx> for TokenWrapperMiddleware
where
    Ctx: TokenWrapperExecutionContext,
{
    fn on_recv_packet_execute(
        &self,
        ctx: &mut Ctx,
        packet: &Packet,
        relayer: &Signer,
        next: Next<'_, Ctx>,
    ) -> (ModuleExtras, Acknowledgement) {
        on_recv_packet_execute(ctx, packet, |ctx| {
            next.on_recv_packet_execute(ctx, packet, relayer)
        })
    }

    fn on_acknowledgement_packet_execute(
        &self,
        ctx: &mut Ctx,
        packet: &Packet,
        acknowledgement: &Acknowledgement,
        relayer: &Signer,
        next: Next<'_, Ctx>,
    ) -> (ModuleExtras, Result<(), TokenWrapperError>) {
        on_acknowledgement_packet_execute(ctx, packet, acknowledgement, |ctx| {
            next.on_acknowledgement_packet_execute(ctx, packet, acknowledgement, relayer)
        })
    }

    fn on_timeout_packet_execute(
        &self,
        ctx: &mut Ctx,
        packet: &Packet,
        relayer: &Signer,
        next: Next<'_, Ctx>,
    ) -> (ModuleExtras, Result<(), TokenWrapperError>) {
        on_timeout_packet_execute(ctx, packet, |ctx| {
            next.on_timeout_packet_execute(ctx, packet, relayer)
        })
    }

    fn send_packet(
        &self,
        ctx: &mut Ctx,
        packet: Packet,
        next: SendNext<'_, Ctx>,
    ) -> Result<Sequence, TokenWrapperError>
    where
        Ctx: PacketSender,
    {
        send_packet_execute(ctx, packet, |ctx, packet| next.send_packet(ctx, packet))
    }
}
