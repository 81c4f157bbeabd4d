//! Composition of packet middlewares around a transfer application.
//!
//! A [`MiddlewareStack`] is an ordered list of layers, listed from the one
//! closest to the core channel handler to the one closest to the
//! application. Incoming callbacks walk the list front to back and end at the
//! application; outgoing packets walk it back to front and end at the host's
//! [`PacketSender`].
use ibc_app_token_wrapper_types::error::TokenWrapperError;
use ibc_core::channel::types::acknowledgement::Acknowledgement;
use ibc_core::channel::types::packet::Packet;
use ibc_core::host::types::identifiers::Sequence;
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;
use ibc_core::router::types::module::ModuleExtras;

use crate::context::PacketSender;

/// Packet callbacks of the ICS-20 application at the bottom of the stack.
pub trait TransferModule<Ctx> {
    fn on_recv_packet_execute(
        &self,
        ctx: &mut Ctx,
        packet: &Packet,
        relayer: &Signer,
    ) -> (ModuleExtras, Acknowledgement);

    fn on_acknowledgement_packet_execute(
        &self,
        ctx: &mut Ctx,
        packet: &Packet,
        acknowledgement: &Acknowledgement,
        relayer: &Signer,
    ) -> (ModuleExtras, Result<(), TokenWrapperError>);

    fn on_timeout_packet_execute(
        &self,
        ctx: &mut Ctx,
        packet: &Packet,
        relayer: &Signer,
    ) -> (ModuleExtras, Result<(), TokenWrapperError>);
}

/// A single layer of the stack.
///
/// Each hook receives a cursor to the rest of the stack. The cursor is
/// consumed by calling down, so a layer reaches the layers below it at most
/// once per hook. The provided implementations only call down.
pub trait PacketMiddleware<Ctx> {
    fn on_recv_packet_execute(
        &self,
        ctx: &mut Ctx,
        packet: &Packet,
        relayer: &Signer,
        next: Next<'_, Ctx>,
    ) -> (ModuleExtras, Acknowledgement) {
        next.on_recv_packet_execute(ctx, packet, relayer)
    }

    fn on_acknowledgement_packet_execute(
        &self,
        ctx: &mut Ctx,
        packet: &Packet,
        acknowledgement: &Acknowledgement,
        relayer: &Signer,
        next: Next<'_, Ctx>,
    ) -> (ModuleExtras, Result<(), TokenWrapperError>) {
        next.on_acknowledgement_packet_execute(ctx, packet, acknowledgement, relayer)
    }

    fn on_timeout_packet_execute(
        &self,
        ctx: &mut Ctx,
        packet: &Packet,
        relayer: &Signer,
        next: Next<'_, Ctx>,
    ) -> (ModuleExtras, Result<(), TokenWrapperError>) {
        next.on_timeout_packet_execute(ctx, packet, relayer)
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
        next.send_packet(ctx, packet)
    }
}

/// Cursor over the layers between a middleware and the application.
pub struct Next<'a, Ctx> {
    layers: &'a [Box<dyn PacketMiddleware<Ctx>>],
    app: &'a dyn TransferModule<Ctx>,
}

impl<'a, Ctx> Next<'a, Ctx> {
    pub fn on_recv_packet_execute(
        self,
        ctx: &mut Ctx,
        packet: &Packet,
        relayer: &Signer,
    ) -> (ModuleExtras, Acknowledgement) {
        match self.layers.split_first() {
            Some((layer, rest)) => layer.on_recv_packet_execute(
                ctx,
                packet,
                relayer,
                Next {
                    layers: rest,
                    app: self.app,
                },
            ),
            None => self.app.on_recv_packet_execute(ctx, packet, relayer),
        }
    }

    pub fn on_acknowledgement_packet_execute(
        self,
        ctx: &mut Ctx,
        packet: &Packet,
        acknowledgement: &Acknowledgement,
        relayer: &Signer,
    ) -> (ModuleExtras, Result<(), TokenWrapperError>) {
        match self.layers.split_first() {
            Some((layer, rest)) => layer.on_acknowledgement_packet_execute(
                ctx,
                packet,
                acknowledgement,
                relayer,
                Next {
                    layers: rest,
                    app: self.app,
                },
            ),
            None => self
                .app
                .on_acknowledgement_packet_execute(ctx, packet, acknowledgement, relayer),
        }
    }

    pub fn on_timeout_packet_execute(
        self,
        ctx: &mut Ctx,
        packet: &Packet,
        relayer: &Signer,
    ) -> (ModuleExtras, Result<(), TokenWrapperError>) {
        match self.layers.split_first() {
            Some((layer, rest)) => layer.on_timeout_packet_execute(
                ctx,
                packet,
                relayer,
                Next {
                    layers: rest,
                    app: self.app,
                },
            ),
            None => self.app.on_timeout_packet_execute(ctx, packet, relayer),
        }
    }
}

/// Cursor over the layers between a middleware and the core channel handler.
pub struct SendNext<'a, Ctx> {
    layers: &'a [Box<dyn PacketMiddleware<Ctx>>],
}

impl<'a, Ctx> SendNext<'a, Ctx>
where
    Ctx: PacketSender,
{
    pub fn send_packet(self, ctx: &mut Ctx, packet: Packet) -> Result<Sequence, TokenWrapperError> {
        match self.layers.split_last() {
            Some((layer, rest)) => layer.send_packet(ctx, packet, SendNext { layers: rest }),
            None => ctx.send_packet(packet),
        }
    }
}

/// An ICS-20 application together with its middlewares.
pub struct MiddlewareStack<Ctx> {
    middlewares: Vec<Box<dyn PacketMiddleware<Ctx>>>,
    app: Box<dyn TransferModule<Ctx>>,
}

impl<Ctx> MiddlewareStack<Ctx> {
    pub fn new(app: impl TransferModule<Ctx> + 'static) -> Self {
        Self {
            middlewares: Vec::new(),
            app: Box::new(app),
        }
    }

    /// Adds a layer between the existing layers and the application.
    pub fn with_middleware(mut self, middleware: impl PacketMiddleware<Ctx> + 'static) -> Self {
        self.middlewares.push(Box::new(middleware));
        self
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    fn next(&self) -> Next<'_, Ctx> {
        Next {
            layers: &self.middlewares,
            app: self.app.as_ref(),
        }
    }

    pub fn on_recv_packet_execute(
        &self,
        ctx: &mut Ctx,
        packet: &Packet,
        relayer: &Signer,
    ) -> (ModuleExtras, Acknowledgement) {
        self.next().on_recv_packet_execute(ctx, packet, relayer)
    }

    pub fn on_acknowledgement_packet_execute(
        &self,
        ctx: &mut Ctx,
        packet: &Packet,
        acknowledgement: &Acknowledgement,
        relayer: &Signer,
    ) -> (ModuleExtras, Result<(), TokenWrapperError>) {
        self.next()
            .on_acknowledgement_packet_execute(ctx, packet, acknowledgement, relayer)
    }

    pub fn on_timeout_packet_execute(
        &self,
        ctx: &mut Ctx,
        packet: &Packet,
        relayer: &Signer,
    ) -> (ModuleExtras, Result<(), TokenWrapperError>) {
        self.next().on_timeout_packet_execute(ctx, packet, relayer)
    }

    pub fn send_packet(&self, ctx: &mut Ctx, packet: Packet) -> Result<Sequence, TokenWrapperError>
    where
        Ctx: PacketSender,
    {
        SendNext {
            layers: &self.middlewares,
        }
        .send_packet(ctx, packet)
    }
}
