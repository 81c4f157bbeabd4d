//! Checks the handlers run before touching any balance.
//!
//! All functions here are pure queries over the wrap settings and the host's
//! channel and connection views: the same inputs always yield the same
//! verdict, and nothing is written.

use ibc_app_token_wrapper_types::error::TokenWrapperError;
use ibc_app_token_wrapper_types::WrapSettings;
use ibc_app_transfer_types::{is_sender_chain_source, PrefixedDenom};
use ibc_core::channel::types::channel::{ChannelEnd, State};
use ibc_core::channel::types::packet::Packet;
use ibc_core::host::types::identifiers::{ChannelId, PortId};
use ibc_core::primitives::prelude::*;

use crate::context::{ChannelReader, ValidationContext};

/// Returns the channel end of `port_id`/`channel_id` if it exists and is
/// open.
pub fn verify_channel_open<Ctx>(
    ctx: &Ctx,
    port_id: &PortId,
    channel_id: &ChannelId,
) -> Result<ChannelEnd, TokenWrapperError>
where
    Ctx: ChannelReader,
{
    let channel_end = ctx
        .channel_end(port_id, channel_id)
        .ok_or_else(|| TokenWrapperError::ChannelNotFound {
            port_id: port_id.clone(),
            channel_id: channel_id.clone(),
        })?;

    if *channel_end.state() != State::Open {
        return Err(TokenWrapperError::ChannelNotOpen {
            port_id: port_id.clone(),
            channel_id: channel_id.clone(),
            state: *channel_end.state(),
        });
    }

    Ok(channel_end)
}

/// Verifies that the counterparty of the given open channel is the
/// configured counterparty port and channel.
pub fn verify_counterparty<Ctx>(
    ctx: &Ctx,
    settings: &WrapSettings,
    port_id: &PortId,
    channel_id: &ChannelId,
) -> Result<(), TokenWrapperError>
where
    Ctx: ValidationContext,
{
    if settings.counterparty_port.is_empty() || settings.counterparty_channel.is_empty() {
        return Err(TokenWrapperError::MissingCounterpartyConfig);
    }

    let channel_end = verify_channel_open(ctx, port_id, channel_id)?;
    let counterparty = channel_end.counterparty();
    let counterparty_channel = counterparty.channel_id().ok_or_else(|| {
        TokenWrapperError::MissingCounterpartyChannel {
            port_id: port_id.clone(),
            channel_id: channel_id.clone(),
        }
    })?;

    if counterparty.port_id().as_str() != settings.counterparty_port
        || counterparty_channel.as_str() != settings.counterparty_channel
    {
        return Err(TokenWrapperError::CounterpartyMismatch {
            expected: format!(
                "{}/{}",
                settings.counterparty_port, settings.counterparty_channel
            ),
            actual: format!("{}/{}", counterparty.port_id(), counterparty_channel),
        });
    }

    Ok(())
}

/// Verifies that the first connection hop of the channel runs over the
/// configured pair of light clients.
pub fn verify_connection_client_ids<Ctx>(
    ctx: &Ctx,
    settings: &WrapSettings,
    port_id: &PortId,
    channel_id: &ChannelId,
) -> Result<(), TokenWrapperError>
where
    Ctx: ValidationContext,
{
    if settings.native_client_id.is_empty() || settings.counterparty_client_id.is_empty() {
        return Err(TokenWrapperError::MissingClientIds);
    }

    let channel_end = ctx
        .channel_end(port_id, channel_id)
        .ok_or_else(|| TokenWrapperError::ChannelNotFound {
            port_id: port_id.clone(),
            channel_id: channel_id.clone(),
        })?;

    let connection_id = channel_end.connection_hops().first().ok_or_else(|| {
        TokenWrapperError::EmptyConnectionHops {
            port_id: port_id.clone(),
            channel_id: channel_id.clone(),
        }
    })?;

    let connection_end = ctx.connection_end(connection_id).ok_or_else(|| {
        TokenWrapperError::ConnectionNotFound {
            connection_id: connection_id.clone(),
        }
    })?;

    if connection_end.client_id().as_str() != settings.native_client_id {
        return Err(TokenWrapperError::ClientIdMismatch {
            expected: settings.native_client_id.clone(),
            actual: connection_end.client_id().to_string(),
        });
    }

    let counterparty_client_id = connection_end.counterparty().client_id();
    if counterparty_client_id.as_str() != settings.counterparty_client_id {
        return Err(TokenWrapperError::CounterpartyClientIdMismatch {
            expected: settings.counterparty_client_id.clone(),
            actual: counterparty_client_id.to_string(),
        });
    }

    Ok(())
}

/// Returns true if `denom` is exactly the configured wrapped denomination.
pub fn denom_is_wrapped(settings: &WrapSettings, denom: &str) -> bool {
    !settings.wrapped_denom.is_empty() && denom == settings.wrapped_denom
}

/// Returns true if `denom` is the wrapped token as it travels outwards, i.e.
/// carrying exactly the native channel as its single hop.
pub fn denom_is_outbound_wrapped(settings: &WrapSettings, denom: &PrefixedDenom) -> bool {
    settings.is_configured() && denom.to_string() == settings.outbound_trace()
}

/// Returns true when the trace of `denom` does not already start with
/// `port_id`/`channel_id`, i.e. the token is not on its way back to the
/// chain it came from over that channel.
pub fn not_already_source_chain(
    denom: &PrefixedDenom,
    port_id: &PortId,
    channel_id: &ChannelId,
) -> bool {
    is_sender_chain_source(port_id.clone(), channel_id.clone(), denom)
}

/// Returns true if the packet travelled from the configured counterparty
/// channel into the configured native channel.
pub fn recv_addressing_matches(settings: &WrapSettings, packet: &Packet) -> bool {
    packet.port_id_on_a.as_str() == settings.counterparty_port
        && packet.chan_id_on_a.as_str() == settings.counterparty_channel
        && packet.port_id_on_b.as_str() == settings.native_port
        && packet.chan_id_on_b.as_str() == settings.native_channel
}

/// Returns true if the packet leaves through the configured native channel
/// towards the configured counterparty channel. Used for sends, timeouts and
/// acknowledgements alike.
pub fn send_addressing_matches(settings: &WrapSettings, packet: &Packet) -> bool {
    packet.port_id_on_a.as_str() == settings.native_port
        && packet.chan_id_on_a.as_str() == settings.native_channel
        && packet.port_id_on_b.as_str() == settings.counterparty_port
        && packet.chan_id_on_b.as_str() == settings.counterparty_channel
}

/// Returns true if a send of `denom` over `port_id`/`channel_id` targets the
/// configured wrap route.
pub fn send_targets_wrap_route(
    settings: &WrapSettings,
    denom: &str,
    port_id: &PortId,
    channel_id: &ChannelId,
) -> bool {
    denom_is_wrapped(settings, denom)
        && port_id.as_str() == settings.native_port
        && channel_id.as_str() == settings.native_channel
}
