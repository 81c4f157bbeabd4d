use core::str::FromStr;

use ibc_core::channel::types::channel::{ChannelEnd, Counterparty, Order, State};
use ibc_core::channel::types::packet::Packet;
use ibc_core::channel::types::proto::v1::Packet as RawPacket;
use ibc_core::channel::types::Version;
use ibc_core::client::types::proto::v1::Height as RawHeight;
use ibc_core::host::types::identifiers::{ChannelId, ConnectionId, PortId};
use ibc_core::primitives::prelude::*;
use typed_builder::TypedBuilder;

/// Version string negotiated by ICS-20 channels.
pub const TRANSFER_VERSION: &str = "ics20-1";

/// Configuration for building dummy packets. Addressed by default as a packet
/// travelling from the counterparty channel `channel-5` into `channel-0`.
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = Packet))]
pub struct PacketConfig {
    #[builder(default = 1)]
    pub sequence: u64,
    #[builder(default = PortId::transfer())]
    pub port_id_on_a: PortId,
    #[builder(default = ChannelId::new(5))]
    pub chan_id_on_a: ChannelId,
    #[builder(default = PortId::transfer())]
    pub port_id_on_b: PortId,
    #[builder(default = ChannelId::zero())]
    pub chan_id_on_b: ChannelId,
    #[builder(default = vec![0])]
    pub data: Vec<u8>,
    #[builder(default = 1000)]
    pub timeout_height: u64,
}

impl From<PacketConfig> for Packet {
    fn from(config: PacketConfig) -> Self {
        let raw = RawPacket {
            sequence: config.sequence,
            source_port: config.port_id_on_a.to_string(),
            source_channel: config.chan_id_on_a.to_string(),
            destination_port: config.port_id_on_b.to_string(),
            destination_channel: config.chan_id_on_b.to_string(),
            data: config.data,
            timeout_height: Some(RawHeight {
                revision_number: 0,
                revision_height: config.timeout_height,
            }),
            timeout_timestamp: 0,
        };
        Packet::try_from(raw).expect("packet config must describe a valid packet")
    }
}

/// Returns an ICS-20 channel end over `connection_id`.
pub fn dummy_channel_end(
    state: State,
    counterparty_port: &str,
    counterparty_channel: Option<&str>,
    connection_id: ConnectionId,
) -> ChannelEnd {
    ChannelEnd::new(
        state,
        Order::Unordered,
        Counterparty::new(
            PortId::from_str(counterparty_port).expect("valid port id"),
            counterparty_channel.map(|c| ChannelId::from_str(c).expect("valid channel id")),
        ),
        vec![connection_id],
        Version::new(TRANSFER_VERSION.to_string()),
    )
    .expect("valid channel end")
}
