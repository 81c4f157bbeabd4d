use core::str::FromStr;

use ibc_app_token_wrapper_types::WrapSettings;
use ibc_app_transfer_types::packet::PacketData;
use ibc_app_transfer_types::{Amount, Memo, PrefixedCoin, PrefixedDenom};
use ibc_core::primitives::prelude::*;
use typed_builder::TypedBuilder;

/// Native denomination of the mock chain.
pub const NATIVE_DENOM: &str = "uzig";

/// Configuration of the wrap settings used across the tests: `channel-0` on
/// this chain is paired with `channel-5` on the counterparty, over the
/// clients `07-tendermint-0` and `07-tendermint-3`, with twelve extra decimal
/// places on the counterparty side.
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = WrapSettings))]
pub struct WrapSettingsConfig {
    #[builder(default = "transfer".to_string(), setter(into))]
    pub native_port: String,
    #[builder(default = "channel-0".to_string(), setter(into))]
    pub native_channel: String,
    #[builder(default = "transfer".to_string(), setter(into))]
    pub counterparty_port: String,
    #[builder(default = "channel-5".to_string(), setter(into))]
    pub counterparty_channel: String,
    #[builder(default = NATIVE_DENOM.to_string(), setter(into))]
    pub wrapped_denom: String,
    #[builder(default = "07-tendermint-0".to_string(), setter(into))]
    pub native_client_id: String,
    #[builder(default = "07-tendermint-3".to_string(), setter(into))]
    pub counterparty_client_id: String,
    #[builder(default = 12)]
    pub decimal_difference: u32,
    #[builder(default = true)]
    pub enabled: bool,
    #[builder(default = "zig1operator".to_string(), setter(into))]
    pub operator_address: String,
}

impl From<WrapSettingsConfig> for WrapSettings {
    fn from(config: WrapSettingsConfig) -> Self {
        WrapSettings {
            native_port: config.native_port,
            native_channel: config.native_channel,
            counterparty_port: config.counterparty_port,
            counterparty_channel: config.counterparty_channel,
            wrapped_denom: config.wrapped_denom,
            native_client_id: config.native_client_id,
            counterparty_client_id: config.counterparty_client_id,
            decimal_difference: config.decimal_difference,
            enabled: config.enabled,
            operator_address: config.operator_address,
            ..Default::default()
        }
    }
}

/// Configuration of dummy ICS-20 packet data. Defaults describe one whole
/// token in an 18-decimal counterparty representation.
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = PacketData))]
pub struct PacketDataConfig {
    #[builder(default = NATIVE_DENOM.to_string(), setter(into))]
    pub denom: String,
    #[builder(default = "1000000000000000000".to_string(), setter(into))]
    pub amount: String,
    #[builder(default = "cosmos1sender".to_string(), setter(into))]
    pub sender: String,
    #[builder(default = "zig1receiver".to_string(), setter(into))]
    pub receiver: String,
}

impl From<PacketDataConfig> for PacketData {
    fn from(config: PacketDataConfig) -> Self {
        PacketData {
            token: PrefixedCoin {
                denom: PrefixedDenom::from_str(&config.denom).expect("valid denom"),
                amount: Amount::from_str(&config.amount).expect("valid amount"),
            },
            sender: config.sender.into(),
            receiver: config.receiver.into(),
            memo: Memo::from(String::new()),
        }
    }
}

/// Encodes packet data the way ICS-20 puts it on the wire.
pub fn packet_data_bytes(data: &PacketData) -> Vec<u8> {
    serde_json::to_vec(data).expect("PacketData's infallible Serialize impl failed")
}

/// Encodes raw JSON packet data, bypassing the `PacketData` type. Useful for
/// payloads the typed encoder would never produce.
pub fn raw_packet_data_bytes(denom: &str, amount: &str, sender: &str, receiver: &str) -> Vec<u8> {
    format!(
        r#"{{"denom":"{denom}","amount":"{amount}","sender":"{sender}","receiver":"{receiver}","memo":""}}"#
    )
    .into_bytes()
}
