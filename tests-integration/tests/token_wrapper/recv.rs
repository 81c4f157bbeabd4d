use ibc_app_token_wrapper_types::events::{EVENT_TYPE_ERROR, EVENT_TYPE_INFO, EVENT_TYPE_WRAPPED};
use ibc_app_token_wrapper_types::{hashed_denom, WrapSettings};
use ibc_core::channel::types::channel::State;
use ibc_core::channel::types::packet::Packet;
use ibc_core::host::types::identifiers::{ChannelId, ConnectionId, PortId};
use ibc_token_wrapper_testkit::fixtures::applications::token_wrapper::{
    raw_packet_data_bytes, WrapSettingsConfig, NATIVE_DENOM,
};
use ibc_token_wrapper_testkit::fixtures::core::channel::{dummy_channel_end, PacketConfig};
use ibc_token_wrapper_testkit::fixtures::core::connection::dummy_connection_end;
use ibc_token_wrapper_testkit::testapp::{
    MockTransferModule, MockWrapperContext, EVENT_TYPE_PACKET, RESERVE_ADDRESS,
};
use rstest::rstest;

use crate::common::*;

#[test_log::test]
fn test_recv_swaps_voucher_for_native() {
    let mut ctx = setup(WrapSettingsConfig::builder().build());
    let stack = stack(MockTransferModule::default());

    let (extras, ack) = stack.on_recv_packet_execute(
        &mut ctx,
        &incoming_packet(NATIVE_DENOM, "1000000000000000000"),
        &relayer(),
    );

    assert!(is_success(&ack));
    assert_eq!(ctx.balance_of(RECEIVER, NATIVE_DENOM), amount(ONE_NATIVE));
    assert_eq!(ctx.balance_of(RECEIVER, &voucher()), amount(0));
    assert_eq!(ctx.balance_of(RESERVE_ADDRESS, &voucher()), amount(ONE_VOUCHER));
    assert_eq!(
        ctx.balance_of(RESERVE_ADDRESS, NATIVE_DENOM),
        amount(RESERVE_FUNDS - ONE_NATIVE)
    );
    assert_eq!(ctx.totals.transferred_in, amount(ONE_NATIVE));

    assert_eq!(
        kinds(&extras.events),
        vec![EVENT_TYPE_PACKET, EVENT_TYPE_WRAPPED]
    );
    let wrapped = &extras.events[1];
    assert_eq!(attribute(wrapped, "sender"), "cosmos1sender");
    assert_eq!(attribute(wrapped, "receiver"), RECEIVER);
    assert_eq!(attribute(wrapped, "amount"), "1000000");
    assert_eq!(attribute(wrapped, "denom"), NATIVE_DENOM);
    assert_eq!(attribute(wrapped, "source_channel"), "channel-5");
    assert_eq!(attribute(wrapped, "dest_channel"), "channel-0");
}

#[test]
fn test_recv_accumulates_totals() {
    let mut ctx = setup(WrapSettingsConfig::builder().build());
    let stack = stack(MockTransferModule::default());

    for sequence in 1..=3 {
        let packet: Packet = PacketConfig::builder()
            .sequence(sequence)
            .data(raw_packet_data_bytes(
                NATIVE_DENOM,
                "2500000000000000000",
                "cosmos1sender",
                RECEIVER,
            ))
            .build();
        let (_, ack) = stack.on_recv_packet_execute(&mut ctx, &packet, &relayer());
        assert!(is_success(&ack));
    }

    assert_eq!(ctx.totals.transferred_in, amount(7_500_000));
    assert_eq!(ctx.balance_of(RECEIVER, NATIVE_DENOM), amount(7_500_000));
}

/// Packets the wrapper does not act on keep the voucher minted by the
/// transfer application.
#[rstest]
#[case::other_denom(WrapSettingsConfig::builder().build(), "uatom")]
#[case::disabled(WrapSettingsConfig::builder().enabled(false).build(), NATIVE_DENOM)]
#[case::not_configured(WrapSettingsConfig::builder().wrapped_denom("").build(), NATIVE_DENOM)]
fn test_recv_passes_through(#[case] settings: WrapSettings, #[case] denom: &str) {
    let mut ctx = setup(settings);
    let stack = stack(MockTransferModule::default());

    let (extras, ack) =
        stack.on_recv_packet_execute(&mut ctx, &incoming_packet(denom, "42"), &relayer());

    assert!(is_success(&ack));
    assert_eq!(kinds(&extras.events), vec![EVENT_TYPE_PACKET, EVENT_TYPE_INFO]);
    assert_eq!(
        ctx.balance_of(RECEIVER, &hashed_denom(&format!("transfer/channel-0/{denom}"))),
        amount(42)
    );
    assert_eq!(ctx.balance_of(RECEIVER, NATIVE_DENOM), amount(0));
    assert_eq!(ctx.totals.transferred_in, amount(0));
}

#[test]
fn test_recv_on_unrelated_channel_keeps_voucher() {
    let connection_id = ConnectionId::new(1);
    let mut ctx = setup(WrapSettingsConfig::builder().build())
        .with_channel(
            PortId::transfer(),
            ChannelId::new(1),
            dummy_channel_end(State::Open, "transfer", Some("channel-7"), connection_id.clone()),
        )
        .with_connection(
            connection_id,
            dummy_connection_end("07-tendermint-1", "07-tendermint-8"),
        );
    let stack = stack(MockTransferModule::default());

    let packet: Packet = PacketConfig::builder()
        .chan_id_on_a(ChannelId::new(7))
        .chan_id_on_b(ChannelId::new(1))
        .data(raw_packet_data_bytes(
            NATIVE_DENOM,
            "1000000000000000000",
            "cosmos1sender",
            RECEIVER,
        ))
        .build();

    let (extras, ack) = stack.on_recv_packet_execute(&mut ctx, &packet, &relayer());

    assert!(is_success(&ack));
    assert_eq!(kinds(&extras.events), vec![EVENT_TYPE_PACKET, EVENT_TYPE_ERROR]);
    assert_eq!(
        ctx.balance_of(RECEIVER, &hashed_denom("transfer/channel-1/uzig")),
        amount(ONE_VOUCHER)
    );
    assert_eq!(ctx.balance_of(RECEIVER, NATIVE_DENOM), amount(0));
}

#[test]
fn test_recv_with_wrong_light_client_keeps_voucher() {
    let mut ctx = setup(WrapSettingsConfig::builder().build()).with_connection(
        ConnectionId::zero(),
        dummy_connection_end("07-tendermint-0", "07-tendermint-9"),
    );
    let stack = stack(MockTransferModule::default());

    let (extras, ack) = stack.on_recv_packet_execute(
        &mut ctx,
        &incoming_packet(NATIVE_DENOM, "1000000000000000000"),
        &relayer(),
    );

    assert!(is_success(&ack));
    assert_eq!(kinds(&extras.events), vec![EVENT_TYPE_PACKET, EVENT_TYPE_ERROR]);
    assert!(attribute(&extras.events[1], "error").contains("07-tendermint-9"));
    assert_eq!(ctx.balance_of(RECEIVER, &voucher()), amount(ONE_VOUCHER));
}

#[test_log::test]
fn test_recv_with_empty_reserve_keeps_voucher() {
    let mut ctx = MockWrapperContext::with_settings(WrapSettingsConfig::builder().build());
    let stack = stack(MockTransferModule::default());

    let (extras, ack) = stack.on_recv_packet_execute(
        &mut ctx,
        &incoming_packet(NATIVE_DENOM, "1000000000000000000"),
        &relayer(),
    );

    assert!(is_success(&ack));
    assert_eq!(kinds(&extras.events), vec![EVENT_TYPE_PACKET, EVENT_TYPE_ERROR]);
    assert!(attribute(&extras.events[1], "error").contains("reserve"));
    assert_eq!(ctx.balance_of(RECEIVER, &voucher()), amount(ONE_VOUCHER));
    assert_eq!(ctx.balance_of(RESERVE_ADDRESS, &voucher()), amount(0));
    assert_eq!(ctx.totals.transferred_in, amount(0));
}

#[test]
fn test_recv_amount_below_native_precision_keeps_voucher() {
    let mut ctx = setup(WrapSettingsConfig::builder().build());
    let stack = stack(MockTransferModule::default());

    let (extras, ack) =
        stack.on_recv_packet_execute(&mut ctx, &incoming_packet(NATIVE_DENOM, "999"), &relayer());

    assert!(is_success(&ack));
    assert_eq!(kinds(&extras.events), vec![EVENT_TYPE_PACKET, EVENT_TYPE_ERROR]);
    assert_eq!(ctx.balance_of(RECEIVER, &voucher()), amount(999));
    assert_eq!(
        ctx.balance_of(RESERVE_ADDRESS, NATIVE_DENOM),
        amount(RESERVE_FUNDS)
    );
}

#[test_log::test]
fn test_recv_failed_release_leaves_voucher_locked() {
    let mut ctx = setup(WrapSettingsConfig::builder().build());
    ctx.freeze(MockWrapperContext::reserve());
    let stack = stack(MockTransferModule::default());

    let (extras, ack) = stack.on_recv_packet_execute(
        &mut ctx,
        &incoming_packet(NATIVE_DENOM, "1000000000000000000"),
        &relayer(),
    );

    assert!(is_success(&ack));
    assert_eq!(kinds(&extras.events), vec![EVENT_TYPE_PACKET, EVENT_TYPE_ERROR]);
    assert!(attribute(&extras.events[1], "error").contains("stays locked in the reserve"));
    assert_eq!(ctx.balance_of(RECEIVER, &voucher()), amount(0));
    assert_eq!(ctx.balance_of(RECEIVER, NATIVE_DENOM), amount(0));
    assert_eq!(ctx.balance_of(RESERVE_ADDRESS, &voucher()), amount(ONE_VOUCHER));
    assert_eq!(ctx.totals.transferred_in, amount(0));
}

/// Packets rejected before the transfer application runs are answered with
/// an error acknowledgement and leave every balance untouched.
#[rstest]
#[case::undecodable(vec![0])]
#[case::empty_sender(raw_packet_data_bytes(NATIVE_DENOM, "5", "", RECEIVER))]
#[case::invalid_receiver(raw_packet_data_bytes(NATIVE_DENOM, "5", "cosmos1sender", "not a receiver"))]
#[case::zero_amount(raw_packet_data_bytes(NATIVE_DENOM, "0", "cosmos1sender", RECEIVER))]
fn test_recv_rejects_invalid_packet(#[case] data: Vec<u8>) {
    let mut ctx = setup(WrapSettingsConfig::builder().build());
    let stack = stack(MockTransferModule::default());
    let packet: Packet = PacketConfig::builder().data(data).build();

    let (extras, ack) = stack.on_recv_packet_execute(&mut ctx, &packet, &relayer());

    assert!(!is_success(&ack));
    assert_eq!(kinds(&extras.events), vec![EVENT_TYPE_ERROR]);
    assert_eq!(ctx.balance_of(RECEIVER, &voucher()), amount(0));
    assert_eq!(ctx.balance_of(RECEIVER, NATIVE_DENOM), amount(0));
}

#[test]
fn test_recv_on_closed_channel_is_rejected() {
    let mut ctx = setup(WrapSettingsConfig::builder().build()).with_channel(
        PortId::transfer(),
        ChannelId::zero(),
        dummy_channel_end(State::Closed, "transfer", Some("channel-5"), ConnectionId::zero()),
    );
    let stack = stack(MockTransferModule::default());

    let (extras, ack) = stack.on_recv_packet_execute(
        &mut ctx,
        &incoming_packet(NATIVE_DENOM, "1000000000000000000"),
        &relayer(),
    );

    assert!(!is_success(&ack));
    assert!(attribute(&extras.events[0], "error").contains("is not open"));
    assert_eq!(ctx.balance_of(RECEIVER, &voucher()), amount(0));
}

#[test]
fn test_recv_error_ack_from_transfer_is_returned_unchanged() {
    let mut ctx = setup(WrapSettingsConfig::builder().build());
    let stack = stack(MockTransferModule {
        fail_recv: true,
        ..Default::default()
    });

    let (extras, ack) = stack.on_recv_packet_execute(
        &mut ctx,
        &incoming_packet(NATIVE_DENOM, "1000000000000000000"),
        &relayer(),
    );

    assert!(!is_success(&ack));
    assert!(extras.events.is_empty());
    assert_eq!(ctx.balance_of(RECEIVER, NATIVE_DENOM), amount(0));
    assert_eq!(
        ctx.balance_of(RESERVE_ADDRESS, NATIVE_DENOM),
        amount(RESERVE_FUNDS)
    );
}
