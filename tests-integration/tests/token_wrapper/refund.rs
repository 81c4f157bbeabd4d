use ibc_app_token_wrapper::handler::{REFUND_REASON_ACK_ERROR, REFUND_REASON_TIMEOUT};
use ibc_app_token_wrapper_types::error::TokenWrapperError;
use ibc_app_token_wrapper_types::events::{EVENT_TYPE_ERROR, EVENT_TYPE_INFO, EVENT_TYPE_REFUND};
use ibc_app_transfer_types::ack_success_b64;
use ibc_core::channel::types::acknowledgement::{
    Acknowledgement, AcknowledgementStatus, StatusValue,
};
use ibc_core::channel::types::channel::State;
use ibc_core::channel::types::packet::Packet;
use ibc_core::host::types::identifiers::{ChannelId, ConnectionId, PortId};
use ibc_token_wrapper_testkit::fixtures::applications::token_wrapper::{
    raw_packet_data_bytes, WrapSettingsConfig, NATIVE_DENOM,
};
use ibc_token_wrapper_testkit::fixtures::core::channel::dummy_channel_end;
use ibc_token_wrapper_testkit::testapp::{
    send_transfer_execute, MockTransferModule, MockWrapperContext, EVENT_TYPE_PACKET,
    RESERVE_ADDRESS,
};
use rstest::rstest;

use crate::common::*;

fn error_ack() -> Acknowledgement {
    AcknowledgementStatus::error(StatusValue::new("counterparty rejected the transfer").unwrap())
        .into()
}

fn assert_sender_refunded(ctx: &MockWrapperContext) {
    assert_eq!(ctx.balance_of(SENDER, NATIVE_DENOM), amount(SENDER_FUNDS));
    assert_eq!(ctx.balance_of(SENDER, &voucher()), amount(0));
    assert_eq!(
        ctx.balance_of(RESERVE_ADDRESS, NATIVE_DENOM),
        amount(RESERVE_FUNDS)
    );
    assert_eq!(
        ctx.balance_of(RESERVE_ADDRESS, &voucher()),
        amount(5 * ONE_VOUCHER)
    );
    assert_eq!(ctx.totals.transferred_out, amount(0));
}

#[test_log::test]
fn test_timeout_refunds_native_tokens() {
    let mut ctx = setup_send(WrapSettingsConfig::builder().build());
    let stack = stack(MockTransferModule::default());
    let packet = send_one_native(&mut ctx, &stack);

    let (extras, result) = stack.on_timeout_packet_execute(&mut ctx, &packet, &relayer());

    assert!(result.is_ok());
    assert_sender_refunded(&ctx);
    assert_eq!(kinds(&extras.events), vec![EVENT_TYPE_PACKET, EVENT_TYPE_REFUND]);

    let refund = &extras.events[1];
    assert_eq!(attribute(refund, "refund_receiver"), SENDER);
    assert_eq!(attribute(refund, "refund_denom"), NATIVE_DENOM);
    assert_eq!(attribute(refund, "refund_amount"), "1000000");
    assert_eq!(attribute(refund, "reason"), REFUND_REASON_TIMEOUT);
}

#[test_log::test]
fn test_error_ack_refunds_native_tokens() {
    let mut ctx = setup_send(WrapSettingsConfig::builder().build());
    let stack = stack(MockTransferModule::default());
    let packet = send_one_native(&mut ctx, &stack);

    let (extras, result) =
        stack.on_acknowledgement_packet_execute(&mut ctx, &packet, &error_ack(), &relayer());

    assert!(result.is_ok());
    assert_sender_refunded(&ctx);
    assert_eq!(kinds(&extras.events), vec![EVENT_TYPE_PACKET, EVENT_TYPE_REFUND]);
    assert_eq!(attribute(&extras.events[1], "reason"), REFUND_REASON_ACK_ERROR);
}

#[test]
fn test_success_ack_keeps_the_unwrap() {
    let mut ctx = setup_send(WrapSettingsConfig::builder().build());
    let stack = stack(MockTransferModule::default());
    let packet = send_one_native(&mut ctx, &stack);
    let ack: Acknowledgement = AcknowledgementStatus::success(ack_success_b64()).into();

    let (extras, result) =
        stack.on_acknowledgement_packet_execute(&mut ctx, &packet, &ack, &relayer());

    assert!(result.is_ok());
    assert!(extras.events.is_empty());
    assert_eq!(
        ctx.balance_of(SENDER, NATIVE_DENOM),
        amount(SENDER_FUNDS - ONE_NATIVE)
    );
    assert_eq!(ctx.totals.transferred_out, amount(ONE_NATIVE));
}

#[test]
fn test_undecodable_ack_is_left_to_the_transfer_application() {
    let mut ctx = setup_send(WrapSettingsConfig::builder().build());
    let stack = stack(MockTransferModule::default());
    let packet = send_one_native(&mut ctx, &stack);
    let ack = Acknowledgement::try_from(b"not an acknowledgement".to_vec()).unwrap();

    let (_, result) = stack.on_acknowledgement_packet_execute(&mut ctx, &packet, &ack, &relayer());

    assert!(matches!(result, Err(TokenWrapperError::AckDeserialization)));
    assert_eq!(ctx.totals.transferred_out, amount(ONE_NATIVE));
}

#[rstest]
#[case::timeout(None)]
#[case::error_ack(Some(error_ack()))]
fn test_failed_transfer_refund_skips_the_wrapper(#[case] ack: Option<Acknowledgement>) {
    let mut ctx = setup_send(WrapSettingsConfig::builder().build());
    let packet = send_one_native(&mut ctx, &stack(MockTransferModule::default()));
    let failing = stack(MockTransferModule {
        fail_refund: true,
        ..Default::default()
    });

    let (extras, result) = match ack {
        Some(ack) => failing.on_acknowledgement_packet_execute(&mut ctx, &packet, &ack, &relayer()),
        None => failing.on_timeout_packet_execute(&mut ctx, &packet, &relayer()),
    };

    assert!(matches!(result, Err(TokenWrapperError::Host { .. })));
    assert!(extras.events.is_empty());
    assert_eq!(
        ctx.balance_of(SENDER, NATIVE_DENOM),
        amount(SENDER_FUNDS - ONE_NATIVE)
    );
    assert_eq!(ctx.balance_of(SENDER, &voucher()), amount(0));
    assert_eq!(ctx.totals.transferred_out, amount(ONE_NATIVE));
}

#[test_log::test]
fn test_failed_wrapper_refund_keeps_transfer_result() {
    let mut ctx = setup_send(WrapSettingsConfig::builder().build());
    let stack = stack(MockTransferModule::default());
    let packet = send_one_native(&mut ctx, &stack);
    ctx.balances.remove(&(
        MockWrapperContext::reserve(),
        NATIVE_DENOM.to_string(),
    ));

    let (extras, result) = stack.on_timeout_packet_execute(&mut ctx, &packet, &relayer());

    assert!(result.is_ok());
    assert_eq!(kinds(&extras.events), vec![EVENT_TYPE_PACKET, EVENT_TYPE_ERROR]);
    assert_eq!(ctx.balance_of(SENDER, &voucher()), amount(ONE_VOUCHER));
    assert_eq!(
        ctx.balance_of(SENDER, NATIVE_DENOM),
        amount(SENDER_FUNDS - ONE_NATIVE)
    );
    assert_eq!(ctx.totals.transferred_out, amount(ONE_NATIVE));
}

#[test]
fn test_timeout_of_forwarded_packet_is_left_to_the_transfer_application() {
    let mut ctx = setup_send(WrapSettingsConfig::builder().build());
    ctx.mint_coins(&MockWrapperContext::account(SENDER), "uatom", amount(10));
    let stack = stack(MockTransferModule::default());
    let packet = outgoing_packet("uatom", "10");
    send_transfer_execute(&mut ctx, &stack, packet.clone()).unwrap();

    let (extras, result) = stack.on_timeout_packet_execute(&mut ctx, &packet, &relayer());

    assert!(result.is_ok());
    assert_eq!(kinds(&extras.events), vec![EVENT_TYPE_PACKET, EVENT_TYPE_INFO]);
    assert_eq!(ctx.balance_of(SENDER, "uatom"), amount(10));
    assert!(ctx.events_of_kind(EVENT_TYPE_REFUND).is_empty());
}

#[test]
fn test_timeout_while_disabled_leaves_vouchers_with_sender() {
    let mut ctx = setup_send(WrapSettingsConfig::builder().build());
    let stack = stack(MockTransferModule::default());
    let packet = send_one_native(&mut ctx, &stack);
    ctx.settings.enabled = false;

    let (extras, result) = stack.on_timeout_packet_execute(&mut ctx, &packet, &relayer());

    assert!(result.is_ok());
    assert_eq!(kinds(&extras.events), vec![EVENT_TYPE_PACKET, EVENT_TYPE_INFO]);
    assert_eq!(ctx.balance_of(SENDER, &voucher()), amount(ONE_VOUCHER));
}

fn close_channel(ctx: &mut MockWrapperContext, _: &mut Packet) {
    ctx.channels.insert(
        (PortId::transfer(), ChannelId::zero()),
        dummy_channel_end(State::Closed, "transfer", Some("channel-5"), ConnectionId::zero()),
    );
}

fn remove_channel(ctx: &mut MockWrapperContext, _: &mut Packet) {
    ctx.channels.remove(&(PortId::transfer(), ChannelId::zero()));
}

fn garble_payload(_: &mut MockWrapperContext, packet: &mut Packet) {
    packet.data = b"not packet data".to_vec();
}

fn invalid_sender(_: &mut MockWrapperContext, packet: &mut Packet) {
    packet.data = raw_packet_data_bytes(
        "transfer/channel-0/uzig",
        "1000000000000000000",
        "not a sender",
        COUNTERPARTY_RECEIVER,
    );
}

fn zero_amount(_: &mut MockWrapperContext, packet: &mut Packet) {
    packet.data = raw_packet_data_bytes(
        "transfer/channel-0/uzig",
        "0",
        SENDER,
        COUNTERPARTY_RECEIVER,
    );
}

fn other_destination(_: &mut MockWrapperContext, packet: &mut Packet) {
    packet.chan_id_on_b = ChannelId::new(7);
}

#[rstest]
#[case::closed_channel(close_channel, true, EVENT_TYPE_ERROR)]
#[case::missing_channel(remove_channel, true, EVENT_TYPE_ERROR)]
#[case::undecodable(garble_payload, false, EVENT_TYPE_ERROR)]
#[case::invalid_sender(invalid_sender, false, EVENT_TYPE_ERROR)]
#[case::zero_amount(zero_amount, true, EVENT_TYPE_ERROR)]
#[case::other_destination(other_destination, true, EVENT_TYPE_INFO)]
fn test_timeout_skips_packets_the_wrapper_cannot_refund(
    #[case] tamper: fn(&mut MockWrapperContext, &mut Packet),
    #[case] transfer_refunds: bool,
    #[case] skip_kind: &str,
) {
    let mut ctx = setup_send(WrapSettingsConfig::builder().build());
    let stack = stack(MockTransferModule::default());
    let mut packet = send_one_native(&mut ctx, &stack);
    tamper(&mut ctx, &mut packet);

    let (extras, result) = stack.on_timeout_packet_execute(&mut ctx, &packet, &relayer());

    assert_eq!(result.is_ok(), transfer_refunds);
    assert_eq!(kinds(&extras.events).last(), Some(&skip_kind));
    assert!(!kinds(&extras.events).contains(&EVENT_TYPE_REFUND));
    assert_eq!(
        ctx.balance_of(SENDER, NATIVE_DENOM),
        amount(SENDER_FUNDS - ONE_NATIVE)
    );
    assert_eq!(
        ctx.balance_of(RESERVE_ADDRESS, NATIVE_DENOM),
        amount(RESERVE_FUNDS + ONE_NATIVE)
    );
    assert_eq!(ctx.totals.transferred_out, amount(ONE_NATIVE));
}

#[test]
fn test_timeout_on_closed_channel_leaves_vouchers_with_sender() {
    let mut ctx = setup_send(WrapSettingsConfig::builder().build());
    let stack = stack(MockTransferModule::default());
    let mut packet = send_one_native(&mut ctx, &stack);
    close_channel(&mut ctx, &mut packet);

    let (extras, result) = stack.on_timeout_packet_execute(&mut ctx, &packet, &relayer());

    assert!(result.is_ok());
    assert_eq!(kinds(&extras.events), vec![EVENT_TYPE_PACKET, EVENT_TYPE_ERROR]);
    assert_eq!(ctx.balance_of(SENDER, &voucher()), amount(ONE_VOUCHER));
}

#[test]
fn test_undecodable_timeout_returns_the_transfer_error() {
    let mut ctx = setup_send(WrapSettingsConfig::builder().build());
    let stack = stack(MockTransferModule::default());
    let mut packet = send_one_native(&mut ctx, &stack);
    garble_payload(&mut ctx, &mut packet);

    let (extras, result) = stack.on_timeout_packet_execute(&mut ctx, &packet, &relayer());

    assert!(matches!(
        result,
        Err(TokenWrapperError::PacketDataDeserialization)
    ));
    assert_eq!(kinds(&extras.events), vec![EVENT_TYPE_ERROR]);
}
