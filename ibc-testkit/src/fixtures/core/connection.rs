use core::str::FromStr;
use core::time::Duration;

use ibc_core::commitment_types::commitment::CommitmentPrefix;
use ibc_core::connection::types::version::Version;
use ibc_core::connection::types::{ConnectionEnd, Counterparty, State};
use ibc_core::host::types::identifiers::{ClientId, ConnectionId};
use ibc_core::primitives::prelude::*;

/// Returns an open connection end between the light clients `client_id` on
/// this chain and `counterparty_client_id` on the counterparty.
pub fn dummy_connection_end(client_id: &str, counterparty_client_id: &str) -> ConnectionEnd {
    ConnectionEnd::new(
        State::Open,
        ClientId::from_str(client_id).expect("valid client id"),
        Counterparty::new(
            ClientId::from_str(counterparty_client_id).expect("valid client id"),
            Some(ConnectionId::zero()),
            CommitmentPrefix::try_from(b"ibc".to_vec()).expect("non-empty prefix"),
        ),
        Version::compatibles(),
        Duration::from_secs(0),
    )
    .expect("valid connection end")
}
