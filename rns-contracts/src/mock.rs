//! Scripted [`CallTransport`] for tests.

use std::collections::HashMap;
use std::time::Duration;

use alloy::sol_types::SolValue;
use async_trait::async_trait;
use parking_lot::Mutex;

use rns_core::error::{Result, RnsError};
use rns_core::network::NetworkConfig;
use rns_core::traits::CallTransport;
use rns_core::types::{Address, B256};

use crate::abi::{sol_address, sol_bytes32, ContractCall};

/// Scripted reply for one call.
#[derive(Clone, Debug)]
pub enum MockReply {
    /// Raw return data
    Data(Vec<u8>),
    /// Execution reverted with the given reason
    Revert(String),
    /// RPC failure
    Error(String),
}

impl MockReply {
    /// Returns a `bytes32`.
    pub fn bytes32(value: B256) -> Self {
        Self::Data(sol_bytes32(value).abi_encode())
    }

    /// Returns an `address`.
    pub fn address(value: Address) -> Self {
        Self::Data(sol_address(value).abi_encode())
    }

    /// Returns a `string`.
    pub fn string(value: &str) -> Self {
        Self::Data(value.to_string().abi_encode())
    }

    /// Returns a `bool`.
    pub fn boolean(value: bool) -> Self {
        Self::Data(value.abi_encode())
    }

    /// Returns a `uint256`.
    pub fn uint(value: u64) -> Self {
        Self::Data(alloy::primitives::U256::from(value).abi_encode())
    }
}

#[derive(Clone, Debug)]
struct Scripted {
    reply: MockReply,
    delay: Option<Duration>,
}

/// A call seen by the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    /// Chain the call was sent to
    pub chain_id: u64,
    /// Contract address
    pub to: Address,
    /// Calldata
    pub data: Vec<u8>,
}

/// Replies from a table keyed by contract and calldata, and records every call.
///
/// Unscripted calls fail with an RPC error.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<(Address, Vec<u8>), Scripted>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    /// Creates an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the reply for `call`.
    pub fn on<R>(&self, call: &ContractCall<R>, reply: MockReply) -> &Self {
        self.insert(call, reply, None)
    }

    /// Scripts the reply for `call`, delivered after `delay`.
    pub fn on_delayed<R>(
        &self,
        call: &ContractCall<R>,
        reply: MockReply,
        delay: Duration,
    ) -> &Self {
        self.insert(call, reply, Some(delay))
    }

    fn insert<R>(
        &self,
        call: &ContractCall<R>,
        reply: MockReply,
        delay: Option<Duration>,
    ) -> &Self {
        self.replies
            .lock()
            .insert((call.to, call.encode()), Scripted { reply, delay });
        self
    }

    /// All calls seen so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Number of calls seen so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Number of calls sent to `to`.
    pub fn calls_to(&self, to: Address) -> usize {
        self.calls.lock().iter().filter(|c| c.to == to).count()
    }

    /// Number of calls matching `call` exactly.
    pub fn calls_matching<R>(&self, call: &ContractCall<R>) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.to == call.to && c.data == call.calldata())
            .count()
    }
}

#[async_trait]
impl CallTransport for MockTransport {
    async fn eth_call(
        &self,
        network: &NetworkConfig,
        to: Address,
        data: &[u8],
    ) -> Result<Vec<u8>> {
        self.calls.lock().push(RecordedCall {
            chain_id: network.chain_id,
            to,
            data: data.to_vec(),
        });

        let scripted = self.replies.lock().get(&(to, data.to_vec())).cloned();
        let Some(scripted) = scripted else {
            return Err(RnsError::RpcError(format!(
                "no scripted reply for call to {}",
                to
            )));
        };

        if let Some(delay) = scripted.delay {
            tokio::time::sleep(delay).await;
        }

        match scripted.reply {
            MockReply::Data(data) => Ok(data),
            MockReply::Revert(reason) => Err(RnsError::ExecutionReverted(reason)),
            MockReply::Error(message) => Err(RnsError::RpcError(message)),
        }
    }
}
