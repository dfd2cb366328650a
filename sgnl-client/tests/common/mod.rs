// sgnl-client/tests/common/mod.rs
// =============================================================================
// Module: Client Test Helpers
// Description: Injectable transport stub for client integration tests.
// Purpose: Script replies and record posted bodies without a network.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use sgnl_client::ClientError;
use sgnl_client::DecisionTransport;
use sgnl_client::RetryPolicy;
use sgnl_client::SgnlClient;
use sgnl_client::TransportReply;
use sgnl_core::RequestId;

/// One recorded transport call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub endpoint: String,
    pub request_id: String,
    pub body: serde_json::Value,
}

/// Shared state between a test and the client-owned transport.
#[derive(Default)]
pub struct MockState {
    pub replies: Mutex<VecDeque<Result<TransportReply, ClientError>>>,
    pub calls: Mutex<Vec<RecordedCall>>,
}

impl MockState {
    /// Queues a 200 reply with the given body.
    pub fn push_ok(&self, body: &str) {
        self.push_status(200, body);
    }

    /// Queues a reply with an arbitrary status.
    pub fn push_status(&self, status: u16, body: &str) {
        self.replies.lock().expect("replies lock").push_back(Ok(TransportReply {
            status,
            body: body.to_string(),
        }));
    }

    /// Queues a transport-level failure.
    pub fn push_err(&self, err: ClientError) {
        self.replies.lock().expect("replies lock").push_back(Err(err));
    }

    /// Returns the recorded calls so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Returns the number of transport round trips performed.
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }
}

/// Transport stub that replays scripted replies in order.
pub struct MockTransport {
    pub state: Arc<MockState>,
}

impl DecisionTransport for MockTransport {
    fn post(
        &self,
        endpoint: &str,
        request_id: &RequestId,
        _token: &str,
        body: &serde_json::Value,
    ) -> Result<TransportReply, ClientError> {
        self.state.calls.lock().expect("calls lock").push(RecordedCall {
            endpoint: endpoint.to_string(),
            request_id: request_id.as_str().to_string(),
            body: body.clone(),
        });
        self.state
            .replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted reply for call to {endpoint}"))
    }
}

/// Builds a client around a fresh mock transport with no retries.
pub fn client_with_mock() -> (SgnlClient, Arc<MockState>) {
    client_with_retry(RetryPolicy::default())
}

/// Builds a client around a fresh mock transport with the given policy.
pub fn client_with_retry(retry: RetryPolicy) -> (SgnlClient, Arc<MockState>) {
    let state = Arc::new(MockState::default());
    let transport = MockTransport {
        state: Arc::clone(&state),
    };
    (SgnlClient::from_parts(Box::new(transport), retry), state)
}
