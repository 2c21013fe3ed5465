//! Scripted transport shared by the unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use webflow_core::types::RequestDescriptor;

use crate::client::{RawResponse, Transport};
use crate::WebflowResult;

/// Replays canned responses in order and records every request it sees.
///
/// Once the script runs dry the last response is repeated.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<RawResponse>>,
    requests: Mutex<Vec<RequestDescriptor>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<RawResponse>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &RequestDescriptor) -> WebflowResult<RawResponse> {
        self.requests.lock().unwrap().push(request.clone());

        let mut script = self.script.lock().unwrap();
        let response = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        };
        Ok(response.unwrap_or_else(|| RawResponse::new(500, "script exhausted")))
    }
}
