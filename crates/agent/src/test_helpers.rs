//! Provider test doubles. Each one counts its calls.

use std::sync::Mutex;
use std::time::Duration;

use bizpilot_core::{Provider, ProviderError, ProviderRequest, ProviderResponse, Usage};

/// Always answers with the same text and usage.
pub struct ScriptedProvider {
    text: String,
    usage: Usage,
    call_count: Mutex<usize>,
    last_request: Mutex<Option<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(text: &str) -> Self {
        Self::with_usage(text, 10, 5)
    }

    pub fn with_usage(text: &str, input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            text: text.to_string(),
            usage: Usage {
                input_tokens,
                output_tokens,
            },
            call_count: Mutex::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn last_request(&self) -> Option<ProviderRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        *self.call_count.lock().unwrap() += 1;
        let model = request.model.clone();
        *self.last_request.lock().unwrap() = Some(request);
        Ok(ProviderResponse {
            text: self.text.clone(),
            usage: self.usage,
            model,
        })
    }
}

/// Fails every call with a server error.
#[derive(Default)]
pub struct FailingProvider {
    call_count: Mutex<usize>,
}

impl FailingProvider {
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl Provider for FailingProvider {
    fn name(&self) -> &str {
        "failing_mock"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        *self.call_count.lock().unwrap() += 1;
        Err(ProviderError::ApiError {
            status_code: 500,
            message: "internal error".into(),
        })
    }
}

/// Never answers within any reasonable timeout.
#[derive(Default)]
pub struct HangingProvider {
    call_count: Mutex<usize>,
}

impl HangingProvider {
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl Provider for HangingProvider {
    fn name(&self) -> &str {
        "hanging_mock"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        *self.call_count.lock().unwrap() += 1;
        tokio::time::sleep(Duration::from_secs(3_600)).await;
        Err(ProviderError::Timeout("never answered".into()))
    }
}
