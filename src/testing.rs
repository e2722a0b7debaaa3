//! Scripted completion provider for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::chat::{
    ChatCompletion, CompletionProvider, CompletionRequest, CompletionStream, StreamChoice,
    StreamDelta, StreamResponse, Usage,
};
use crate::error::GatewayError;

/// How one model behaves.
#[derive(Clone, Debug, Default)]
pub(crate) struct Script {
    reply: String,
    delay: Duration,
    usage: Option<Usage>,
    transient_failures: usize,
    fails_with: Option<String>,
    fragments: Vec<String>,
    breaks_mid_stream: bool,
}

impl Script {
    pub(crate) fn reply(text: &str) -> Self {
        Self {
            reply: text.to_string(),
            fragments: vec![text.to_string()],
            ..Self::default()
        }
    }

    /// Every call fails with a 400 carrying `body`.
    pub(crate) fn error(body: &str) -> Self {
        Self {
            fails_with: Some(body.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn delay_ms(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }

    pub(crate) fn usage(mut self, prompt: u32, completion: u32) -> Self {
        self.usage = Some(Usage {
            prompt_tokens: prompt,
            completion_tokens: completion,
            total_tokens: prompt + completion,
        });
        self
    }

    /// The first `n` calls fail with a connection error.
    pub(crate) fn flaky(mut self, n: usize) -> Self {
        self.transient_failures = n;
        self
    }

    pub(crate) fn fragments(mut self, fragments: &[&str]) -> Self {
        self.fragments = fragments.iter().map(|f| f.to_string()).collect();
        self
    }

    pub(crate) fn breaks_mid_stream(mut self) -> Self {
        self.breaks_mid_stream = true;
        self
    }
}

/// Answers per model according to its [`Script`]; unknown models get a 400.
#[derive(Default)]
pub(crate) struct ScriptedProvider {
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn model(mut self, model: &str, script: Script) -> Self {
        self.scripts.insert(model.to_string(), script);
        self
    }

    /// Models in the order their calls were made, one entry per attempt.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn attempts(&self, model: &str) -> usize {
        self.calls().iter().filter(|m| *m == model).count()
    }

    async fn open(&self, request: &CompletionRequest) -> Result<Script, GatewayError> {
        let attempt = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(request.model.clone());
            calls.iter().filter(|m| **m == request.model).count()
        };
        let Some(script) = self.scripts.get(&request.model).cloned() else {
            return Err(GatewayError::Status {
                status: 400,
                body: format!("Invalid model name passed in model={}", request.model),
            });
        };
        match request.timeout {
            Some(limit) if script.delay > limit => {
                tokio::time::sleep(limit).await;
                return Err(GatewayError::Timeout(format!(
                    "no answer within {}ms",
                    limit.as_millis()
                )));
            }
            _ => tokio::time::sleep(script.delay).await,
        }
        if attempt <= script.transient_failures {
            return Err(GatewayError::HttpError("connection reset by peer".into()));
        }
        if let Some(body) = &script.fails_with {
            return Err(GatewayError::Status {
                status: 400,
                body: body.clone(),
            });
        }
        Ok(script)
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<ChatCompletion, GatewayError> {
        let script = self.open(request).await?;
        Ok(ChatCompletion::from_text(script.reply, script.usage))
    }

    async fn complete_stream(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionStream, GatewayError> {
        let script = self.open(request).await?;
        let mut items: Vec<Result<StreamResponse, GatewayError>> = script
            .fragments
            .into_iter()
            .map(|content| {
                Ok(StreamResponse {
                    choices: vec![StreamChoice {
                        delta: StreamDelta {
                            content: Some(content),
                        },
                    }],
                    usage: script.usage,
                })
            })
            .collect();
        if script.breaks_mid_stream {
            items.push(Err(GatewayError::HttpError("stream closed".into())));
        }
        Ok(Box::pin(futures::stream::iter(items)))
    }
}
