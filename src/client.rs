//! The OpenAI client: singleton lifecycle, assistant-thread operations, and
//! single-shot chat-completion helpers.
//!
//! Every request method is a thin pass-through to one API call. The contract
//! for the request methods is "never throw": any transport or API failure is
//! logged with enough context to diagnose and converted to the method's
//! documented sentinel value. Typed errors ([`ClientError`]) exist internally
//! and on the lifecycle functions only.

use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

use crate::config::{AppConfig, ModelSlot};
use crate::error::ClientError;
use crate::stream::{RunEventHandler, SseParser, SseRecord};
use crate::types::{ContentKind, Role, ThreadMessage};

static INSTANCE: OnceCell<OpenAiClient> = OnceCell::const_new();

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const ASSISTANTS_BETA_HEADER: &str = "OpenAI-Beta";
const ASSISTANTS_BETA_VALUE: &str = "assistants=v2";

const IMAGE_MAX_TOKENS: u32 = 300;
const SUMMARY_MAX_TOKENS: u32 = 100;
const CLASSIFY_MAX_TOKENS: u32 = 10;

pub const NO_DESCRIPTION: &str = "No description available";
pub const NO_SUMMARY: &str = "No summary available";

const IMAGE_SYSTEM_PROMPT: &str = "Your purpose is to provide a description of the image content embedded in the message.\n\n\
     Provide a succinct description useful for someone who can't see it. \
     Include any relevant text or context in the image, but try to keep it concise.";

const IMAGE_USER_PROMPT: &str =
    "What is in this image? Provide a succinct description useful for someone who can't see it.";

const TEXT_SUMMARY_SYSTEM_PROMPT: &str =
    "Your purpose is to provide a concise, succinct summary of text descriptions.";

const LINK_SUMMARY_SYSTEM_PROMPT: &str = "Your purpose is to describe the content of a webpage based on its URL.\n\n\
     Extract any details you can from the names, titles, and descriptions in the URL.\n\n\
     Provide a concise, succinct summary of the content that would be useful for someone who can't access the page.";

const CLASSIFY_SYSTEM_PROMPT: &str = "Based on the most recent message, reply with one word that best describes the type of response \
     that would be most relevant and helpful: 'message', 'GIF', 'YouTube', or 'Website'\n\
     Do not provide any additional text or explanations.\n\
     If the user asks for the latest news or current events, respond with 'Website'.\n\
     If a user responds with a Website, YouTube, or GIF, the bot should respond with a message.\n\
     **ONLY REPLY WITH ONE OF THE FOLLOWING WORDS:** message, GIF, YouTube, or Website";

const CLASSIFY_FINAL_PROMPT: &str =
    "Now determine the content type of your response: message, GIF, YouTube, or Website.";

// --- API Wire Types (OpenAI format) ---

/// The remotely configured assistant retrieved at initialization.
#[derive(Debug, Clone, Deserialize)]
pub struct Assistant {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Serialize)]
struct ApiChatRequest<'a> {
    model: &'a str,
    messages: Vec<ApiChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ApiChatMessage {
    role: Role,
    content: ApiChatContent,
}

impl ApiChatMessage {
    fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: ApiChatContent::Text(content.into()),
        }
    }
}

/// Content is either a plain string or an array of content parts (the image
/// call sends a text part plus an image-url part).
#[derive(Serialize)]
#[serde(untagged)]
enum ApiChatContent {
    Text(String),
    Parts(Vec<ApiContentPart>),
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ApiContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ApiImageUrl },
}

#[derive(Serialize)]
struct ApiImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ApiChatResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Deserialize)]
struct ApiResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiThread {
    id: String,
}

// --- Client ---

/// Process-wide client for the conversational-AI service.
///
/// Obtain the shared instance with [`OpenAiClient::get_or_create`], or build
/// one explicitly with [`OpenAiClient::connect`] and own it at the
/// application's composition root. All fields are immutable once `connect`
/// returns; the one `reqwest::Client` is safely shared across concurrent
/// request flows.
pub struct OpenAiClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    assistant: Option<Assistant>,
    reasoning_model: ModelSlot,
    message_model: ModelSlot,
    image_model: ModelSlot,
}

impl OpenAiClient {
    /// Build a client from configuration.
    ///
    /// Attempts to retrieve the configured assistant; failure there is soft:
    /// it is logged and the client comes up without an assistant, leaving the
    /// chat-completion helpers usable and only streaming runs disabled.
    pub async fn connect(config: &AppConfig) -> Result<Self, ClientError> {
        let api_key = config
            .api_key()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        let api_base = config
            .openai
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let mut client = Self {
            http: reqwest::Client::new(),
            api_base,
            api_key,
            assistant: None,
            reasoning_model: config.models.reasoning.clone(),
            message_model: config.models.message.clone(),
            image_model: config.models.image.clone(),
        };

        let assistant_id = config.openai.assistant_id.as_str();
        match client.retrieve_assistant(assistant_id).await {
            Ok(assistant) => {
                info!(assistant_id, "assistant retrieved successfully");
                client.assistant = Some(assistant);
            }
            Err(e) => {
                error!(assistant_id, error = %e, "failed to retrieve assistant");
            }
        }

        Ok(client)
    }

    /// Return the process-wide instance, initializing it at most once.
    ///
    /// Concurrent callers all await the same initialization; the assistant
    /// retrieval runs at most once per process. A failed initialization
    /// leaves the cell empty so a later call may retry.
    pub async fn get_or_create() -> Result<&'static OpenAiClient, ClientError> {
        INSTANCE
            .get_or_try_init(|| async {
                let config =
                    AppConfig::load().map_err(|e| ClientError::Config(e.to_string()))?;
                Self::connect(&config).await
            })
            .await
    }

    /// Return the process-wide instance without blocking.
    ///
    /// Errors with [`ClientError::NotInitialized`] unless a `get_or_create`
    /// call has already completed; never returns a half-initialized instance.
    pub fn get_existing() -> Result<&'static OpenAiClient, ClientError> {
        INSTANCE.get().ok_or(ClientError::NotInitialized)
    }

    /// The assistant retrieved at initialization, if retrieval succeeded.
    pub fn assistant(&self) -> Option<&Assistant> {
        self.assistant.as_ref()
    }

    // --- Thread Operations ---

    /// Open a new assistant thread for a user. Returns the thread id, or
    /// `None` on any failure.
    pub async fn create_thread(&self, user_id: u64) -> Option<String> {
        debug!(user_id, "creating assistant thread");
        match self.try_create_thread().await {
            Ok(id) => Some(id),
            Err(e) => {
                error!(user_id, error = %e, "failed to create thread");
                None
            }
        }
    }

    async fn try_create_thread(&self) -> Result<String, ClientError> {
        let url = format!("{}/threads", self.api_base);
        let response = self
            .assistants_request(self.http.post(&url))
            .json(&serde_json::json!({}))
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let thread: ApiThread = response.json().await?;
        Ok(thread.id)
    }

    /// Append a message to a thread. Returns `true` on success, `false` on
    /// any failure. No retry; the caller decides whether to retry.
    pub async fn post_message(&self, thread_id: &str, message: &ThreadMessage) -> bool {
        match self.try_post_message(thread_id, message).await {
            Ok(()) => {
                info!(thread_id, "added message to assistant thread");
                true
            }
            Err(e) => {
                error!(
                    thread_id,
                    content = %message.content,
                    error = %e,
                    "failed to add message to thread"
                );
                false
            }
        }
    }

    async fn try_post_message(
        &self,
        thread_id: &str,
        message: &ThreadMessage,
    ) -> Result<(), ClientError> {
        let url = format!("{}/threads/{}/messages", self.api_base, thread_id);
        let response = self
            .assistants_request(self.http.post(&url))
            .json(message)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Start a streaming run of the configured assistant against a thread,
    /// forwarding every event to `handler` and signalling completion via
    /// `handler.on_done()`. Awaits the end of the stream before returning.
    /// Failures (including mid-stream) are logged and swallowed.
    pub async fn run_assistant(&self, thread_id: &str, handler: &mut dyn RunEventHandler) {
        if let Err(e) = self.try_run_assistant(thread_id, handler).await {
            error!(thread_id, error = %e, "error streaming assistant response");
        }
    }

    async fn try_run_assistant(
        &self,
        thread_id: &str,
        handler: &mut dyn RunEventHandler,
    ) -> Result<(), ClientError> {
        let assistant = self.assistant.as_ref().ok_or(ClientError::NoAssistant)?;
        info!(
            thread_id,
            assistant_id = %assistant.id,
            "requesting assistant response"
        );

        let url = format!("{}/threads/{}/runs", self.api_base, thread_id);
        let body = serde_json::json!({
            "assistant_id": assistant.id,
            "stream": true,
        });
        let response = self
            .assistants_request(self.http.post(&url))
            .json(&body)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let mut byte_stream = response.bytes_stream();
        let mut parser = SseParser::new();
        'stream: while let Some(chunk) = byte_stream.next().await {
            let bytes = chunk?;
            for record in parser.feed(&bytes) {
                match record {
                    SseRecord::Event(event) => handler.on_event(event).await,
                    SseRecord::Done => break 'stream,
                }
            }
        }
        handler.on_done().await;
        Ok(())
    }

    // --- Single-Shot Content Methods ---

    /// Describe a base64-encoded image for someone who cannot see it.
    /// Returns [`NO_DESCRIPTION`] on any failure.
    pub async fn describe_image(&self, base64_image: &str) -> String {
        match self.try_describe_image(base64_image).await {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "error processing image content");
                NO_DESCRIPTION.to_string()
            }
        }
    }

    async fn try_describe_image(&self, base64_image: &str) -> Result<String, ClientError> {
        let messages = vec![
            ApiChatMessage::text(Role::System, IMAGE_SYSTEM_PROMPT),
            ApiChatMessage {
                role: Role::User,
                content: ApiChatContent::Parts(vec![
                    ApiContentPart::Text {
                        text: IMAGE_USER_PROMPT.to_string(),
                    },
                    ApiContentPart::ImageUrl {
                        image_url: ApiImageUrl {
                            url: format!("data:image/jpeg;base64,{}", base64_image),
                        },
                    },
                ]),
            },
        ];
        self.chat_completion(&self.image_model, messages, IMAGE_MAX_TOKENS)
            .await
    }

    /// Produce a one-to-two-sentence summary of a text description.
    /// Returns [`NO_SUMMARY`] on any failure.
    pub async fn summarize_text(&self, description: &str) -> String {
        let user_prompt = format!(
            "Create a concise, succinct, one-to-two-sentence summary for the following description:\n\n\
             {}\n\nSummary:",
            description
        );
        let messages = vec![
            ApiChatMessage::text(Role::System, TEXT_SUMMARY_SYSTEM_PROMPT),
            ApiChatMessage::text(Role::User, user_prompt),
        ];
        match self
            .chat_completion(&self.message_model, messages, SUMMARY_MAX_TOKENS)
            .await
        {
            Ok(summary) => summary,
            Err(e) => {
                error!(error = %e, "error summarizing description");
                NO_SUMMARY.to_string()
            }
        }
    }

    /// Describe the likely content of a webpage from its URL string alone;
    /// the page is never fetched. Returns [`NO_SUMMARY`] on any failure.
    pub async fn summarize_link(&self, url: &str) -> String {
        let user_prompt = format!(
            "Please describe the content of the webpage at the following URL: {}\n\nDescription:",
            url
        );
        let messages = vec![
            ApiChatMessage::text(Role::System, LINK_SUMMARY_SYSTEM_PROMPT),
            ApiChatMessage::text(Role::User, user_prompt),
        ];
        match self
            .chat_completion(&self.message_model, messages, SUMMARY_MAX_TOKENS)
            .await
        {
            Ok(summary) => summary,
            Err(e) => {
                error!(url, error = %e, "error summarizing link");
                NO_SUMMARY.to_string()
            }
        }
    }

    /// Classify what kind of reply the bot should produce next, given the
    /// prior message history. Returns `None` on failure or when the model
    /// answers with anything outside the four-word set.
    pub async fn classify_content(&self, history: &[ThreadMessage]) -> Option<ContentKind> {
        match self.try_classify_content(history).await {
            Ok(kind) => Some(kind),
            Err(ClientError::InvalidContentKind(word)) => {
                warn!(word = %word, "invalid content type from model");
                None
            }
            Err(e) => {
                error!(error = %e, "error determining content type");
                None
            }
        }
    }

    async fn try_classify_content(
        &self,
        history: &[ThreadMessage],
    ) -> Result<ContentKind, ClientError> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ApiChatMessage::text(Role::System, CLASSIFY_SYSTEM_PROMPT));
        messages.extend(
            history
                .iter()
                .map(|m| ApiChatMessage::text(m.role.clone(), &m.content)),
        );
        messages.push(ApiChatMessage::text(Role::User, CLASSIFY_FINAL_PROMPT));

        let word = self
            .chat_completion(&self.reasoning_model, messages, CLASSIFY_MAX_TOKENS)
            .await?
            .to_lowercase();
        ContentKind::parse(&word).ok_or(ClientError::InvalidContentKind(word))
    }

    // --- Request Plumbing ---

    /// One chat-completion exchange: send the messages with the slot's model
    /// and temperature, return the first choice's trimmed text.
    async fn chat_completion(
        &self,
        slot: &ModelSlot,
        messages: Vec<ApiChatMessage>,
        max_tokens: u32,
    ) -> Result<String, ClientError> {
        let url = format!("{}/chat/completions", self.api_base);
        let request = ApiChatRequest {
            model: &slot.id,
            messages,
            max_tokens,
            temperature: slot.temperature,
        };
        let response = self
            .authorized(self.http.post(&url))
            .json(&request)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let body: ApiChatResponse = response.json().await?;
        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or(ClientError::EmptyResponse)?;
        let content = choice.message.content.ok_or(ClientError::MissingContent)?;
        Ok(content.trim().to_string())
    }

    async fn retrieve_assistant(&self, assistant_id: &str) -> Result<Assistant, ClientError> {
        let url = format!("{}/assistants/{}", self.api_base, assistant_id);
        let response = self
            .assistants_request(self.http.get(&url))
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
    }

    // Assistants endpoints additionally require the beta opt-in header.
    fn assistants_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        self.authorized(request)
            .header(ASSISTANTS_BETA_HEADER, ASSISTANTS_BETA_VALUE)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OpenAiConfig;
    use crate::stream::RunEvent;
    use async_trait::async_trait;

    fn test_config(api_base: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.openai = OpenAiConfig {
            api_key: Some("sk-test".to_string()),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_base: Some(api_base.to_string()),
            assistant_id: "asst_123".to_string(),
        };
        config
    }

    async fn mock_assistant(server: &mut mockito::ServerGuard) -> mockito::Mock {
        server
            .mock("GET", "/assistants/asst_123")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"asst_123","name":"Helper","model":"gpt-4o"}"#)
            .create_async()
            .await
    }

    fn chat_body(content: &str) -> String {
        format!(
            r#"{{"choices":[{{"message":{{"role":"assistant","content":"{}"}}}}]}}"#,
            content
        )
    }

    #[derive(Default)]
    struct CollectingHandler {
        events: Vec<RunEvent>,
        done: bool,
    }

    #[async_trait]
    impl RunEventHandler for CollectingHandler {
        async fn on_event(&mut self, event: RunEvent) {
            self.events.push(event);
        }

        async fn on_done(&mut self) {
            self.done = true;
        }
    }

    #[test]
    fn test_get_existing_before_init_errors() {
        // No test in this binary initializes the global singleton.
        assert!(matches!(
            OpenAiClient::get_existing(),
            Err(ClientError::NotInitialized)
        ));
    }

    #[tokio::test]
    async fn test_connect_soft_fails_without_assistant() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/assistants/asst_123")
            .with_status(404)
            .with_body(r#"{"error":{"message":"No assistant found"}}"#)
            .create_async()
            .await;

        let client = OpenAiClient::connect(&test_config(&server.url()))
            .await
            .unwrap();
        assert!(client.assistant().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_init_retrieves_assistant_once() {
        let mut server = mockito::Server::new_async().await;
        let assistant_mock = server
            .mock("GET", "/assistants/asst_123")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"asst_123","name":"Helper","model":"gpt-4o"}"#)
            .expect(1)
            .create_async()
            .await;

        let config = test_config(&server.url());
        let cell: OnceCell<OpenAiClient> = OnceCell::const_new();
        let (a, b) = tokio::join!(
            cell.get_or_try_init(|| OpenAiClient::connect(&config)),
            cell.get_or_try_init(|| OpenAiClient::connect(&config)),
        );

        let a = a.unwrap();
        let b = b.unwrap();
        assert!(std::ptr::eq(a, b));
        assert_eq!(a.assistant().unwrap().id, "asst_123");
        assistant_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_thread_returns_id() {
        let mut server = mockito::Server::new_async().await;
        let _a = mock_assistant(&mut server).await;
        let _m = server
            .mock("POST", "/threads")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"thread_abc","object":"thread"}"#)
            .create_async()
            .await;

        let client = OpenAiClient::connect(&test_config(&server.url()))
            .await
            .unwrap();
        assert_eq!(client.create_thread(42).await.as_deref(), Some("thread_abc"));
    }

    #[tokio::test]
    async fn test_create_thread_failure_returns_none() {
        let mut server = mockito::Server::new_async().await;
        let _a = mock_assistant(&mut server).await;
        let _m = server
            .mock("POST", "/threads")
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let client = OpenAiClient::connect(&test_config(&server.url()))
            .await
            .unwrap();
        assert_eq!(client.create_thread(42).await, None);
    }

    #[tokio::test]
    async fn test_post_message_true_on_success_false_on_failure() {
        let mut server = mockito::Server::new_async().await;
        let _a = mock_assistant(&mut server).await;
        let _ok = server
            .mock("POST", "/threads/thread_ok/messages")
            .with_status(200)
            .with_body(r#"{"id":"msg_1"}"#)
            .create_async()
            .await;
        let _bad = server
            .mock("POST", "/threads/thread_bad/messages")
            .with_status(400)
            .with_body(r#"{"error":{"message":"bad request"}}"#)
            .create_async()
            .await;

        let client = OpenAiClient::connect(&test_config(&server.url()))
            .await
            .unwrap();
        let message = ThreadMessage::user("hello there");
        assert!(client.post_message("thread_ok", &message).await);
        assert!(!client.post_message("thread_bad", &message).await);
    }

    #[tokio::test]
    async fn test_run_assistant_forwards_events_and_signals_done() {
        let mut server = mockito::Server::new_async().await;
        let _a = mock_assistant(&mut server).await;
        let sse_body = "event: thread.message.delta\n\
             data: {\"delta\":{\"content\":[{\"text\":{\"value\":\"Hel\"}}]}}\n\n\
             event: thread.message.delta\n\
             data: {\"delta\":{\"content\":[{\"text\":{\"value\":\"lo\"}}]}}\n\n\
             event: thread.message.completed\n\
             data: {\"content\":[{\"text\":{\"value\":\"Hello\"}}]}\n\n\
             event: done\n\
             data: [DONE]\n\n";
        let _m = server
            .mock("POST", "/threads/thread_abc/runs")
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(sse_body)
            .create_async()
            .await;

        let client = OpenAiClient::connect(&test_config(&server.url()))
            .await
            .unwrap();
        let mut handler = CollectingHandler::default();
        client.run_assistant("thread_abc", &mut handler).await;

        assert!(handler.done);
        assert_eq!(
            handler.events,
            vec![
                RunEvent::MessageDelta {
                    text: "Hel".to_string()
                },
                RunEvent::MessageDelta {
                    text: "lo".to_string()
                },
                RunEvent::MessageCompleted {
                    text: "Hello".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_run_assistant_without_assistant_is_a_noop() {
        let server = mockito::Server::new_async().await;
        // No assistant mock: retrieval fails, streaming runs are disabled.
        let client = OpenAiClient::connect(&test_config(&server.url()))
            .await
            .unwrap();
        let mut handler = CollectingHandler::default();
        client.run_assistant("thread_abc", &mut handler).await;
        assert!(handler.events.is_empty());
        assert!(!handler.done);
    }

    #[tokio::test]
    async fn test_describe_image_extracts_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let _a = mock_assistant(&mut server).await;
        let _m = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body("A red bicycle."))
            .create_async()
            .await;

        let client = OpenAiClient::connect(&test_config(&server.url()))
            .await
            .unwrap();
        assert_eq!(client.describe_image("aGVsbG8=").await, "A red bicycle.");
    }

    #[tokio::test]
    async fn test_describe_image_empty_choices_yields_sentinel() {
        let mut server = mockito::Server::new_async().await;
        let _a = mock_assistant(&mut server).await;
        let _m = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let client = OpenAiClient::connect(&test_config(&server.url()))
            .await
            .unwrap();
        assert_eq!(client.describe_image("aGVsbG8=").await, NO_DESCRIPTION);
    }

    #[tokio::test]
    async fn test_summarize_text_failure_yields_sentinel() {
        let mut server = mockito::Server::new_async().await;
        let _a = mock_assistant(&mut server).await;
        let _m = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body(r#"{"error":{"message":"rate limited"}}"#)
            .create_async()
            .await;

        let client = OpenAiClient::connect(&test_config(&server.url()))
            .await
            .unwrap();
        assert_eq!(client.summarize_text("a long description").await, NO_SUMMARY);
    }

    #[tokio::test]
    async fn test_null_content_choice_yields_sentinel() {
        let mut server = mockito::Server::new_async().await;
        let _a = mock_assistant(&mut server).await;
        let _m = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#)
            .create_async()
            .await;

        let client = OpenAiClient::connect(&test_config(&server.url()))
            .await
            .unwrap();
        assert_eq!(client.summarize_text("a description").await, NO_SUMMARY);
    }

    #[tokio::test]
    async fn test_summarize_link_trims_reply() {
        let mut server = mockito::Server::new_async().await;
        let _a = mock_assistant(&mut server).await;
        let _m = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body("  A news article about rockets.  "))
            .create_async()
            .await;

        let client = OpenAiClient::connect(&test_config(&server.url()))
            .await
            .unwrap();
        assert_eq!(
            client.summarize_link("https://example.com/rockets").await,
            "A news article about rockets."
        );
    }

    #[tokio::test]
    async fn test_classify_content_accepts_gif_any_case() {
        let mut server = mockito::Server::new_async().await;
        let _a = mock_assistant(&mut server).await;
        let _m = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body("GIF"))
            .create_async()
            .await;

        let client = OpenAiClient::connect(&test_config(&server.url()))
            .await
            .unwrap();
        let history = vec![ThreadMessage::user("send me something funny")];
        assert_eq!(
            client.classify_content(&history).await,
            Some(ContentKind::Gif)
        );
    }

    #[tokio::test]
    async fn test_classify_content_rejects_out_of_set_word() {
        let mut server = mockito::Server::new_async().await;
        let _a = mock_assistant(&mut server).await;
        let _m = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(chat_body("Maybe?"))
            .create_async()
            .await;

        let client = OpenAiClient::connect(&test_config(&server.url()))
            .await
            .unwrap();
        let history = vec![ThreadMessage::user("hm")];
        assert_eq!(client.classify_content(&history).await, None);
    }
}
