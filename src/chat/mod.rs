//! Companion chat: transcript, completion transport and API key handling.

pub mod api_key;
pub mod client;
pub mod messages;
pub mod session;
pub mod transport;

pub use api_key::{ApiKeyStore, FileKeyStore, env_api_key, resolve_api_key};
pub use client::ChatClient;
pub use messages::{ChatChoice, ChatMessage, ChatRequest, ChatResponse, ChoiceMessage, Role};
pub use session::{ChatSession, EMPTY_REPLY, GREETING, SYSTEM_PROMPT};
pub use transport::{ChatTransport, HttpChatTransport};
