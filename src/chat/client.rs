use crate::chat::api_key::{ApiKeyStore, env_api_key, resolve_api_key};
use crate::chat::messages::ChatMessage;
use crate::chat::session::ChatSession;
use crate::chat::transport::{ChatTransport, HttpChatTransport};
use crate::errors::Result;
use crate::settings::ChatSettings;

/// A chat session wired to a transport and an API key.
#[derive(Debug)]
pub struct ChatClient<T: ChatTransport = HttpChatTransport> {
    transport: T,
    session: ChatSession,
    user_key: Option<String>,
    env_key: Option<String>,
}

impl ChatClient<HttpChatTransport> {
    /// HTTP client for the configured endpoint, with the environment fallback key.
    #[must_use]
    pub fn from_settings(settings: &ChatSettings) -> Self {
        Self::new(HttpChatTransport::new(&settings.endpoint), settings)
            .with_env_key(env_api_key(&settings.api_key_env))
    }
}

impl<T: ChatTransport> ChatClient<T> {
    pub fn new(transport: T, settings: &ChatSettings) -> Self {
        Self {
            transport,
            session: ChatSession::new(settings),
            user_key: None,
            env_key: None,
        }
    }

    #[must_use]
    pub fn with_env_key(mut self, key: Option<String>) -> Self {
        self.env_key = key;
        self
    }

    pub fn set_api_key(&mut self, key: Option<String>) {
        self.user_key = key.filter(|k| !k.is_empty());
    }

    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.user_key.as_deref()
    }

    /// Restores the user's key from `store`.
    pub fn load_api_key(&mut self, store: &impl ApiKeyStore) -> Result<()> {
        self.user_key = store.load()?;
        Ok(())
    }

    /// Persists the user's key to `store`, or clears it when unset.
    pub fn save_api_key(&self, store: &impl ApiKeyStore) -> Result<()> {
        match &self.user_key {
            Some(key) => store.save(key),
            None => store.clear(),
        }
    }

    #[inline]
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[inline]
    #[must_use]
    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    #[inline]
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        self.session.messages()
    }

    /// Sends `input` and appends the reply (or the failure) to the transcript.
    ///
    /// Returns the appended assistant message, or `None` when the input was
    /// ignored.
    pub async fn send(&mut self, input: &str) -> Option<&ChatMessage> {
        let request = self.session.begin_send(input)?;

        let result = match resolve_api_key(self.user_key.as_deref(), self.env_key.as_deref()) {
            Ok(key) => self
                .transport
                .complete(&key, &request)
                .await
                .map(|response| response.first_content().unwrap_or_default().to_string()),
            Err(err) => Err(err),
        };

        self.session.finish(result);
        self.session.messages().last()
    }
}
