use crate::chat::messages::{ChatMessage, ChatRequest};
use crate::errors::Result;
use crate::settings::ChatSettings;

pub const GREETING: &str = "Hi! I'm your Ollo CoPilot Companion. How can I help?";

/// Shown instead of an empty reply.
pub const EMPTY_REPLY: &str = "...";

pub const SYSTEM_PROMPT: &str = "You are Ollo \u{2014} a witty, warm, slightly edgy 21-year-old companion with dry/dark humor. \
Be playful, kind, and hype your human up, but never punch down. Keep replies short, high-signal, and conversational. \
Use emojis sparingly (only if they add vibe).

Style
- Funny, a little chaotic in a good way, but respectful
- Snappy sentences, clear takeaways, minimal fluff
- Ask a clarifying question when needed

Boundaries & Safety
- No bigotry, slurs, harassment, sexual content involving minors, self-harm encouragement, or illegal guidance
- Don\u{2019}t provide definitive medical/legal/financial advice; suggest professionals when relevant
- Respect privacy; don\u{2019}t store sensitive info without consent

Behavior
- If asked to do something harmful or disallowed, refuse with wit and offer a safe alternative
- Be supportive during tough moments; encourage breaks, hydration, and reaching out to real humans when needed
- Celebrate wins, even small ones

Capabilities
- Helpful chat, planning, learning support, creative brainstorming, and light entertainment
- Keep it useful, keep it kind, keep it fun

Remember: You\u{2019}re here to make life easier and lighter \u{2014} be helpful, funny, and safe.";

/// The visible transcript and the in-flight flag.
///
/// The system prompt is never part of the transcript; it is prepended to
/// every request instead.
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    loading: bool,
    model: String,
    temperature: f32,
}

impl ChatSession {
    #[must_use]
    pub fn new(settings: &ChatSettings) -> Self {
        Self {
            messages: vec![ChatMessage::assistant(GREETING)],
            loading: false,
            model: settings.model.clone(),
            temperature: settings.temperature,
        }
    }

    #[inline]
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Appends the user's message and builds the request for it.
    ///
    /// Returns `None` for blank input or while a previous send is in flight.
    pub fn begin_send(&mut self, input: &str) -> Option<ChatRequest> {
        let content = input.trim();
        if content.is_empty() || self.loading {
            return None;
        }

        self.messages.push(ChatMessage::user(content));
        self.loading = true;

        let messages = std::iter::once(ChatMessage::system(SYSTEM_PROMPT))
            .chain(self.messages.iter().cloned())
            .collect();

        Some(ChatRequest {
            model: self.model.clone(),
            temperature: self.temperature,
            messages,
        })
    }

    /// Records the outcome of the in-flight send as an assistant message.
    pub fn finish(&mut self, result: Result<String>) {
        let content = match result {
            Ok(reply) => {
                let reply = reply.trim();
                if reply.is_empty() {
                    EMPTY_REPLY.to_string()
                } else {
                    reply.to_string()
                }
            }
            Err(err) => {
                log::warn!("Chat request failed: {err}");
                format!("I hit a snag: {err}")
            }
        };
        self.messages.push(ChatMessage::assistant(content));
        self.loading = false;
    }
}
