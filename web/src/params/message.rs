use serde_json::Value;
use sse::message::DEFAULT_MESSAGE;

/// Body of `POST /send-message`.
///
/// Parsed leniently from the raw body: anything other than a JSON object with a
/// non-empty string `message` yields the default message instead of a rejection.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct SendMessageParams {
    pub(crate) message: Option<String>,
}

impl SendMessageParams {
    pub(crate) fn from_body(body: &[u8]) -> Self {
        let message = serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
            })
            .filter(|message| !message.is_empty());

        Self { message }
    }

    pub(crate) fn message_or_default(self) -> String {
        self.message.unwrap_or_else(|| DEFAULT_MESSAGE.to_string())
    }
}
