use crate::connection::SubscriberId;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// Text published by `POST /send-message` when the request carries none.
pub const DEFAULT_MESSAGE: &str = "This is a test message";

/// Trait for getting the SSE event type name
pub trait EventType {
    fn event_type(&self) -> &'static str;
}

/// Everything the hub pushes to clients. Serialized as a flat JSON object
/// tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Sent once to a new subscriber, never broadcast.
    Connection {
        message: String,
        #[serde(rename = "clientId")]
        client_id: SubscriberId,
        #[serde(serialize_with = "serialize_timestamp")]
        timestamp: DateTime<Utc>,
    },
    /// Manually published through the HTTP API.
    Message {
        message: String,
        #[serde(serialize_with = "serialize_timestamp")]
        timestamp: DateTime<Utc>,
        clients: usize,
    },
    /// Heartbeat tick.
    Auto {
        message: String,
        #[serde(serialize_with = "serialize_timestamp")]
        timestamp: DateTime<Utc>,
        counter: u64,
        #[serde(rename = "clientCount")]
        client_count: usize,
    },
    /// Simulated feed tick. Prices are pre-formatted to two decimals.
    Stock {
        symbol: String,
        price: String,
        change: String,
        #[serde(serialize_with = "serialize_timestamp")]
        timestamp: DateTime<Utc>,
    },
}

impl Event {
    pub fn welcome(client_id: SubscriberId) -> Self {
        Event::Connection {
            message: format!("Connected, client id={client_id}"),
            client_id,
            timestamp: Utc::now(),
        }
    }

    pub fn message(message: impl Into<String>, clients: usize) -> Self {
        Event::Message {
            message: message.into(),
            timestamp: Utc::now(),
            clients,
        }
    }

    pub fn auto(counter: u64, client_count: usize) -> Self {
        Event::Auto {
            message: format!("Auto message #{counter}"),
            timestamp: Utc::now(),
            counter,
            client_count,
        }
    }

    pub fn stock(symbol: impl Into<String>, price: f64, change: f64) -> Self {
        Event::Stock {
            symbol: symbol.into(),
            price: format_cents(price),
            change: format_cents(change),
            timestamp: Utc::now(),
        }
    }
}

impl EventType for Event {
    fn event_type(&self) -> &'static str {
        match self {
            Event::Connection { .. } => "connection",
            Event::Message { .. } => "message",
            Event::Auto { .. } => "auto",
            Event::Stock { .. } => "stock",
        }
    }
}

/// ISO-8601 UTC with millisecond precision, e.g. `2026-10-17T08:15:30.123Z`.
fn serialize_timestamp<S: Serializer>(
    timestamp: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn format_cents(value: f64) -> String {
    // -0.0 would print as "-0.00"
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::{json, Value};

    fn at_noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    fn to_value(event: &Event) -> Value {
        serde_json::to_value(event).unwrap()
    }

    #[test]
    fn test_message_event_serializes_flat_with_type_tag() {
        let event = Event::Message {
            message: "hello".to_string(),
            timestamp: at_noon(),
            clients: 1,
        };

        assert_eq!(
            to_value(&event),
            json!({
                "type": "message",
                "message": "hello",
                "timestamp": "2026-10-17T12:00:00.000Z",
                "clients": 1
            })
        );
    }

    #[test]
    fn test_welcome_mentions_client_id() {
        let event = Event::welcome(SubscriberId::from(7));
        let value = to_value(&event);

        assert_eq!(value["type"], "connection");
        assert_eq!(value["clientId"], 7);
        assert!(value["message"].as_str().unwrap().contains("id=7"));
        assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_auto_event_uses_camel_case_client_count() {
        let value = to_value(&Event::auto(3, 2));

        assert_eq!(value["type"], "auto");
        assert_eq!(value["counter"], 3);
        assert_eq!(value["clientCount"], 2);
        assert_eq!(value["message"], "Auto message #3");
    }

    #[test]
    fn test_stock_event_formats_prices_to_cents() {
        let value = to_value(&Event::stock("DEMO", 101.5, -2.3));

        assert_eq!(value["type"], "stock");
        assert_eq!(value["symbol"], "DEMO");
        assert_eq!(value["price"], "101.50");
        assert_eq!(value["change"], "-2.30");
    }

    #[test]
    fn test_zero_change_never_shows_negative_sign() {
        let value = to_value(&Event::stock("DEMO", 50.0, -0.0));
        assert_eq!(value["change"], "0.00");
    }

    #[test]
    fn test_event_type_matches_serialized_tag() {
        for event in [
            Event::welcome(SubscriberId::from(1)),
            Event::message("hi", 0),
            Event::auto(1, 0),
            Event::stock("DEMO", 1.0, 0.0),
        ] {
            assert_eq!(to_value(&event)["type"], event.event_type());
        }
    }
}
