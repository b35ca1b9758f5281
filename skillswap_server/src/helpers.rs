use bytes::Bytes;
use log::*;
use serde::Serialize;

/// Formats a single server-sent event.
pub fn sse_event<T: Serialize>(event: &str, data: &T) -> Bytes {
    match serde_json::to_string(data) {
        Ok(json) => Bytes::from(format!("event: {event}\ndata: {json}\n\n")),
        Err(e) => {
            error!("💻️ Could not serialize {event} event. {e}");
            let json = serde_json::json!({ "error": format!("Could not serialize {event} event") });
            Bytes::from(format!("event: error\ndata: {json}\n\n"))
        },
    }
}
