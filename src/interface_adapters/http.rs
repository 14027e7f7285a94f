// Plain HTTP routes next to the websocket.

pub async fn health_handler() -> &'static str {
    "ok"
}
