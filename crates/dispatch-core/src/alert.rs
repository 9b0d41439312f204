use tracing::info;

/// Formats the outbound notification. No validation; empty text is fine.
pub fn send_alert(message: &str, location: &str) -> String {
    let alert = format!("ALERT: {} at {}", message, location);
    info!(location = %location, "{}", alert);
    alert
}
