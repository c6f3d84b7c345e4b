/// Show a blocking browser notice. Outside a browser this only logs.
pub fn notify(message: &str) {
    match web_sys::window() {
        Some(window) => {
            if let Err(e) = window.alert_with_message(message) {
                dioxus_logger::tracing::warn!("alert failed: {:?}", e);
            }
        }
        None => dioxus_logger::tracing::info!("{}", message),
    }
}
