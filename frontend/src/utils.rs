use web_sys::window;

/// Get the base HTTP URL (e.g., "http://localhost:8000" or "https://myapp.com")
pub fn get_base_url() -> String {
    let window = window().expect("no global window");
    let location = window.location();

    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let host = location
        .host()
        .unwrap_or_else(|_| "localhost:8000".to_string());

    format!("{}//{}", protocol, host)
}

/// Build a full API URL from a path (e.g., "/chatbot-response" -> "http://localhost:8000/chatbot-response")
pub fn api_url(path: &str) -> String {
    format!("{}{}", get_base_url(), path)
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Locale-formatted clock label for message timestamps (e.g., "3:42:07 PM").
pub fn time_label() -> String {
    js_sys::Date::new_0().to_locale_time_string("en-US").into()
}
