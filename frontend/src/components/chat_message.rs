//! Chat Message Component
//!
//! One transcript bubble: user messages on the right, assistant replies on
//! the left. Assistant text is rendered as markdown; map replies arrive as
//! complete HTML documents and are injected verbatim.

use yew::prelude::*;

use super::markdown::render_markdown;

#[derive(Properties, PartialEq, Clone)]
pub struct ChatMessageProps {
    /// Markdown text, or a full HTML document when `is_html` is set
    pub content: String,
    pub is_user: bool,
    /// Wall-clock label shown under the bubble
    pub timestamp: String,
    #[prop_or_default]
    pub is_html: bool,
}

#[function_component(ChatMessage)]
pub fn chat_message(props: &ChatMessageProps) -> Html {
    let row_class = if props.is_user {
        "chat-row user"
    } else {
        "chat-row assistant"
    };
    let bubble_class = if props.is_user {
        "chat-bubble user"
    } else {
        "chat-bubble assistant"
    };

    let body = if props.is_html {
        // Trusted markup from our own backend (Leaflet map documents).
        Html::from_html_unchecked(AttrValue::from(props.content.clone()))
    } else {
        render_markdown(&props.content)
    };

    html! {
        <div class={row_class}>
            <div class={bubble_class}>
                <div class={classes!("bubble-body", props.is_html.then_some("bubble-map"))}>
                    { body }
                </div>
                <div class="bubble-timestamp">{ &props.timestamp }</div>
            </div>
        </div>
    }
}
