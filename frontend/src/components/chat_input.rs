//! Chat Input Component
//!
//! Text entry bar for the chat pages. Submits on Enter (Shift+Enter inserts
//! a newline) or the send button, trims the draft, and refuses empty sends.

use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ChatInputProps {
    /// Fired with the trimmed draft when the user submits
    pub on_send: Callback<String>,
    /// Disables entry while a request is outstanding
    #[prop_or_default]
    pub disabled: bool,
    #[prop_or(AttrValue::Static("Type your message..."))]
    pub placeholder: AttrValue,
}

#[function_component(ChatInput)]
pub fn chat_input(props: &ChatInputProps) -> Html {
    let draft = use_state(String::new);

    let submit = {
        let draft = draft.clone();
        let on_send = props.on_send.clone();
        let disabled = props.disabled;

        Callback::from(move |()| {
            if disabled {
                return;
            }
            let text = draft.trim().to_string();
            if text.is_empty() {
                return;
            }
            draft.set(String::new());
            on_send.emit(text);
        })
    };

    let oninput = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(textarea) = e.target_dyn_into::<HtmlTextAreaElement>() {
                draft.set(textarea.value());
            }
        })
    };

    let onkeydown = {
        let submit = submit.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" && !e.shift_key() {
                e.prevent_default();
                submit.emit(());
            }
        })
    };

    let onclick = {
        let submit = submit.clone();
        Callback::from(move |_: MouseEvent| submit.emit(()))
    };

    html! {
        <div class="chat-input">
            <textarea
                class="chat-input-field"
                rows="1"
                value={(*draft).clone()}
                placeholder={props.placeholder.clone()}
                disabled={props.disabled}
                {oninput}
                {onkeydown}
            />
            <button
                class="chat-send-button"
                disabled={props.disabled || draft.trim().is_empty()}
                {onclick}
            >
                { "Send" }
            </button>
        </div>
    }
}
