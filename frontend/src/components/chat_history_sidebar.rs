//! Chat History Sidebar
//!
//! Slide-over panel listing saved conversations. Persistence is not wired up
//! yet: the list renders whatever entries it is given (none today) and the
//! action callbacks are optional, so absent callbacks leave the controls
//! inert instead of failing.

use yew::prelude::*;

/// One saved conversation in the history panel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatHistoryEntry {
    pub id: String,
    pub title: String,
}

#[derive(Properties, PartialEq, Clone)]
pub struct ChatHistorySidebarProps {
    pub open: bool,
    pub on_close: Callback<()>,
    /// Starts a fresh conversation; inert when absent
    #[prop_or_default]
    pub on_new_chat: Option<Callback<()>>,
    /// Switches to the selected conversation id; inert when absent
    #[prop_or_default]
    pub on_select_chat: Option<Callback<String>>,
    #[prop_or_default]
    pub entries: Vec<ChatHistoryEntry>,
    /// Id of the conversation currently on screen, if any
    #[prop_or_default]
    pub active_chat: Option<String>,
}

#[function_component(ChatHistorySidebar)]
pub fn chat_history_sidebar(props: &ChatHistorySidebarProps) -> Html {
    let panel_class = if props.open {
        "sidebar history-sidebar open"
    } else {
        "sidebar history-sidebar"
    };

    let onclose = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    let new_chat = props
        .on_new_chat
        .clone()
        .map(|callback| Callback::from(move |_: MouseEvent| callback.emit(())));
    let new_chat_inert = new_chat.is_none();

    html! {
        <aside class={panel_class}>
            <div class="sidebar-header">
                <h2 class="sidebar-title">{ "Chat History" }</h2>
                <button class="sidebar-close" onclick={onclose} title="Close">{ "\u{00d7}" }</button>
            </div>
            <button class="new-chat-button" onclick={new_chat} disabled={new_chat_inert}>
                { "+ New Chat" }
            </button>
            <div class="sidebar-body">
                if props.entries.is_empty() {
                    <p class="sidebar-empty">{ "No saved conversations yet." }</p>
                } else {
                    <ul class="history-list">
                        { for props.entries.iter().map(|entry| {
                            let select = props.on_select_chat.clone().map(|callback| {
                                let id = entry.id.clone();
                                Callback::from(move |_: MouseEvent| callback.emit(id.clone()))
                            });
                            let inert = select.is_none();
                            let item_class = if props.active_chat.as_deref() == Some(entry.id.as_str()) {
                                "history-item active"
                            } else {
                                "history-item"
                            };
                            html! {
                                <li class={item_class}>
                                    <button class="history-item-button" onclick={select} disabled={inert}>
                                        { &entry.title }
                                    </button>
                                </li>
                            }
                        }) }
                    </ul>
                }
            </div>
        </aside>
    }
}
