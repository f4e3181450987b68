//! Chat page - full layout with toolbar and slide-over sidebars.

use wasm_bindgen_futures::spawn_local;
use web_sys::Element;
use yew::prelude::*;

use crate::components::{ChatHistorySidebar, ChatInput, ChatMessage, Navbar, QuickExamplesSidebar};
use crate::conversation::Conversation;
use crate::dispatch::{self, DispatchOutcome};
use crate::utils;

/// Placeholder text for the query input.
pub const INPUT_PLACEHOLDER: &str = "Ask about the uploaded ocean data...";

/// Messages for the ChatPage component
pub enum ChatPageMsg {
    /// User submitted text from the input bar
    Send(String),
    /// The outstanding request resolved
    Finished(Result<DispatchOutcome, String>),
    ToggleHistory,
    ToggleExamples,
    CloseSidebars,
}

pub struct ChatPage {
    conversation: Conversation,
    show_history: bool,
    show_examples: bool,
    transcript_ref: NodeRef,
    /// Transcript entry count at the last render, to scroll only on growth.
    rendered_entries: usize,
}

impl Component for ChatPage {
    type Message = ChatPageMsg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            conversation: Conversation::seeded(utils::now_ms(), utils::time_label()),
            show_history: false,
            show_examples: false,
            transcript_ref: NodeRef::default(),
            rendered_entries: 0,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            ChatPageMsg::Send(text) => {
                let accepted = self.conversation.begin_send(
                    text.clone(),
                    utils::now_ms(),
                    utils::time_label(),
                );
                if !accepted {
                    return false;
                }

                let link = ctx.link().clone();
                spawn_local(async move {
                    let outcome = dispatch::request_reply(&text).await;
                    link.send_message(ChatPageMsg::Finished(outcome));
                });
                true
            }
            ChatPageMsg::Finished(outcome) => {
                if let Err(description) = &outcome {
                    log::error!("Chat request failed: {description}");
                }
                self.conversation
                    .finish_send(outcome, utils::now_ms(), utils::time_label());
                true
            }
            ChatPageMsg::ToggleHistory => {
                self.show_history = !self.show_history;
                if self.show_history {
                    self.show_examples = false;
                }
                true
            }
            ChatPageMsg::ToggleExamples => {
                self.show_examples = !self.show_examples;
                if self.show_examples {
                    self.show_history = false;
                }
                true
            }
            ChatPageMsg::CloseSidebars => {
                let changed = self.show_history || self.show_examples;
                self.show_history = false;
                self.show_examples = false;
                changed
            }
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        // Keep the newest entry in view; the loading bubble counts too.
        let entries =
            self.conversation.messages().len() + usize::from(self.conversation.is_loading());
        if entries != self.rendered_entries {
            self.rendered_entries = entries;
            if let Some(element) = self.transcript_ref.cast::<Element>() {
                element.set_scroll_top(element.scroll_height());
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let loading = self.conversation.is_loading();

        html! {
            <div class="chat-page">
                <Navbar />
                <div class="chat-layout">
                    <ChatHistorySidebar
                        open={self.show_history}
                        on_close={link.callback(|_| ChatPageMsg::CloseSidebars)}
                    />
                    <QuickExamplesSidebar
                        open={self.show_examples}
                        on_close={link.callback(|_| ChatPageMsg::CloseSidebars)}
                    />
                    <main class="chat-main">
                        <div class="chat-toolbar">
                            <button
                                class="toolbar-button"
                                onclick={link.callback(|_| ChatPageMsg::ToggleHistory)}
                            >
                                { "Chat History" }
                            </button>
                            <button
                                class="toolbar-button"
                                onclick={link.callback(|_| ChatPageMsg::ToggleExamples)}
                            >
                                { "Quick Examples" }
                            </button>
                        </div>
                        <div class="chat-transcript" ref={self.transcript_ref.clone()}>
                            { for self.conversation.messages().iter().map(|message| html! {
                                <ChatMessage
                                    key={message.id.clone()}
                                    content={message.content.clone()}
                                    is_user={message.is_user}
                                    timestamp={message.timestamp.clone()}
                                    is_html={message.is_html}
                                />
                            }) }
                            if loading {
                                <ChatMessage
                                    content="Thinking..."
                                    is_user={false}
                                    timestamp={utils::time_label()}
                                />
                            }
                        </div>
                        <ChatInput
                            on_send={link.callback(ChatPageMsg::Send)}
                            disabled={loading}
                            placeholder={INPUT_PLACEHOLDER}
                        />
                    </main>
                </div>
            </div>
        }
    }
}
