//! Compact chat page - transcript and input only, no sidebars.
//!
//! Same conversation engine as the full page, laid out as a single narrow
//! column for embedding and small screens.

use wasm_bindgen_futures::spawn_local;
use web_sys::Element;
use yew::prelude::*;

use crate::components::{ChatInput, ChatMessage, Navbar};
use crate::conversation::Conversation;
use crate::dispatch::{self, DispatchOutcome};
use crate::pages::chat::INPUT_PLACEHOLDER;
use crate::utils;

pub enum CompactChatMsg {
    Send(String),
    Finished(Result<DispatchOutcome, String>),
}

pub struct CompactChatPage {
    conversation: Conversation,
    transcript_ref: NodeRef,
    rendered_entries: usize,
}

impl Component for CompactChatPage {
    type Message = CompactChatMsg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            conversation: Conversation::seeded(utils::now_ms(), utils::time_label()),
            transcript_ref: NodeRef::default(),
            rendered_entries: 0,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            CompactChatMsg::Send(text) => {
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
                    link.send_message(CompactChatMsg::Finished(outcome));
                });
                true
            }
            CompactChatMsg::Finished(outcome) => {
                if let Err(description) = &outcome {
                    log::error!("Chat request failed: {description}");
                }
                self.conversation
                    .finish_send(outcome, utils::now_ms(), utils::time_label());
                true
            }
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
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
            <div class="chat-page compact">
                <Navbar />
                <main class="chat-main compact">
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
                        on_send={link.callback(CompactChatMsg::Send)}
                        disabled={loading}
                        placeholder={INPUT_PLACEHOLDER}
                    />
                </main>
            </div>
        }
    }
}
