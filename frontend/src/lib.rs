mod components;
mod conversation;
mod dispatch;
mod pages;
pub mod utils;

use pages::{chat::ChatPage, compact::CompactChatPage};
use yew::prelude::*;
use yew_router::prelude::*;

/// The backend serves the built frontend under this prefix.
const BASENAME: &str = "/app";

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Chat,
    #[at("/compact")]
    Compact,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Chat => html! { <ChatPage /> },
        Route::Compact => html! { <CompactChatPage /> },
    }
}

#[function_component(App)]
fn app() -> Html {
    html! {
        <BrowserRouter basename={BASENAME}>
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn run_app() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
