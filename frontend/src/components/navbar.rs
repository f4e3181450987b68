//! Top Navigation Bar
//!
//! Brand plus links between the two chat page layouts.

use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;

#[function_component(Navbar)]
pub fn navbar() -> Html {
    html! {
        <nav class="navbar">
            <div class="navbar-brand">
                <span class="navbar-title">{ "FloatChat" }</span>
                <span class="navbar-subtitle">{ "ARGO ocean data assistant" }</span>
            </div>
            <div class="navbar-links">
                <Link<Route> classes="navbar-link" to={Route::Chat}>{ "Chat" }</Link<Route>>
                <Link<Route> classes="navbar-link" to={Route::Compact}>{ "Compact" }</Link<Route>>
            </div>
        </nav>
    }
}
