//! Quick Examples Sidebar
//!
//! Slide-over panel offering canned questions about the uploaded data. The
//! selection callback is optional; without it the examples are display-only.

use yew::prelude::*;

/// Canned questions that exercise the main query shapes (map, aggregate,
/// profile, extremum).
pub const QUICK_EXAMPLES: &[&str] = &[
    "Show me a map of all float locations",
    "What is the average temperature above 100 dbar?",
    "Show salinity profiles for the most recent cycle",
    "Where was the highest chlorophyll concentration measured?",
];

#[derive(Properties, PartialEq, Clone)]
pub struct QuickExamplesSidebarProps {
    pub open: bool,
    pub on_close: Callback<()>,
    /// Fired with the example text; inert when absent
    #[prop_or_default]
    pub on_select_example: Option<Callback<String>>,
}

#[function_component(QuickExamplesSidebar)]
pub fn quick_examples_sidebar(props: &QuickExamplesSidebarProps) -> Html {
    let panel_class = if props.open {
        "sidebar examples-sidebar open"
    } else {
        "sidebar examples-sidebar"
    };

    let onclose = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <aside class={panel_class}>
            <div class="sidebar-header">
                <h2 class="sidebar-title">{ "Quick Examples" }</h2>
                <button class="sidebar-close" onclick={onclose} title="Close">{ "\u{00d7}" }</button>
            </div>
            <div class="sidebar-body">
                <ul class="examples-list">
                    { for QUICK_EXAMPLES.iter().map(|example| {
                        let select = props.on_select_example.clone().map(|callback| {
                            let text = example.to_string();
                            let on_close = props.on_close.clone();
                            Callback::from(move |_: MouseEvent| {
                                callback.emit(text.clone());
                                on_close.emit(());
                            })
                        });
                        let inert = select.is_none();
                        html! {
                            <li class="examples-item">
                                <button class="examples-item-button" onclick={select} disabled={inert}>
                                    { *example }
                                </button>
                            </li>
                        }
                    }) }
                </ul>
            </div>
        </aside>
    }
}
