use leptos::prelude::*;

use crate::server::{Reply, GENERIC_ERROR};

#[component]
pub fn OutputArea(reply: Reply, output_class: &'static str) -> impl IntoView {
    match reply {
        Reply::Warning(text) => view! {
            <div class="output output-warning" role="alert">{text}</div>
        }
        .into_any(),
        Reply::Generated(text) => view! {
            <div class=output_class>{text}</div>
        }
        .into_any(),
    }
}

#[component]
pub fn ErrorNotice() -> impl IntoView {
    view! {
        <div class="output output-error" role="alert">{GENERIC_ERROR}</div>
    }
}
