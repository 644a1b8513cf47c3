use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::{
    components::{Route, Router, Routes},
    path,
};

use crate::pages::relay::RelayPage;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/relay-web.css"/>
        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=path!("/") view=RelayPage/>
            </Routes>
        </Router>
    }
}
