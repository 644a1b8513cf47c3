use leptos::prelude::*;
use leptos_meta::{Link, Title};

use relay_types::DisplayOptions;

use crate::components::prompt_form::PromptForm;
use crate::server::load_display_options;

#[component]
pub fn RelayPage() -> impl IntoView {
    let options = Resource::new(|| (), |_| load_display_options());

    view! {
        <Suspense fallback=|| view! { <p>"Loading..."</p> }>
            {move || options.get().map(|result| match result {
                Ok(options) => view! { <RelayView options=options/> }.into_any(),
                Err(e) => view! {
                    <div class="error-state">
                        <p>{format!("Error loading page: {e}")}</p>
                    </div>
                }.into_any(),
            })}
        </Suspense>
    }
}

#[component]
fn RelayView(options: DisplayOptions) -> impl IntoView {
    let output_class = options.output_class();
    let subtitle = options.show_subtitle.then(|| options.subtitle.clone());

    view! {
        <Title text=options.title.clone()/>
        <Link rel="icon" href=options.icon.clone()/>
        <main class="relay-page">
            <h1>{options.heading.clone()}</h1>
            {subtitle.map(|text| view! { <p class="subtitle">{text}</p> })}
            <PromptForm output_class=output_class/>
        </main>
    }
}
