use leptos::prelude::*;

use crate::components::output_area::{ErrorNotice, OutputArea};
use crate::server::SubmitPrompt;

#[component]
pub fn PromptForm(output_class: &'static str) -> impl IntoView {
    let (prompt, set_prompt) = signal(String::new());
    let submit = ServerAction::<SubmitPrompt>::new();
    let pending = submit.pending();
    let reply = submit.value();

    let on_submit = move |_| {
        submit.dispatch(SubmitPrompt {
            prompt: prompt.get_untracked(),
        });
    };

    view! {
        <div class="prompt-form">
            <label for="prompt-input">"Enter your prompt"</label>
            <input
                id="prompt-input"
                class="prompt-input"
                type="text"
                prop:value=move || prompt.get()
                on:input=move |ev| {
                    set_prompt.set(event_target_value(&ev));
                }
            />
            <button
                class="submit-button"
                on:click=on_submit
                disabled=move || pending.get()
            >
                "Generate"
            </button>
            {move || reply.get().map(|result| match result {
                Ok(reply) => view! { <OutputArea reply=reply output_class=output_class/> }.into_any(),
                Err(_) => view! { <ErrorNotice/> }.into_any(),
            })}
        </div>
    }
}
