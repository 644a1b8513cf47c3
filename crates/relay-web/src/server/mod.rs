pub mod relay;

pub use relay::{
    load_display_options, submit_prompt, LoadDisplayOptions, Reply, SubmitPrompt, GENERIC_ERROR,
};
