pub mod output_area;
pub mod prompt_form;
