pub mod dashboard;
pub mod feedback_list;
pub mod menu;
pub mod progress_bar;
pub mod set_list;
pub mod word_prompt;
