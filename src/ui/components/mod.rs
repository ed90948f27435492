pub mod menu;
pub mod progress_bar;
pub mod stats_panel;
pub mod word_card;
