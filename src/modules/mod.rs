pub mod config;
pub mod error;
pub mod events;
pub mod game;
pub mod headless;
pub mod hud;
pub mod layout;
pub mod notice;
pub mod perturb;
pub mod physics;
pub mod render;
pub mod scale;
pub mod session;
pub mod text_button;
pub mod text_input;
pub mod wager;
