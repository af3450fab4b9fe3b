pub mod config;
pub mod detail;
pub mod error;
pub mod fetch;
pub mod keybinding;
pub mod models;
pub mod pagination;
pub mod persisted;
pub mod rating;
pub mod search;
pub mod storage;
pub mod title;
