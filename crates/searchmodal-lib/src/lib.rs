// searchmodal-lib: search modal behaviour model and accessibility lint bridge

pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod html;
pub mod http_client;
pub mod json;
pub mod lint;
pub mod logger;
pub mod output;
pub mod scenario;
pub mod tasks;
pub mod text;
pub mod widget;
