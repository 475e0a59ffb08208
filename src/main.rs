#![allow(warnings)]
//! Finance Tracker Frontend Entry Point

mod api;
mod app;
mod config;
mod context;
mod identity;
mod models;
mod normalize;
mod session;
mod store;

use app::App;
use leptos::prelude::*;
use wasm_bindgen::JsValue;

fn main() {
    console_error_panic_hook::set_once();
    let level = console_logger::parse_level(option_env!("LOG_LEVEL"));
    if let Err(err) = console_logger::init_logger(level) {
        web_sys::console::error_1(&JsValue::from_str(&format!("logger already installed: {}", err)));
    }
    mount_to_body(App);
}
