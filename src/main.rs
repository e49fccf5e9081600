mod app;
mod contacts;
mod reply;
mod storage;
mod store;
mod ui;
mod utils;

use adw::prelude::*;
use adw::Application;

fn main() {
    env_logger::init();
    let app = Application::builder()
        .application_id("com.example.MiniChatGtk")
        .build();
    app.connect_activate(|app| {
        crate::app::build_ui(app);
    });
    app.run();
}
