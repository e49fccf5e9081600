use adw::prelude::*;
use adw::Application;
use gtk4 as gtk;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::app::Selection;
use crate::contacts;
use crate::reply::{PendingReply, ReplySimulator};
use crate::store::{Message, MessageStore, Sender};
use crate::utils;

pub fn show_main_window(app: &Application, store: MessageStore) {
    load_css();

    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("MiniChat")
        .default_width(960)
        .default_height(640)
        .build();

    let overlay = adw::ToastOverlay::new();

    let split = adw::Flap::builder()
        .reveal_flap(true)
        .locked(true)
        .modal(false)
        .build();

    let sidebar = Rc::new(crate::ui::sidebar::Sidebar::new());
    split.set_flap(Some(&sidebar.widget()));

    let chat = crate::ui::chat_view::ChatView::new();
    split.set_content(Some(&chat.widget()));

    overlay.set_child(Some(&split));

    let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    let title = adw::WindowTitle::new("MiniChat", "");
    header.set_title_widget(Some(&title));

    let clear_btn = gtk::Button::with_label("Clear History");
    clear_btn.add_css_class("destructive-action");
    header.pack_end(&clear_btn);
    container.append(&header);
    container.append(&overlay);
    window.set_content(Some(&container));
    window.present();

    let store = Rc::new(RefCell::new(store));
    let simulator = Rc::new(RefCell::new(ReplySimulator::new()));
    let selection = Rc::new(RefCell::new(Selection::new()));

    // Full re-render of one thread; a directory miss degrades to the raw id.
    let select: Rc<dyn Fn(&str)> = Rc::new({
        let store = store.clone();
        let simulator = simulator.clone();
        let selection = selection.clone();
        let chat = chat.clone();
        let title = title.clone();
        move |contact_id: &str| {
            selection.borrow_mut().select(contact_id);
            match contacts::find(contact_id) {
                Some(contact) => {
                    title.set_title(contact.name);
                    title.set_subtitle(contact.status);
                }
                None => {
                    title.set_title(contact_id);
                    title.set_subtitle("");
                }
            }
            chat.show_thread(store.borrow().thread(contact_id));
            chat.set_typing(simulator.borrow().pending_for(contact_id));
            chat.focus_input();
        }
    });

    // Reply timers all funnel through here; anything due gets stored for its
    // original contact and drawn only if that contact is still on screen.
    let deliver: Rc<dyn Fn()> = Rc::new({
        let store = store.clone();
        let simulator = simulator.clone();
        let selection = selection.clone();
        let chat = chat.clone();
        let overlay = overlay.clone();
        move || {
            let now = utils::now_ms();
            for task in simulator.borrow_mut().due(now) {
                let PendingReply { contact_id, text, .. } = task;
                let message = Message { sender: Sender::Them, text, t: now };
                if let Err(err) = store.borrow_mut().append(&contact_id, message.clone()) {
                    overlay.add_toast(adw::Toast::new(&format!("Failed to save reply: {err}")));
                }
                if selection.borrow().is_active(&contact_id) {
                    chat.append_message(&message);
                }
            }
            let typing = selection
                .borrow()
                .active()
                .map(|id| simulator.borrow().pending_for(id))
                .unwrap_or(false);
            chat.set_typing(typing);
        }
    });

    {
        let select = select.clone();
        sidebar.connect_selected(move |contact| (select)(contact.id));
    }

    {
        let store = store.clone();
        let simulator = simulator.clone();
        let selection = selection.clone();
        let chat_for_send = chat.clone();
        let overlay = overlay.clone();
        let deliver = deliver.clone();
        chat.connect_send(move |raw| {
            let active = selection.borrow().active().map(str::to_owned);
            let Some(contact_id) = active else { return };
            let now = utils::now_ms();
            match store.borrow_mut().send(&contact_id, raw, now) {
                Ok(Some(message)) => {
                    chat_for_send.append_message(&message);
                    chat_for_send.clear_input();
                    let delay = simulator.borrow_mut().schedule(&contact_id, now);
                    chat_for_send.set_typing(true);
                    let deliver = deliver.clone();
                    glib::timeout_add_local_once(Duration::from_millis(delay), move || {
                        (deliver)()
                    });
                }
                Ok(None) => {}
                Err(err) => {
                    overlay.add_toast(adw::Toast::new(&format!("Failed to save message: {err}")));
                }
            }
        });
    }

    {
        let store = store.clone();
        let selection = selection.clone();
        let sidebar = sidebar.clone();
        let overlay = overlay.clone();
        let select = select.clone();
        clear_btn.connect_clicked(move |_| {
            let dialog = gtk::Dialog::builder()
                .title("Clear History")
                .transient_for(&window)
                .modal(true)
                .build();
            let content = gtk::Box::new(gtk::Orientation::Vertical, 12);
            content.set_margin_top(12);
            content.set_margin_bottom(12);
            content.set_margin_start(12);
            content.set_margin_end(12);

            let info = gtk::Label::new(Some(
                "Delete every stored conversation? This cannot be undone.",
            ));
            info.set_halign(gtk::Align::Start);
            content.append(&info);
            dialog.set_child(Some(&content));

            let _ = dialog.add_button("Cancel", gtk::ResponseType::Cancel);
            let confirm = dialog.add_button("Clear", gtk::ResponseType::Ok);
            confirm.add_css_class("destructive-action");
            dialog.set_default_response(gtk::ResponseType::Cancel);

            let store = store.clone();
            let selection = selection.clone();
            let sidebar = sidebar.clone();
            let overlay = overlay.clone();
            let select = select.clone();
            dialog.connect_response(move |dlg, resp| {
                if resp == gtk::ResponseType::Ok {
                    if let Err(err) = store.borrow_mut().clear() {
                        overlay.add_toast(adw::Toast::new(&format!(
                            "Failed to clear history: {err}"
                        )));
                    }
                    let first = selection.borrow_mut().reset();
                    sidebar.select_first();
                    (select)(first.id);
                }
                dlg.close();
            });

            dialog.present();
        });
    }

    sidebar.select_first();
}

fn load_css() {
    let provider = gtk::CssProvider::new();
    let mut css = String::from(
        ".bubble-me { background-color: #3584e4; color: #ffffff; border-radius: 12px; padding: 6px 10px; }\n\
         .bubble-them { background-color: rgba(0, 0, 0, 0.08); border-radius: 12px; padding: 6px 10px; }\n",
    );
    for contact in contacts::DIRECTORY {
        css.push_str(&format!(
            ".avatar-{} {{ background-color: {}; color: #ffffff; }}\n",
            contact.id, contact.color
        ));
    }
    provider.load_from_data(&css);
    if let Some(display) = gtk::gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
