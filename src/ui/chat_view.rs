use gtk4::prelude::*;
use gtk4 as gtk;

use crate::store::{Message, Sender};
use crate::utils;

#[derive(Clone)]
pub struct ChatView {
    root: gtk::Box,
    scroller: gtk::ScrolledWindow,
    messages_box: gtk::Box,
    typing_row: gtk::Box,
    entry: gtk::Entry,
    send_btn: gtk::Button,
}

impl ChatView {
    pub fn new() -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 6);
        root.set_margin_top(8);
        root.set_margin_bottom(8);
        root.set_margin_start(8);
        root.set_margin_end(8);

        let scroller = gtk::ScrolledWindow::builder()
            .vexpand(true)
            .hexpand(true)
            .build();
        let messages_box = gtk::Box::new(gtk::Orientation::Vertical, 6);

        // Stays at the end of the thread; message rows are inserted above it.
        let typing_row = gtk::Box::new(gtk::Orientation::Horizontal, 0);
        let typing_label = gtk::Label::new(Some("typing…"));
        typing_label.add_css_class("dim-label");
        typing_label.add_css_class("caption");
        typing_row.append(&typing_label);
        typing_row.set_halign(gtk::Align::Start);
        typing_row.set_visible(false);
        messages_box.append(&typing_row);

        scroller.set_child(Some(&messages_box));
        root.append(&scroller);

        // Input row
        let input_row = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        let entry = gtk::Entry::new();
        entry.set_hexpand(true);
        entry.set_placeholder_text(Some("Type a message…"));
        let send_btn = gtk::Button::with_label("Send");
        send_btn.add_css_class("suggested-action");
        input_row.append(&entry);
        input_row.append(&send_btn);
        root.append(&input_row);

        Self { root, scroller, messages_box, typing_row, entry, send_btn }
    }

    pub fn widget(&self) -> gtk::Widget {
        self.root.clone().upcast()
    }

    pub fn connect_send<F: Fn(&str) + 'static>(&self, f: F) {
        use std::rc::Rc;
        let entry_for_send = self.entry.clone();
        let send: Rc<dyn Fn()> = Rc::new(move || {
            let text = entry_for_send.text();
            f(text.as_str());
        });
        {
            let send = send.clone();
            self.send_btn.connect_clicked(move |_| (send)());
        }
        {
            let send = send.clone();
            self.entry.connect_activate(move |_| (send)());
        }
    }

    pub fn clear_input(&self) {
        self.entry.set_text("");
    }

    /// Full render: drops every message row and redraws the given thread.
    pub fn show_thread(&self, messages: &[Message]) {
        let keep = self.typing_row.clone().upcast::<gtk::Widget>();
        let mut child = self.messages_box.first_child();
        while let Some(widget) = child {
            child = widget.next_sibling();
            if widget != keep {
                self.messages_box.remove(&widget);
            }
        }
        for message in messages {
            let row = message_row(message);
            self.messages_box.append(&row);
            self.messages_box.reorder_child_after(&self.typing_row, Some(&row));
        }
        self.scroll_to_bottom();
    }

    /// Incremental render: one new row, kept above the typing indicator.
    pub fn append_message(&self, message: &Message) {
        let row = message_row(message);
        self.messages_box.append(&row);
        self.messages_box.reorder_child_after(&self.typing_row, Some(&row));
        self.scroll_to_bottom();
    }

    pub fn set_typing(&self, visible: bool) {
        self.typing_row.set_visible(visible);
        if visible {
            self.scroll_to_bottom();
        }
    }

    // Deferred one main-loop iteration so the new row has a height before the
    // adjustment is read.
    pub fn scroll_to_bottom(&self) {
        let adj = self.scroller.vadjustment();
        glib::idle_add_local_once(move || {
            adj.set_value(adj.upper() - adj.page_size());
        });
    }

    pub fn focus_input(&self) {
        let entry = self.entry.clone();
        glib::idle_add_local_once(move || {
            entry.grab_focus();
        });
    }
}

fn message_row(message: &Message) -> gtk::Box {
    let align = match message.sender {
        Sender::Me => gtk::Align::End,
        Sender::Them => gtk::Align::Start,
    };
    let row = gtk::Box::new(gtk::Orientation::Vertical, 2);
    row.set_halign(align);

    let bubble = gtk::Label::new(Some(&message.text));
    bubble.set_wrap(true);
    bubble.set_halign(align);
    bubble.add_css_class(match message.sender {
        Sender::Me => "bubble-me",
        Sender::Them => "bubble-them",
    });
    row.append(&bubble);

    let time = gtk::Label::new(Some(&utils::clock_label(message.t)));
    time.set_halign(align);
    time.add_css_class("dim-label");
    time.add_css_class("caption");
    row.append(&time);

    row
}
