use gtk4::prelude::*;
use gtk4 as gtk;

use crate::contacts::{self, Contact};

pub struct Sidebar {
    root: gtk::Box,
    list: gtk::ListBox,
}

impl Sidebar {
    pub fn new() -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 6);
        root.set_margin_top(8);
        root.set_margin_bottom(8);
        root.set_margin_start(8);
        root.set_margin_end(8);

        let title = gtk::Label::new(Some("Contacts"));
        title.add_css_class("heading");
        title.set_halign(gtk::Align::Start);
        root.append(&title);

        let list = gtk::ListBox::new();
        list.add_css_class("navigation-sidebar");
        for contact in contacts::DIRECTORY {
            list.append(&contact_row(contact));
        }
        root.append(&list);

        Self { root, list }
    }

    pub fn widget(&self) -> gtk::Widget {
        self.root.clone().upcast()
    }

    // Row index == directory index; the roster is fixed.
    pub fn connect_selected<F: Fn(&'static Contact) + 'static>(&self, f: F) {
        self.list.connect_row_selected(move |_, row| {
            if let Some(row) = row {
                if let Some(contact) = contacts::DIRECTORY.get(row.index() as usize) {
                    f(contact);
                }
            }
        });
    }

    pub fn select_first(&self) {
        self.list.select_row(self.list.row_at_index(0).as_ref());
    }
}

fn contact_row(contact: &Contact) -> gtk::ListBoxRow {
    let row = gtk::ListBoxRow::new();
    let hbox = gtk::Box::new(gtk::Orientation::Horizontal, 10);
    hbox.set_margin_top(6);
    hbox.set_margin_bottom(6);
    hbox.set_margin_start(6);
    hbox.set_margin_end(6);

    let avatar = adw::Avatar::new(36, Some(contact.name), true);
    avatar.add_css_class(&format!("avatar-{}", contact.id));
    hbox.append(&avatar);

    let vbox = gtk::Box::new(gtk::Orientation::Vertical, 2);
    let name = gtk::Label::new(Some(contact.name));
    name.set_halign(gtk::Align::Start);
    name.add_css_class("heading");
    vbox.append(&name);

    let status = gtk::Label::new(Some(contact.status));
    status.set_halign(gtk::Align::Start);
    status.add_css_class("dim-label");
    status.add_css_class("caption");
    vbox.append(&status);

    hbox.append(&vbox);
    row.set_child(Some(&hbox));
    row
}
