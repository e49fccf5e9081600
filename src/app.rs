use adw::Application;

use crate::contacts::{self, Contact};
use crate::storage::KvStore;
use crate::store::MessageStore;

/// The contact whose thread is on screen. Not persisted; comes back as the
/// directory's first contact on startup and after a history clear.
#[derive(Debug, Default)]
pub struct Selection {
    active: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, contact_id: &str) {
        self.active = Some(contact_id.to_owned());
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_active(&self, contact_id: &str) -> bool {
        self.active.as_deref() == Some(contact_id)
    }

    pub fn reset(&mut self) -> &'static Contact {
        let first = contacts::first();
        self.active = Some(first.id.to_owned());
        first
    }
}

pub fn build_ui(app: &Application) {
    let kv = match KvStore::open_default() {
        Ok(kv) => Some(kv),
        Err(err) => {
            log::warn!("history persistence unavailable, running in-memory: {err}");
            None
        }
    };
    let store = MessageStore::load(kv);
    crate::ui::main_window::show_main_window(app, store);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply::{ReplySimulator, CANNED_REPLIES, MAX_DELAY_MS};
    use crate::store::{Message, Sender};

    #[test]
    fn selection_starts_empty_and_resets_to_first_contact() {
        let mut selection = Selection::new();
        assert_eq!(selection.active(), None);
        selection.select("bob");
        assert!(selection.is_active("bob"));
        let first = selection.reset();
        assert_eq!(first.id, contacts::first().id);
        assert!(selection.is_active(first.id));
    }

    #[test]
    fn selection_tolerates_unknown_ids() {
        let mut selection = Selection::new();
        selection.select("ghost");
        assert!(selection.is_active("ghost"));
        assert!(contacts::find("ghost").is_none());
    }

    // Send to bob, switch to alice before the reply lands: the reply still
    // goes to bob's thread and alice's stays untouched.
    #[test]
    fn reply_lands_on_original_contact_after_switching_away() {
        let mut store = MessageStore::load(None);
        let mut simulator = ReplySimulator::new();
        let mut selection = Selection::new();

        selection.select("bob");
        let now = 1_000_000;
        let sent = store.send("bob", "hi", now).unwrap().unwrap();
        simulator.schedule("bob", now);

        selection.select("alice");
        let alice_before = store.thread("alice").to_vec();

        let fire = now + MAX_DELAY_MS as i64;
        let due = simulator.due(fire);
        assert_eq!(due.len(), 1);
        for task in due {
            let message = Message { sender: Sender::Them, text: task.text, t: fire };
            store.append(&task.contact_id, message.clone()).unwrap();
            assert!(!selection.is_active(&task.contact_id));
        }

        let bob = store.thread("bob");
        assert_eq!(bob.len(), 2);
        assert_eq!(bob[0], sent);
        assert_eq!(bob[1].sender, Sender::Them);
        assert!(CANNED_REPLIES.contains(&bob[1].text.as_str()));
        assert_eq!(store.thread("alice"), alice_before.as_slice());
    }

    #[test]
    fn clear_then_reset_renders_first_thread_empty() {
        let mut store = MessageStore::load(None);
        let mut selection = Selection::new();
        selection.select("bob");
        store.send("bob", "hello", 5).unwrap();

        store.clear().unwrap();
        let first = selection.reset();
        assert!(store.thread(first.id).is_empty());
        assert!(store.thread("bob").is_empty());
    }
}
