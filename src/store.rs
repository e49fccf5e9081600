use crate::storage::{KvStore, StorageError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Storage key the whole history blob lives under.
pub const STORAGE_KEY: &str = "chat.history";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    #[serde(rename = "me")]
    Me,
    #[serde(rename = "them")]
    Them,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    pub t: i64,
}

type Threads = HashMap<String, Vec<Message>>;

/// Per-contact message history plus its backing store. Append-only; the whole
/// mapping is rewritten on every mutation. Runs without a backend (kv = None)
/// when persistent storage is unavailable.
pub struct MessageStore {
    threads: Threads,
    kv: Option<KvStore>,
}

impl MessageStore {
    pub fn load(kv: Option<KvStore>) -> Self {
        let blob = match kv.as_ref().map(|kv| kv.get(STORAGE_KEY)) {
            Some(Ok(blob)) => blob,
            Some(Err(err)) => {
                log::warn!("failed to read stored history: {err}");
                None
            }
            None => None,
        };
        let threads = match blob {
            Some(blob) => match serde_json::from_str::<Threads>(&blob) {
                Ok(threads) => threads,
                Err(err) => {
                    log::warn!("discarding malformed stored history: {err}");
                    seed_threads(crate::utils::now_ms())
                }
            },
            None => seed_threads(crate::utils::now_ms()),
        };
        Self { threads, kv }
    }

    pub fn thread(&self, contact_id: &str) -> &[Message] {
        self.threads.get(contact_id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn append(&mut self, contact_id: &str, message: Message) -> Result<(), StorageError> {
        self.threads.entry(contact_id.to_owned()).or_default().push(message);
        self.persist()
    }

    /// Records an outgoing message. Blank input is a no-op and returns `None`.
    pub fn send(
        &mut self,
        contact_id: &str,
        text: &str,
        now_ms: i64,
    ) -> Result<Option<Message>, StorageError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let message = Message { sender: Sender::Me, text: text.to_owned(), t: now_ms };
        self.append(contact_id, message.clone())?;
        Ok(Some(message))
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.threads.clear();
        match &self.kv {
            Some(kv) => kv.remove(STORAGE_KEY),
            None => Ok(()),
        }
    }

    fn persist(&self) -> Result<(), StorageError> {
        let Some(kv) = &self.kv else { return Ok(()) };
        let blob = serde_json::to_string(&self.threads)?;
        kv.set(STORAGE_KEY, &blob)
    }
}

// Demo conversation shown on first run (and whenever stored state is missing
// or unreadable), timestamped a few minutes into the past.
fn seed_threads(now_ms: i64) -> Threads {
    const MINUTE: i64 = 60_000;
    let lines = [
        (Sender::Them, "Hey! Welcome to the demo."),
        (Sender::Me, "Thanks! So everything here stays on this machine?"),
        (Sender::Them, "Right, the whole history is stored locally."),
        (Sender::Me, "And the replies are simulated?"),
        (Sender::Them, "Exactly. Try sending something!"),
    ];
    let messages = lines
        .iter()
        .enumerate()
        .map(|(i, (sender, text))| Message {
            sender: *sender,
            text: (*text).to_owned(),
            t: now_ms - (lines.len() as i64 - i as i64) * MINUTE,
        })
        .collect();
    let mut threads = Threads::new();
    threads.insert("alice".to_owned(), messages);
    threads
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mem_store() -> MessageStore {
        MessageStore::load(Some(KvStore::open_in_memory().unwrap()))
    }

    fn msg(sender: Sender, text: &str, t: i64) -> Message {
        Message { sender, text: text.to_owned(), t }
    }

    #[test]
    fn fresh_load_seeds_one_alice_conversation() {
        let store = mem_store();
        let thread = store.thread("alice");
        assert_eq!(thread.len(), 5);
        assert_eq!(thread[0].sender, Sender::Them);
        assert!(thread.windows(2).all(|w| w[0].t <= w[1].t));
        assert!(store.thread("bob").is_empty());
    }

    #[test]
    fn malformed_blob_falls_back_to_seed() {
        let kv = KvStore::open_in_memory().unwrap();
        kv.set(STORAGE_KEY, "{not json at all").unwrap();
        let store = MessageStore::load(Some(kv));
        let fresh = MessageStore::load(None);
        assert_eq!(store.thread("alice").len(), 5);
        let texts: Vec<_> = store.thread("alice").iter().map(|m| &m.text).collect();
        let expected: Vec<_> = fresh.thread("alice").iter().map(|m| &m.text).collect();
        assert_eq!(texts, expected);
    }

    #[test]
    fn append_persists_whole_mapping() {
        let mut store = mem_store();
        let before: Vec<Message> = store.thread("alice").to_vec();
        let sent = msg(Sender::Me, "hello", 1_000);
        store.append("bob", sent.clone()).unwrap();

        let blob = store.kv.as_ref().unwrap().get(STORAGE_KEY).unwrap().unwrap();
        let persisted: HashMap<String, Vec<Message>> = serde_json::from_str(&blob).unwrap();
        assert_eq!(persisted["bob"].last(), Some(&sent));
        assert_eq!(persisted["alice"], before);
    }

    #[test]
    fn append_keeps_order() {
        let mut store = MessageStore::load(None);
        store.clear().unwrap();
        for i in 0..4 {
            store.append("bob", msg(Sender::Me, &format!("m{i}"), i)).unwrap();
        }
        let texts: Vec<_> = store.thread("bob").iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["m0", "m1", "m2", "m3"]);
    }

    #[test]
    fn blank_send_is_a_noop() {
        let mut store = mem_store();
        assert_eq!(store.send("bob", "   ", 1_000).unwrap(), None);
        assert_eq!(store.send("bob", "\n\t", 1_000).unwrap(), None);
        assert!(store.thread("bob").is_empty());
    }

    #[test]
    fn send_trims_and_appends() {
        let mut store = mem_store();
        let sent = store.send("bob", "  hi there ", 2_000).unwrap().unwrap();
        assert_eq!(sent.text, "hi there");
        assert_eq!(sent.sender, Sender::Me);
        assert_eq!(store.thread("bob"), &[sent]);
    }

    #[test]
    fn clear_is_idempotent_and_drops_persisted_state() {
        let mut store = mem_store();
        store.send("bob", "hi", 1_000).unwrap();
        store.clear().unwrap();
        assert!(store.thread("alice").is_empty());
        assert!(store.thread("bob").is_empty());
        assert_eq!(store.kv.as_ref().unwrap().get(STORAGE_KEY).unwrap(), None);
        store.clear().unwrap();
        assert!(store.thread("alice").is_empty());
    }

    #[test]
    fn wire_format_matches_stored_shape() {
        let json = serde_json::to_string(&msg(Sender::Me, "hi", 42)).unwrap();
        assert_eq!(json, r#"{"sender":"me","text":"hi","t":42}"#);
        let back: Message = serde_json::from_str(r#"{"sender":"them","text":"yo","t":7}"#).unwrap();
        assert_eq!(back.sender, Sender::Them);
    }
}
