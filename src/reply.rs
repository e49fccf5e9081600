use rand::seq::SliceRandom;
use rand::Rng;

pub const MIN_DELAY_MS: u64 = 700;
pub const MAX_DELAY_MS: u64 = 1600;

pub const CANNED_REPLIES: &[&str] = &[
    "Sounds good!",
    "Interesting, tell me more.",
    "Haha, totally.",
    "Give me a minute to think about that.",
    "Can we talk later?",
    "👍",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    pub contact_id: String,
    pub fire_at: i64,
    pub text: String,
}

/// Schedules one canned reply per outgoing message. Tasks carry their target
/// contact and absolute fire time, so delivery is driven by asking what is
/// `due` at a given clock reading; the UI timer is just a wakeup.
#[derive(Debug, Default)]
pub struct ReplySimulator {
    pending: Vec<PendingReply>,
}

impl ReplySimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply for `contact_id` and returns the delay to wait for.
    pub fn schedule(&mut self, contact_id: &str, now_ms: i64) -> u64 {
        let mut rng = rand::thread_rng();
        let delay = rng.gen_range(MIN_DELAY_MS..=MAX_DELAY_MS);
        let text = CANNED_REPLIES
            .choose(&mut rng)
            .copied()
            .unwrap_or(CANNED_REPLIES[0]);
        self.pending.push(PendingReply {
            contact_id: contact_id.to_owned(),
            fire_at: now_ms + delay as i64,
            text: text.to_owned(),
        });
        delay
    }

    /// Drains every task whose fire time has passed, in scheduling order.
    pub fn due(&mut self, now_ms: i64) -> Vec<PendingReply> {
        let mut ready = Vec::new();
        self.pending.retain(|task| {
            if task.fire_at <= now_ms {
                ready.push(task.clone());
                false
            } else {
                true
            }
        });
        ready
    }

    /// Whether a reply is still in flight for `contact_id`. Drives the typing
    /// indicator for whichever thread is on screen.
    pub fn pending_for(&self, contact_id: &str) -> bool {
        self.pending.iter().any(|task| task.contact_id == contact_id)
    }
}
