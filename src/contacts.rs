#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
    pub status: &'static str,
}

// Fixed demo roster, in display order. Avatar colors are GNOME palette hexes.
pub static DIRECTORY: &[Contact] = &[
    Contact { id: "alice", name: "Alice", color: "#3584e4", status: "online" },
    Contact { id: "bob", name: "Bob", color: "#2ec27e", status: "away" },
    Contact { id: "carol", name: "Carol", color: "#c061cb", status: "last seen today" },
    Contact { id: "dave", name: "Dave", color: "#e66100", status: "busy" },
];

pub fn find(id: &str) -> Option<&'static Contact> {
    DIRECTORY.iter().find(|c| c.id == id)
}

pub fn first() -> &'static Contact {
    &DIRECTORY[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_ids_are_unique() {
        for (i, a) in DIRECTORY.iter().enumerate() {
            for b in &DIRECTORY[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn find_known_and_unknown() {
        assert_eq!(find("bob").map(|c| c.name), Some("Bob"));
        assert!(find("nobody").is_none());
    }

    #[test]
    fn first_is_display_order_head() {
        assert_eq!(first().id, DIRECTORY[0].id);
    }
}
