//! Transient user-facing notifications.
//!
//! Notifications are kept in insertion order (display order). Each one gets a
//! deadline in an expiry registry keyed by id; [`NotificationCenter::expire`]
//! removes whatever is past due. Manual removal drops the registry entry too,
//! so a dismissed notification can never be expired a second time, and
//! removing an unknown id does nothing.

use crate::app::clock::Clock;
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(pub u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: Option<String>,
    pub created_at: DateTime<Local>,
}

/// A notification request. `id` is normally left empty and assigned on insert.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub id: Option<NotificationId>,
    pub kind: NotificationKind,
    pub title: String,
    pub message: Option<String>,
}

impl NewNotification {
    pub fn new(kind: NotificationKind, title: impl Into<String>) -> Self {
        Self {
            id: None,
            kind,
            title: title.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

pub struct NotificationCenter {
    items: Vec<Notification>,
    deadlines: BTreeMap<NotificationId, Instant>,
    next_id: u64,
    ttl: Duration,
    clock: Box<dyn Clock>,
}

impl NotificationCenter {
    pub fn new(clock: Box<dyn Clock>, ttl: Duration) -> Self {
        Self {
            items: Vec::new(),
            deadlines: BTreeMap::new(),
            next_id: 1,
            ttl,
            clock,
        }
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    fn allocate_id(&mut self) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Insert a notification and schedule its removal. A caller-supplied id
    /// that is already present replaces that entry in place and restarts its
    /// timer; the counter always moves past supplied ids.
    pub fn push(&mut self, new: NewNotification) -> NotificationId {
        let id = match new.id {
            Some(id) => {
                self.next_id = self.next_id.max(id.0.saturating_add(1));
                id
            }
            None => self.allocate_id(),
        };
        let notification = Notification {
            id,
            kind: new.kind,
            title: new.title,
            message: new.message,
            created_at: Local::now(),
        };
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(existing) => *existing = notification,
            None => self.items.push(notification),
        }
        self.deadlines.insert(id, self.clock.now() + self.ttl);
        id
    }

    /// Remove by id. Returns whether anything was removed.
    pub fn remove(&mut self, id: NotificationId) -> bool {
        self.deadlines.remove(&id);
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Remove every notification whose deadline has passed.
    pub fn expire(&mut self) -> Vec<NotificationId> {
        let now = self.clock.now();
        let due: Vec<NotificationId> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, _)| *id)
            .collect();
        for id in &due {
            self.remove(*id);
        }
        due
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.deadlines.clear();
    }

    pub fn newest(&self) -> Option<NotificationId> {
        self.items.last().map(|n| n.id)
    }

    /// Time left before `id` expires, `None` once it is gone.
    pub fn remaining(&self, id: NotificationId) -> Option<Duration> {
        let deadline = self.deadlines.get(&id)?;
        Some(deadline.saturating_duration_since(self.clock.now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::clock::ManualClock;
    use std::collections::HashSet;

    const TTL: Duration = Duration::from_secs(5);

    fn center() -> (NotificationCenter, ManualClock) {
        let clock = ManualClock::new();
        (NotificationCenter::new(Box::new(clock.clone()), TTL), clock)
    }

    fn info(title: &str) -> NewNotification {
        NewNotification::new(NotificationKind::Info, title)
    }

    #[test]
    fn test_ids_are_unique_under_rapid_creation() {
        let (mut c, _clock) = center();
        let ids: Vec<_> = (0..100).map(|i| c.push(info(&format!("n{}", i)))).collect();
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 100);
        assert_eq!(c.items().len(), 100);
    }

    #[test]
    fn test_insertion_order_is_display_order() {
        let (mut c, _clock) = center();
        c.push(info("a"));
        c.push(info("b"));
        c.push(info("c"));
        let titles: Vec<_> = c.items().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["a", "b", "c"]);
        assert_eq!(c.newest(), Some(c.items()[2].id));
    }

    #[test]
    fn test_expire_after_ttl() {
        let (mut c, clock) = center();
        let first = c.push(info("first"));
        clock.advance(Duration::from_secs(3));
        let second = c.push(info("second"));

        clock.advance(Duration::from_millis(1999));
        assert!(c.expire().is_empty());
        assert_eq!(c.remaining(first), Some(Duration::from_millis(1)));

        clock.advance(Duration::from_millis(1));
        assert_eq!(c.expire(), vec![first]);
        assert_eq!(c.items().len(), 1);

        clock.advance(Duration::from_secs(3));
        assert_eq!(c.expire(), vec![second]);
        assert!(c.items().is_empty());
    }

    #[test]
    fn test_remove_is_idempotent_and_cancels_expiry() {
        let (mut c, clock) = center();
        let keep = c.push(info("keep"));
        let gone = c.push(info("gone"));

        assert!(c.remove(gone));
        let after_once: Vec<_> = c.items().to_vec();
        assert!(!c.remove(gone));
        assert_eq!(c.items(), after_once.as_slice());
        assert_eq!(c.remaining(gone), None);

        clock.advance(TTL);
        assert_eq!(c.expire(), vec![keep]);
        assert!(!c.remove(keep));
    }

    #[test]
    fn test_supplied_id_replaces_and_reschedules() {
        let (mut c, clock) = center();
        let id = c.push(NewNotification {
            id: Some(NotificationId(42)),
            ..info("old")
        });
        clock.advance(Duration::from_secs(4));
        c.push(NewNotification {
            id: Some(id),
            ..info("new")
        });

        assert_eq!(c.items().len(), 1);
        assert_eq!(c.items()[0].title, "new");
        clock.advance(Duration::from_secs(4));
        assert!(c.expire().is_empty());

        let next = c.push(info("auto"));
        assert!(next.0 > 42);
    }

    #[test]
    fn test_largest_supplied_id_does_not_overflow() {
        let (mut c, _clock) = center();
        let id = c.push(NewNotification {
            id: Some(NotificationId(u64::MAX)),
            ..info("last")
        });
        assert_eq!(id, NotificationId(u64::MAX));
        assert_eq!(c.items().len(), 1);
        assert!(c.remove(id));
    }

    #[test]
    fn test_never_older_than_ttl_after_expiry_pass() {
        let (mut c, clock) = center();
        let mut created: Vec<(NotificationId, Duration)> = Vec::new();
        let mut elapsed = Duration::ZERO;
        for step in 0..40u64 {
            if step % 3 == 0 {
                created.push((c.push(info("tick")), elapsed));
            }
            if step % 7 == 0 {
                if let Some((id, _)) = created.first() {
                    c.remove(*id);
                }
            }
            let by = Duration::from_millis(700);
            clock.advance(by);
            elapsed += by;
            c.expire();
            for n in c.items() {
                let born = created.iter().find(|(id, _)| *id == n.id).unwrap().1;
                assert!(elapsed - born < TTL);
            }
        }
    }

    #[test]
    fn test_clear_drops_schedule() {
        let (mut c, clock) = center();
        let id = c.push(info("x"));
        c.clear();
        assert!(c.items().is_empty());
        clock.advance(TTL);
        assert!(c.expire().is_empty());
        assert_eq!(c.remaining(id), None);
    }
}
