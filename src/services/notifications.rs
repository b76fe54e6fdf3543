//! Notification inbox.
//!
//! The backend only exposes the peer-review feed. Read state and deletion
//! live in the inbox value and are lost when it is dropped. Entry ids are
//! feed positions, so they stay stable between fetches of the same feed.

use std::fmt;

use crate::models::{Notification, NotificationFeed, NotificationKind};
use crate::render::layout;

const FEED_TITLE: &str = "Peer Review Notification";
const FEED_SENDER: &str = "System";

/// Notifications of the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inbox {
    pub pending_assignments: u32,
    pub overdue_reviews: u32,
    items: Vec<Notification>,
    unread_only: bool,
}

impl Inbox {
    /// Number feed entries from 1, stamped with `received`.
    pub fn from_feed(feed: NotificationFeed, received: &str) -> Self {
        let items = feed
            .notifications
            .into_iter()
            .enumerate()
            .map(|(index, notice)| Notification {
                id: index as u64 + 1,
                kind: NotificationKind::PeerReview,
                title: FEED_TITLE.to_string(),
                message: notice.message,
                priority: notice.priority,
                timestamp: received.to_string(),
                is_read: false,
                sender: FEED_SENDER.to_string(),
            })
            .collect();

        Self {
            pending_assignments: feed.pending_assignments,
            overdue_reviews: feed.overdue_reviews,
            items,
            unread_only: false,
        }
    }

    /// Show only unread entries.
    pub fn unread_only(mut self, on: bool) -> Self {
        self.unread_only = on;
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.is_read).count()
    }

    /// Entries after the unread filter.
    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.items
            .iter()
            .filter(move |n| !self.unread_only || !n.is_read)
    }

    /// Returns false when no entry has that id.
    pub fn mark_read(&mut self, id: u64) -> bool {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(item) => {
                item.is_read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for item in &mut self.items {
            item.is_read = true;
        }
    }

    /// Returns false when no entry has that id.
    pub fn delete(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }
}

impl fmt::Display for Inbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        layout::header(f, "Notifications")?;
        writeln!(
            f,
            "{} unread | {} pending assignments | {} overdue reviews",
            self.unread_count(),
            self.pending_assignments,
            self.overdue_reviews
        )?;

        let mut shown = 0;
        for item in self.visible() {
            if shown == 0 {
                layout::separator(f)?;
            }
            shown += 1;
            let marker = if item.is_read { " " } else { "*" };
            writeln!(
                f,
                "{marker} #{} {} {}",
                item.id,
                item.title,
                layout::badge(&item.priority)
            )?;
            layout::sub_item(f, &item.message)?;
            layout::sub_item(f, &format!("from {} at {}", item.sender, item.timestamp))?;
        }

        if shown == 0 {
            let text = if self.unread_only {
                "No unread notifications."
            } else {
                "No notifications."
            };
            writeln!(f, "{text}")?;
        }
        Ok(())
    }
}
