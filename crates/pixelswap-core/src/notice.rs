//! Transient user notices ("toasts").
//!
//! An explicit state container owned by the presentation layer. It has no
//! clock of its own: callers pass the current time in milliseconds to
//! [`NoticeBoard::show`] and drive expiry by calling
//! [`NoticeBoard::expire`] from their timer.

use serde::{Deserialize, Serialize};

/// How long a notice stays up unless dismissed.
pub const DEFAULT_NOTICE_TTL_MS: u64 = 4000;

/// Tone of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
    #[default]
    Info,
}

/// Identifier generated for each shown notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoticeId(pub u64);

/// One visible notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: NoticeId,
    pub message: String,
    pub kind: NoticeKind,
    /// Time (ms) at which the notice disappears on its own.
    pub expires_at: u64,
}

/// Time-ordered list of visible notices.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
    next_id: u64,
    ttl_ms: u64,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_NOTICE_TTL_MS)
    }
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Board whose notices live for `ttl_ms` milliseconds.
    pub fn with_ttl(ttl_ms: u64) -> Self {
        Self {
            notices: Vec::new(),
            next_id: 1,
            ttl_ms,
        }
    }

    /// Append a notice shown at `now_ms`.
    pub fn show(&mut self, message: impl Into<String>, kind: NoticeKind, now_ms: u64) -> NoticeId {
        let id = NoticeId(self.next_id);
        self.next_id += 1;
        self.notices.push(Notice {
            id,
            message: message.into(),
            kind,
            expires_at: now_ms.saturating_add(self.ttl_ms),
        });
        id
    }

    /// Remove a notice early. Returns false when it was already gone.
    pub fn dismiss(&mut self, id: NoticeId) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }

    /// Drop every notice whose lifetime has elapsed at `now_ms`.
    ///
    /// Returns the removed ids, oldest first.
    pub fn expire(&mut self, now_ms: u64) -> Vec<NoticeId> {
        let mut expired = Vec::new();
        self.notices.retain(|n| {
            let keep = n.expires_at > now_ms;
            if !keep {
                expired.push(n.id);
            }
            keep
        });
        expired
    }

    /// Visible notices, oldest first.
    pub fn active(&self) -> &[Notice] {
        &self.notices
    }

    /// Earliest pending expiry, for scheduling the next timer tick.
    pub fn next_expiry(&self) -> Option<u64> {
        self.notices.iter().map(|n| n.expires_at).min()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_assigns_unique_ids() {
        let mut board = NoticeBoard::new();
        let a = board.show("a.png loaded successfully", NoticeKind::Success, 0);
        let b = board.show("Image converted successfully!", NoticeKind::Success, 10);
        assert_ne!(a, b);
        assert_eq!(board.len(), 2);
        assert_eq!(board.active()[0].id, a);
    }

    #[test]
    fn test_notice_expires_after_ttl() {
        let mut board = NoticeBoard::new();
        let id = board.show("hello", NoticeKind::Info, 1_000);

        assert!(board.expire(4_999).is_empty());
        assert_eq!(board.expire(5_000), vec![id]);
        assert!(board.is_empty());
    }

    #[test]
    fn test_expire_keeps_newer_notices() {
        let mut board = NoticeBoard::with_ttl(100);
        let old = board.show("old", NoticeKind::Info, 0);
        let new = board.show("new", NoticeKind::Error, 50);

        assert_eq!(board.next_expiry(), Some(100));
        assert_eq!(board.expire(120), vec![old]);
        assert_eq!(board.active()[0].id, new);
        assert_eq!(board.next_expiry(), Some(150));
    }

    #[test]
    fn test_dismiss() {
        let mut board = NoticeBoard::new();
        let id = board.show("Failed to convert image. Please try again.", NoticeKind::Error, 0);
        assert!(board.dismiss(id));
        assert!(!board.dismiss(id));
        assert_eq!(board.next_expiry(), None);
    }

    #[test]
    fn test_expiry_saturates() {
        let mut board = NoticeBoard::new();
        board.show("late", NoticeKind::Info, u64::MAX - 1);
        assert_eq!(board.active()[0].expires_at, u64::MAX);
    }

    #[test]
    fn test_serialized_shape() {
        let mut board = NoticeBoard::new();
        board.show("done", NoticeKind::Success, 0);
        let json = serde_json::to_value(board.active()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "id": 1, "message": "done", "kind": "success", "expiresAt": 4000 }
            ])
        );
    }
}
