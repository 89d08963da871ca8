use std::time::{Duration, Instant};

pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub expires_at: Instant,
}

/// Holds at most one visible notification and its expiry deadline.
///
/// Showing a new message replaces both the message and the deadline, so an
/// earlier message can never hide a later one.
#[derive(Debug)]
pub struct Notifier {
    current: Option<Notification>,
    ttl: Duration,
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    pub fn show(&mut self, kind: NotificationKind, message: impl Into<String>, now: Instant) {
        self.current = Some(Notification {
            message: message.into(),
            kind,
            expires_at: now + self.ttl,
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(NotificationKind::Success, message, Instant::now());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(NotificationKind::Error, message, Instant::now());
    }

    pub fn tick(&mut self, now: Instant) {
        if self.current.as_ref().is_some_and(|n| now >= n.expires_at) {
            self.current = None;
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_until_shown() {
        let notifier = Notifier::default();
        assert!(notifier.current().is_none());
    }

    #[test]
    fn test_expires_after_ttl() {
        let mut notifier = Notifier::new(Duration::from_millis(3000));
        let t0 = Instant::now();
        notifier.show(NotificationKind::Success, "Data copied to clipboard!", t0);

        notifier.tick(t0 + Duration::from_millis(2999));
        assert_eq!(notifier.current().unwrap().kind, NotificationKind::Success);

        notifier.tick(t0 + Duration::from_millis(3000));
        assert!(notifier.current().is_none());
    }

    #[test]
    fn test_replacement_gets_fresh_deadline() {
        let mut notifier = Notifier::new(Duration::from_millis(3000));
        let t0 = Instant::now();
        notifier.show(NotificationKind::Success, "first", t0);
        notifier.show(NotificationKind::Error, "second", t0 + Duration::from_millis(2000));

        // the first message's deadline has passed, the second's has not
        notifier.tick(t0 + Duration::from_millis(3500));
        let shown = notifier.current().unwrap();
        assert_eq!(shown.message, "second");
        assert_eq!(shown.kind, NotificationKind::Error);

        notifier.tick(t0 + Duration::from_millis(5000));
        assert!(notifier.current().is_none());
    }
}
