//! Admin notification polling.
//!
//! A fixed-interval task re-queries the counts of new orders and new
//! messages. When either count grows, one toast is published describing the
//! most recent entry (orders win if both grew in the same tick). While a
//! toast is visible the tick skips its check entirely, which debounces rapid
//! repeats; entries arriving between polls coalesce into a single toast.
//! This is best effort, not a guaranteed delivery channel.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::Serialize;
use sqlx::PgPool;

/// Short chime the admin client may play when a toast arrives; playback
/// failure on the client is silently ignored.
pub const NOTIFICATION_SOUND_URL: &str =
    "https://assets.mixkit.co/active_storage/sfx/2869/2869-preview.mp3";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Order,
    Message,
}

#[derive(Clone, Debug, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub detail: String,
    pub sound: &'static str,
    #[serde(skip)]
    shown_at: Instant,
}

/// Shared toast slot. Holds at most one toast; it auto-dismisses after the
/// TTL or on explicit dismissal.
#[derive(Clone)]
pub struct Notifier {
    slot: Arc<Mutex<Option<Toast>>>,
    ttl: Duration,
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            ttl,
        }
    }

    pub fn show(&self, kind: ToastKind, title: impl Into<String>, detail: impl Into<String>) {
        let toast = Toast {
            kind,
            title: title.into(),
            detail: detail.into(),
            sound: NOTIFICATION_SOUND_URL,
            shown_at: Instant::now(),
        };
        // A poisoned slot only means some holder panicked mid-write; the
        // toast data is still usable, so recover the guard.
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(toast);
    }

    /// Current toast, dropping it first if the TTL has elapsed.
    pub fn current(&self) -> Option<Toast> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(toast) = slot.as_ref() {
            if toast.shown_at.elapsed() >= self.ttl {
                *slot = None;
            }
        }
        slot.clone()
    }

    pub fn dismiss(&self) {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn is_visible(&self) -> bool {
        self.current().is_some()
    }

    /// Debounce gate for the poller: a visible toast suppresses the whole
    /// check for that tick, so rapid repeats collapse into one toast.
    pub fn tick_allowed(&self) -> bool {
        !self.is_visible()
    }
}

#[derive(Default)]
struct SeenCounts {
    orders: i64,
    messages: i64,
}

/// Runs forever; spawned once at startup.
pub async fn run_poller(db: PgPool, notifier: Notifier, interval: Duration) {
    let mut seen = SeenCounts::default();
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        if !notifier.tick_allowed() {
            continue;
        }
        if let Err(e) = check_once(&db, &notifier, &mut seen).await {
            tracing::warn!(error = %e, "notification poll failed");
        }
    }
}

async fn check_once(
    db: &PgPool,
    notifier: &Notifier,
    seen: &mut SeenCounts,
) -> sqlx::Result<()> {
    let (orders,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders WHERE status = 'new'")
        .fetch_one(db)
        .await?;
    let (messages,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM messages WHERE status = 'new'")
            .fetch_one(db)
            .await?;

    if orders > seen.orders {
        let latest: Option<(String,)> = sqlx::query_as(
            "SELECT customer_name FROM orders WHERE status = 'new' ORDER BY created_at DESC LIMIT 1",
        )
        .fetch_optional(db)
        .await?;
        if let Some((name,)) = latest {
            notifier.show(ToastKind::Order, "طلب جديد!", format!("من: {name}"));
        }
    } else if messages > seen.messages {
        let latest: Option<(String,)> = sqlx::query_as(
            "SELECT full_name FROM messages WHERE status = 'new' ORDER BY created_at DESC LIMIT 1",
        )
        .fetch_optional(db)
        .await?;
        if let Some((name,)) = latest {
            notifier.show(ToastKind::Message, "رسالة جديدة!", format!("من: {name}"));
        }
    }

    seen.orders = orders;
    seen.messages = messages;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_stays_visible_within_ttl() {
        let notifier = Notifier::new(Duration::from_secs(60));
        notifier.show(ToastKind::Order, "طلب جديد!", "من: أحمد");
        assert!(notifier.is_visible());
        let toast = notifier.current().unwrap();
        assert_eq!(toast.kind, ToastKind::Order);
        assert_eq!(toast.sound, NOTIFICATION_SOUND_URL);
    }

    #[test]
    fn toast_expires_after_ttl() {
        let notifier = Notifier::new(Duration::ZERO);
        notifier.show(ToastKind::Message, "رسالة جديدة!", "من: سارة");
        assert!(notifier.current().is_none());
    }

    #[test]
    fn dismiss_clears_immediately() {
        let notifier = Notifier::new(Duration::from_secs(60));
        notifier.show(ToastKind::Order, "طلب جديد!", "من: أحمد");
        notifier.dismiss();
        assert!(!notifier.is_visible());
    }

    #[test]
    fn visible_toast_suppresses_the_next_check() {
        let notifier = Notifier::new(Duration::from_secs(60));
        assert!(notifier.tick_allowed());
        notifier.show(ToastKind::Order, "طلب جديد!", "من: أحمد");
        assert!(!notifier.tick_allowed());
        notifier.dismiss();
        assert!(notifier.tick_allowed());
    }

    #[test]
    fn expired_toast_reopens_the_check() {
        let notifier = Notifier::new(Duration::ZERO);
        notifier.show(ToastKind::Message, "رسالة جديدة!", "من: سارة");
        assert!(notifier.tick_allowed());
    }

    #[test]
    fn poisoned_slot_still_serves_toasts() {
        let notifier = Notifier::new(Duration::from_secs(60));
        let poisoner = notifier.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.slot.lock().unwrap();
            panic!("poisoning the slot");
        })
        .join();
        notifier.show(ToastKind::Order, "طلب جديد!", "من: أحمد");
        assert!(notifier.is_visible());
        notifier.dismiss();
        assert!(!notifier.is_visible());
    }

    #[test]
    fn newer_toast_replaces_older() {
        let notifier = Notifier::new(Duration::from_secs(60));
        notifier.show(ToastKind::Message, "رسالة جديدة!", "من: سارة");
        notifier.show(ToastKind::Order, "طلب جديد!", "من: أحمد");
        assert_eq!(notifier.current().unwrap().kind, ToastKind::Order);
    }
}
