use crate::domain::Device;
use std::fmt;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info};

const COUNTDOWN_TICK: Duration = Duration::from_secs(1);
const INFO_DISPLAY: Duration = Duration::from_secs(5);
const ERROR_DISPLAY: Duration = Duration::from_secs(10);

#[derive(Clone, Debug, PartialEq)]
pub enum StatusUpdate {
    /// Status line, shown for `display_for` or until replaced.
    Message { text: String, display_for: Option<Duration> },
    Countdown { label: String, remaining: Duration, progress: String },
    DevicesRefreshed { projectors: Vec<Device>, pcs: Vec<Device> },
}

impl fmt::Display for StatusUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusUpdate::Message { text, .. } => f.write_str(text),
            StatusUpdate::Countdown { label, remaining, progress } if progress.is_empty() => {
                write!(f, "{} {}", label, format_remaining(*remaining))
            }
            StatusUpdate::Countdown { label, remaining, progress } => {
                write!(f, "{} {} | {}", label, format_remaining(*remaining), progress)
            }
            StatusUpdate::DevicesRefreshed { projectors, pcs } => {
                write!(f, "Device lists refreshed: {} projector(s), {} PC(s)", projectors.len(), pcs.len())
            }
        }
    }
}

/// Formats a remaining time as `m:ss`.
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Fan-out channel for progress reporting. Cloning shares the channel.
#[derive(Clone, Debug)]
pub struct StatusBoard {
    tx: broadcast::Sender<StatusUpdate>,
}

impl StatusBoard {
    /// Creates a board that buffers up to `capacity` updates per subscriber, at least one.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        StatusBoard { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatusUpdate> {
        self.tx.subscribe()
    }

    pub fn publish(&self, update: StatusUpdate) {
        debug!("📣 {}", update);
        // No subscribers is fine, nobody is watching the status bar
        self.tx.send(update).unwrap_or_default();
    }

    pub fn info(&self, text: impl Into<String>) {
        self.message(text.into(), INFO_DISPLAY);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.message(text.into(), ERROR_DISPLAY);
    }

    fn message(&self, text: String, display_for: Duration) {
        self.publish(StatusUpdate::Message {
            text,
            display_for: Some(display_for),
        });
    }

    /// Waits `total`, publishing the remaining time once per second, starting with `total`
    /// and ending with zero.
    pub async fn countdown(&self, total: Duration, label: &str, progress: &str) {
        info!("⏳ {} for {}...", label, format_remaining(total));
        let start = Instant::now();
        let mut elapsed = Duration::ZERO;

        loop {
            let remaining = total.saturating_sub(elapsed);
            self.publish(StatusUpdate::Countdown {
                label: label.to_string(),
                remaining,
                progress: progress.to_string(),
            });

            if remaining.is_zero() {
                break;
            }

            elapsed += COUNTDOWN_TICK.min(remaining);
            sleep_until(start + elapsed).await;
        }

        info!("⏳ {} for {}... OK", label, format_remaining(total));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Duration::ZERO, "0:00")]
    #[case(Duration::from_secs(9), "0:09")]
    #[case(Duration::from_secs(120), "2:00")]
    #[case(Duration::from_millis(61_900), "1:01")]
    fn formats_remaining_time(#[case] remaining: Duration, #[case] expected: &str) {
        assert_eq!(format_remaining(remaining), expected);
    }

    #[test]
    fn renders_countdowns_for_the_status_bar() {
        let update = StatusUpdate::Countdown {
            label: "Projector warm-up".to_string(),
            remaining: Duration::from_secs(119),
            progress: "Bulk power on in progress".to_string(),
        };
        assert_eq!(update.to_string(), "Projector warm-up 1:59 | Bulk power on in progress");

        let update = StatusUpdate::Countdown {
            label: "Projector warm-up".to_string(),
            remaining: Duration::from_secs(5),
            progress: String::new(),
        };
        assert_eq!(update.to_string(), "Projector warm-up 0:05");
    }

    #[test]
    fn publishing_without_subscribers_is_not_an_error() {
        let board = StatusBoard::new(4);
        board.info("nobody is listening");
    }

    #[test]
    fn accepts_a_zero_buffer_size() {
        let board = StatusBoard::new(0);
        let mut rx = board.subscribe();

        board.info("still delivered");

        assert_eq!(rx.try_recv().unwrap().to_string(), "still delivered");
    }

    #[test]
    fn messages_carry_a_display_duration() {
        let board = StatusBoard::new(4);
        let mut rx = board.subscribe();

        board.info("done");
        board.error("broken");

        assert_eq!(
            rx.try_recv().unwrap(),
            StatusUpdate::Message {
                text: "done".to_string(),
                display_for: Some(Duration::from_secs(5))
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            StatusUpdate::Message {
                text: "broken".to_string(),
                display_for: Some(Duration::from_secs(10))
            }
        );
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn counts_down_once_per_second() {
        let board = StatusBoard::new(16);
        let mut rx = board.subscribe();

        let start = Instant::now();
        board.countdown(Duration::from_secs(3), "Waiting", "").await;

        assert_eq!(Instant::now() - start, Duration::from_secs(3));

        let mut remaining = Vec::new();
        while let Ok(StatusUpdate::Countdown { remaining: r, .. }) = rx.try_recv() {
            remaining.push(r.as_secs());
        }
        assert_eq!(remaining, vec![3, 2, 1, 0]);
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn counts_down_partial_seconds() {
        let board = StatusBoard::new(16);

        let start = Instant::now();
        board.countdown(Duration::from_millis(1_500), "Waiting", "").await;

        assert_eq!(Instant::now() - start, Duration::from_millis(1_500));
    }
}
