//! Fixed-interval poller for an open room view.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    ApplyOutcome, ChannelRef, MemberEntry, MessageEntry, RequestTicket, RoomFeed, SyncError,
    SyncView,
};

/// Interval between polls of an open view.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// What an open view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollTarget {
    /// Message history of a room or the global channel.
    Messages(ChannelRef),
    /// Member list of a room.
    Members(Uuid),
}

/// Poller tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    /// Time between dispatched fetches.
    pub poll_interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Snapshot published to view subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    /// Messages, oldest first.
    Messages(Vec<MessageEntry>),
    /// Members, most recent joiners first.
    Members(Vec<MemberEntry>),
}

impl Snapshot {
    /// Number of entries shown.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Messages(entries) => entries.len(),
            Self::Members(entries) => entries.len(),
        }
    }

    /// Whether the view shows no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

type FetchResult = (RequestTicket, Result<Snapshot, SyncError>);

/// Handle to a running poller. Dropping it stops polling.
pub struct PollHandle {
    task: JoinHandle<()>,
    updates: watch::Receiver<Option<Snapshot>>,
}

impl PollHandle {
    /// Most recently applied snapshot, if any poll has succeeded.
    #[must_use]
    pub fn latest(&self) -> Option<Snapshot> {
        self.updates.borrow().clone()
    }

    /// Wait until a snapshot this handle has not yet waited on is applied.
    ///
    /// Returns `false` once the poller has stopped and no further changes
    /// can arrive.
    pub async fn changed(&mut self) -> bool {
        self.updates.changed().await.is_ok()
    }

    /// Independent receiver for another consumer of the same view.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Snapshot>> {
        self.updates.clone()
    }

    /// Whether the polling task has stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop polling; in-flight fetches are aborted and their responses
    /// never reach the view.
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start polling `target` through `feed` on `config.poll_interval`.
///
/// The first fetch is dispatched immediately. Every tick dispatches a new
/// fetch without waiting for earlier ones, and responses are applied through
/// a [`SyncView`] so a slow, older response cannot overwrite a newer one.
/// Failed polls are logged and leave the view as it was.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_room_poller<F>(feed: F, target: PollTarget, config: PollerConfig) -> PollHandle
where
    F: RoomFeed + 'static,
{
    let (sender, updates) = watch::channel(None);
    let task = tokio::spawn(run(Arc::new(feed), target, config, sender));
    PollHandle { task, updates }
}

async fn run<F>(
    feed: Arc<F>,
    target: PollTarget,
    config: PollerConfig,
    sender: watch::Sender<Option<Snapshot>>,
) where
    F: RoomFeed + 'static,
{
    let mut view = SyncView::new();
    let mut ticker = time::interval(config.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Dropping the set with this task aborts fetches still in flight.
    let mut in_flight: JoinSet<FetchResult> = JoinSet::new();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let ticket = view.dispatch();
                let feed = Arc::clone(&feed);
                in_flight.spawn(async move { (ticket, fetch(feed.as_ref(), target).await) });
            }
            Some(joined) = in_flight.join_next() => {
                settle(&mut view, &sender, target, joined);
            }
        }
    }
}

async fn fetch<F>(feed: &F, target: PollTarget) -> Result<Snapshot, SyncError>
where
    F: RoomFeed + ?Sized,
{
    match target {
        PollTarget::Messages(channel) => feed.fetch_messages(channel).await.map(Snapshot::Messages),
        PollTarget::Members(room_id) => feed.fetch_members(room_id).await.map(Snapshot::Members),
    }
}

fn settle(
    view: &mut SyncView<Snapshot>,
    sender: &watch::Sender<Option<Snapshot>>,
    target: PollTarget,
    joined: Result<FetchResult, JoinError>,
) {
    match joined {
        Ok((ticket, Ok(snapshot))) => match view.apply(ticket, snapshot) {
            ApplyOutcome::Applied => {
                sender.send_replace(view.snapshot().cloned());
            }
            ApplyOutcome::Unchanged => {}
            ApplyOutcome::Stale => {
                debug!(?target, ticket = ticket.sequence(), "discarded stale poll response");
            }
        },
        Ok((ticket, Err(error))) => {
            warn!(?target, ticket = ticket.sequence(), %error, "poll failed");
        }
        Err(error) => {
            warn!(?target, %error, "poll task failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use rstest::rstest;

    use super::*;

    /// One scripted reply: how long the fetch takes and what it returns.
    type Reply = (Duration, Result<Vec<MessageEntry>, SyncError>);

    /// Feed replaying scripted replies, then repeating `steady` forever.
    struct ScriptedFeed {
        calls: Arc<AtomicUsize>,
        script: Mutex<VecDeque<Reply>>,
        steady: Vec<MessageEntry>,
    }

    impl ScriptedFeed {
        fn new(script: Vec<Reply>, steady: Vec<MessageEntry>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let feed = Self {
                calls: Arc::clone(&calls),
                script: Mutex::new(script.into()),
                steady,
            };
            (feed, calls)
        }
    }

    #[async_trait]
    impl RoomFeed for ScriptedFeed {
        async fn fetch_messages(
            &self,
            _channel: ChannelRef,
        ) -> Result<Vec<MessageEntry>, SyncError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.script.lock().expect("script lock").pop_front();
            let (delay, reply) = next.unwrap_or_else(|| (Duration::ZERO, Ok(self.steady.clone())));
            time::sleep(delay).await;
            reply
        }

        async fn fetch_members(&self, _room_id: Uuid) -> Result<Vec<MemberEntry>, SyncError> {
            Ok(Vec::new())
        }
    }

    fn entry(content: &str) -> MessageEntry {
        MessageEntry {
            id: Uuid::new_v4(),
            room_id: None,
            sender_id: Uuid::nil(),
            content: content.to_owned(),
            created_at: "2026-03-01T09:00:00+00:00".to_owned(),
            sender_name: Some("Ada".to_owned()),
            sender_avatar: None,
            is_verified_owner: false,
        }
    }

    fn contents(snapshot: Option<Snapshot>) -> Vec<String> {
        match snapshot {
            Some(Snapshot::Messages(entries)) => {
                entries.into_iter().map(|e| e.content).collect()
            }
            other => panic!("expected a message snapshot, got {other:?}"),
        }
    }

    fn global() -> PollTarget {
        PollTarget::Messages(ChannelRef::Global)
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn polls_immediately_then_every_three_seconds() {
        let (feed, calls) = ScriptedFeed::new(Vec::new(), vec![entry("hi")]);
        let handle = spawn_room_poller(feed, global(), PollerConfig::default());

        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(contents(handle.latest()), vec!["hi"]);

        time::sleep(Duration::from_secs(6)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        handle.close();
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn slow_older_response_never_overwrites_a_newer_one() {
        let script = vec![
            (Duration::from_secs(5), Ok(vec![entry("old")])),
            (Duration::ZERO, Ok(vec![entry("old"), entry("new")])),
        ];
        let (feed, _calls) = ScriptedFeed::new(script, vec![entry("old"), entry("new")]);
        let handle = spawn_room_poller(feed, global(), PollerConfig::default());

        // The second poll lands at 3s; the first resolves at 5s.
        time::sleep(Duration::from_millis(5_500)).await;
        assert_eq!(contents(handle.latest()), vec!["old", "new"]);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn failed_polls_leave_the_view_unchanged() {
        let script = vec![
            (Duration::ZERO, Ok(vec![entry("kept")])),
            (
                Duration::ZERO,
                Err(SyncError::Transport {
                    message: "connection reset".to_owned(),
                }),
            ),
        ];
        let (feed, calls) = ScriptedFeed::new(script, vec![entry("kept"), entry("later")]);
        let handle = spawn_room_poller(feed, global(), PollerConfig::default());
        let mut subscriber = handle.subscribe();

        time::sleep(Duration::from_millis(3_100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(contents(subscriber.borrow_and_update().clone()), vec!["kept"]);

        subscriber.changed().await.expect("poller still running");
        assert_eq!(contents(handle.latest()), vec!["kept", "later"]);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn closing_stops_polling_and_drops_in_flight_responses() {
        let script = vec![(Duration::from_secs(2), Ok(vec![entry("too late")]))];
        let (feed, calls) = ScriptedFeed::new(script, Vec::new());
        let handle = spawn_room_poller(feed, global(), PollerConfig::default());
        let mut subscriber = handle.subscribe();

        time::sleep(Duration::from_secs(1)).await;
        handle.close();
        time::sleep(Duration::from_secs(10)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(subscriber.borrow().is_none());
        assert!(subscriber.changed().await.is_err());
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn identical_snapshots_do_not_notify_subscribers() {
        let (feed, calls) = ScriptedFeed::new(Vec::new(), vec![entry("same")]);
        let handle = spawn_room_poller(feed, global(), PollerConfig::default());
        let mut subscriber = handle.subscribe();

        time::sleep(Duration::from_millis(100)).await;
        subscriber.borrow_and_update();
        time::sleep(Duration::from_secs(6)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(!subscriber.has_changed().expect("poller still running"));
    }
}
