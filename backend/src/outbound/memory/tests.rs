//! Regression coverage for the in-memory chat store.

use chrono::{Local, TimeZone};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{DisplayName, MessageContent, MessageId, RoomName};

/// Clock stuck at one instant, so every ordering guarantee must come from
/// the store itself.
struct FrozenClock(DateTime<Utc>);

impl Clock for FrozenClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

#[fixture]
fn store() -> InMemoryChatStore {
    let instant = Utc
        .with_ymd_and_hms(2026, 1, 1, 9, 0, 0)
        .single()
        .expect("valid instant");
    InMemoryChatStore::new(Arc::new(FrozenClock(instant)))
}

fn user(name: &str) -> UserProfile {
    UserProfile::new(
        UserId::random(),
        DisplayName::new(name).expect("valid display name"),
    )
}

async fn seeded_room(store: &InMemoryChatStore, founder: &UserProfile) -> Room {
    store.insert_user(founder.clone()).await;
    store
        .create_room_with_founder(&NewRoom {
            id: RoomId::random(),
            name: RoomName::new("general").expect("valid name"),
            created_by: founder.id.clone(),
        })
        .await
        .expect("room created")
}

async fn post(store: &InMemoryChatStore, channel: Channel, sender: &UserId, text: &str) -> Message {
    store
        .append(&NewMessage {
            id: MessageId::random(),
            channel,
            sender_id: sender.clone(),
            content: MessageContent::new(text).expect("valid content"),
        })
        .await
        .expect("append")
}

#[rstest]
#[tokio::test]
async fn founder_becomes_administrator(store: InMemoryChatStore) {
    let founder = user("Ada");
    let room = seeded_room(&store, &founder).await;

    let membership = store
        .find_membership(&room.id, &founder.id)
        .await
        .expect("lookup")
        .expect("founder membership");
    assert_eq!(membership.role, Role::Administrator);

    let rooms = store.list_rooms().await.expect("list");
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].member_count, 1);
    assert_eq!(rooms[0].creator_name, Some(founder.display_name));
}

#[rstest]
#[tokio::test]
async fn timestamps_strictly_increase_under_a_frozen_clock(store: InMemoryChatStore) {
    let sender = UserId::random();
    let first = post(&store, Channel::Global, &sender, "one").await;
    let second = post(&store, Channel::Global, &sender, "two").await;
    assert!(second.created_at > first.created_at);
}

#[rstest]
#[tokio::test]
async fn list_recent_is_newest_first_and_channel_scoped(store: InMemoryChatStore) {
    let founder = user("Ada");
    let room = seeded_room(&store, &founder).await;
    let channel = Channel::Room(room.id);
    for text in ["a", "b", "c"] {
        post(&store, channel, &founder.id, text).await;
    }
    post(&store, Channel::Global, &founder.id, "elsewhere").await;

    let recent = store.list_recent(channel, 2).await.expect("list");
    let texts: Vec<_> = recent.iter().map(|m| m.content.as_ref()).collect();
    assert_eq!(texts, ["c", "b"]);
}

#[rstest]
#[tokio::test]
async fn rejoining_keeps_existing_membership(store: InMemoryChatStore) {
    let founder = user("Ada");
    let room = seeded_room(&store, &founder).await;
    let guest = UserId::random();

    store
        .create_membership(&room.id, &guest, Role::User)
        .await
        .expect("join");
    store.set_muted(&room.id, &guest, true).await.expect("mute");
    let again = store
        .create_membership(&room.id, &guest, Role::User)
        .await
        .expect("rejoin");

    assert!(again.is_muted);
}

#[rstest]
#[tokio::test]
async fn joining_a_missing_room_fails(store: InMemoryChatStore) {
    let err = store
        .create_membership(&RoomId::random(), &UserId::random(), Role::User)
        .await
        .expect_err("no room");
    assert!(matches!(err, MembershipRepositoryError::RoomNotFound { .. }));
}

#[rstest]
#[tokio::test]
async fn updates_never_create_memberships(store: InMemoryChatStore) {
    let founder = user("Ada");
    let room = seeded_room(&store, &founder).await;
    let stranger = UserId::random();

    let role_err = store
        .set_role(&room.id, &stranger, Role::Moderator)
        .await
        .expect_err("no row");
    let mute_err = store
        .set_muted(&room.id, &stranger, true)
        .await
        .expect_err("no row");

    assert!(matches!(role_err, MembershipRepositoryError::MissingMembership { .. }));
    assert!(matches!(mute_err, MembershipRepositoryError::MissingMembership { .. }));
    assert!(
        store
            .find_membership(&room.id, &stranger)
            .await
            .expect("lookup")
            .is_none()
    );
}

#[rstest]
#[tokio::test]
async fn sole_administrator_cannot_be_demoted_or_kicked(store: InMemoryChatStore) {
    let founder = user("Ada");
    let room = seeded_room(&store, &founder).await;

    let demote = store
        .set_role(&room.id, &founder.id, Role::User)
        .await
        .expect_err("last admin");
    let kick = store
        .remove_membership(&room.id, &founder.id)
        .await
        .expect_err("last admin");

    assert!(matches!(demote, MembershipRepositoryError::LastAdministrator { .. }));
    assert!(matches!(kick, MembershipRepositoryError::LastAdministrator { .. }));
}

#[rstest]
#[tokio::test]
async fn administrators_may_step_down_once_replaced(store: InMemoryChatStore) {
    let founder = user("Ada");
    let room = seeded_room(&store, &founder).await;
    let deputy = UserId::random();
    store
        .create_membership(&room.id, &deputy, Role::Administrator)
        .await
        .expect("second admin");

    let demoted = store
        .set_role(&room.id, &founder.id, Role::Moderator)
        .await
        .expect("demote with a spare administrator");
    assert_eq!(demoted.role, Role::Moderator);
}

#[rstest]
#[tokio::test]
async fn kick_is_idempotent(store: InMemoryChatStore) {
    let founder = user("Ada");
    let room = seeded_room(&store, &founder).await;
    let guest = UserId::random();
    store
        .create_membership(&room.id, &guest, Role::User)
        .await
        .expect("join");

    assert!(store.remove_membership(&room.id, &guest).await.expect("kick"));
    assert!(!store.remove_membership(&room.id, &guest).await.expect("kick again"));
}

#[rstest]
#[tokio::test]
async fn members_are_listed_most_recent_first_with_profiles(store: InMemoryChatStore) {
    let founder = user("Ada");
    let room = seeded_room(&store, &founder).await;
    let guest = user("Grace");
    store.insert_user(guest.clone()).await;
    store
        .create_membership(&room.id, &guest.id, Role::User)
        .await
        .expect("join");

    let members = store.list_members(&room.id).await.expect("list");
    let names: Vec<_> = members
        .iter()
        .map(|m| m.profile.display_name.as_ref())
        .collect();
    assert_eq!(names, ["Grace", "Ada"]);
}
