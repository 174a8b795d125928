//! Concurrency coverage for the in-memory chat store.
//!
//! Races run on a multi-threaded runtime so each port call genuinely
//! contends for the store lock.

use std::sync::Arc;

use roomchat::domain::ports::{
    FetchRecentRequest, MembershipRepository, MembershipRepositoryError, MessageQuery, NewRoom,
    PostMessageRequest, MessageCommand, RoomRepository,
};
use roomchat::domain::{
    Channel, DisplayName, MESSAGE_HISTORY_LIMIT, MessagingService, Role, RoomId, RoomName,
    UserId, UserProfile,
};
use roomchat::outbound::memory::InMemoryChatStore;
use rstest::rstest;

const RACE_ROUNDS: usize = 64;

async fn profile(store: &InMemoryChatStore, name: &str) -> UserId {
    let profile = UserProfile::new(
        UserId::random(),
        DisplayName::new(name).expect("display name"),
    );
    let id = profile.id.clone();
    store.insert_user(profile).await;
    id
}

async fn room_with_member(store: &InMemoryChatStore) -> (RoomId, UserId, UserId) {
    let founder = profile(store, "founder").await;
    let member = profile(store, "member").await;
    let room = store
        .create_room_with_founder(&NewRoom {
            id: RoomId::random(),
            name: RoomName::new("race").expect("room name"),
            created_by: founder.clone(),
        })
        .await
        .expect("room created");
    store
        .create_membership(&room.id, &member, Role::User)
        .await
        .expect("member joined");
    (room.id, founder, member)
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn kick_racing_a_role_change_never_resurrects_the_member() {
    for _ in 0..RACE_ROUNDS {
        let store = Arc::new(InMemoryChatStore::default());
        let (room_id, _, member) = room_with_member(&store).await;

        let kick = {
            let store = store.clone();
            let member = member.clone();
            tokio::spawn(async move { store.remove_membership(&room_id, &member).await })
        };
        let promote = {
            let store = store.clone();
            let member = member.clone();
            tokio::spawn(async move { store.set_role(&room_id, &member, Role::Moderator).await })
        };

        let removed = kick.await.expect("kick task").expect("kick succeeds");
        assert!(removed);
        match promote.await.expect("promote task") {
            Ok(membership) => assert_eq!(membership.role, Role::Moderator),
            Err(MembershipRepositoryError::MissingMembership { .. }) => {}
            Err(other) => panic!("unexpected failure: {other}"),
        }
        let remaining = store
            .find_membership(&room_id, &member)
            .await
            .expect("lookup");
        assert!(remaining.is_none(), "kicked member must stay removed");
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn mutual_kicks_between_administrators_keep_one_administrator() {
    for _ in 0..RACE_ROUNDS {
        let store = Arc::new(InMemoryChatStore::default());
        let (room_id, founder, second) = room_with_member(&store).await;
        store
            .set_role(&room_id, &second, Role::Administrator)
            .await
            .expect("second administrator");

        let first_kick = {
            let store = store.clone();
            let target = second.clone();
            tokio::spawn(async move { store.remove_membership(&room_id, &target).await })
        };
        let second_kick = {
            let store = store.clone();
            let target = founder.clone();
            tokio::spawn(async move { store.remove_membership(&room_id, &target).await })
        };

        let outcomes = [
            first_kick.await.expect("task"),
            second_kick.await.expect("task"),
        ];
        let refused = outcomes
            .iter()
            .filter(|outcome| {
                matches!(
                    outcome,
                    Err(MembershipRepositoryError::LastAdministrator { .. })
                )
            })
            .count();
        assert_eq!(refused, 1, "exactly one kick must be refused");

        let admins = store
            .list_members(&room_id)
            .await
            .expect("members")
            .into_iter()
            .filter(|m| m.membership.role == Role::Administrator)
            .count();
        assert_eq!(admins, 1);
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_posts_are_capped_and_returned_oldest_first() {
    let store = Arc::new(InMemoryChatStore::default());
    let sender = profile(&store, "chatty").await;
    let messaging = Arc::new(MessagingService::new(
        store.clone(),
        store.clone(),
        store.clone(),
    ));

    let total = MESSAGE_HISTORY_LIMIT + 10;
    let mut tasks = Vec::with_capacity(total);
    for n in 0..total {
        let messaging = messaging.clone();
        let sender = sender.clone();
        tasks.push(tokio::spawn(async move {
            messaging
                .post_message(PostMessageRequest {
                    actor_id: sender,
                    channel: Channel::Global,
                    content: format!("message {n}"),
                })
                .await
        }));
    }
    for task in tasks {
        task.await.expect("post task").expect("post succeeds");
    }

    let history = messaging
        .fetch_recent(FetchRecentRequest {
            actor_id: sender,
            channel: Channel::Global,
        })
        .await
        .expect("history");
    assert_eq!(history.messages.len(), MESSAGE_HISTORY_LIMIT);
    assert!(
        history
            .messages
            .windows(2)
            .all(|pair| pair[0].message.created_at < pair[1].message.created_at),
        "history must be strictly oldest first"
    );
}
