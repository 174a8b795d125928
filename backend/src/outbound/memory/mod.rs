//! In-process adapters for every driven port.
//!
//! [`InMemoryChatStore`] keeps users, rooms, memberships, and messages behind
//! one async mutex. Each port call is a single critical section, so the
//! same atomicity rules the PostgreSQL adapters get from transactions hold
//! here: a role change and a kick on the same member serialise, and the
//! loser observes the winner's result.
//!
//! The server falls back to this store when no database URL is configured.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::{Clock, DefaultClock};
use tokio::sync::Mutex;

use crate::domain::ports::{
    MembershipRepository, MembershipRepositoryError, MessageRepository, MessageRepositoryError,
    NewRoom, RoomRepository, RoomRepositoryError, UserDirectory, UserDirectoryError,
};
use crate::domain::{
    Channel, MemberProfile, Membership, Message, NewMessage, Role, Room, RoomId, RoomSummary,
    UserId, UserProfile,
};

#[derive(Default)]
struct ChatState {
    users: HashMap<UserId, UserProfile>,
    rooms: HashMap<RoomId, Room>,
    members: HashMap<(RoomId, UserId), Membership>,
    /// Append order, which is also timestamp order.
    messages: Vec<Message>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl ChatState {
    /// Clock reading forced strictly past every timestamp handed out so far.
    fn stamp(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let stamp = match self.last_timestamp {
            Some(last) if now <= last => last + TimeDelta::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(stamp);
        stamp
    }

    fn administrator_count(&self, room_id: &RoomId) -> usize {
        self.members
            .values()
            .filter(|m| &m.room_id == room_id && m.role == Role::Administrator)
            .count()
    }

    fn is_sole_administrator(&self, membership: &Membership) -> bool {
        membership.role == Role::Administrator
            && self.administrator_count(&membership.room_id) <= 1
    }
}

/// Thread-safe in-memory implementation of the chat storage ports.
pub struct InMemoryChatStore {
    state: Mutex<ChatState>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryChatStore {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl InMemoryChatStore {
    /// Create an empty store reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(ChatState::default()),
            clock,
        }
    }

    /// Register or replace a user profile.
    ///
    /// Users belong to the authentication service; this is how tests and
    /// local development seed them.
    pub async fn insert_user(&self, profile: UserProfile) {
        self.state
            .lock()
            .await
            .users
            .insert(profile.id.clone(), profile);
    }
}

#[async_trait]
impl UserDirectory for InMemoryChatStore {
    async fn find_profile(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserProfile>, UserDirectoryError> {
        Ok(self.state.lock().await.users.get(user_id).cloned())
    }

    async fn find_profiles(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<UserProfile>, UserDirectoryError> {
        let state = self.state.lock().await;
        Ok(user_ids
            .iter()
            .filter_map(|id| state.users.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl RoomRepository for InMemoryChatStore {
    async fn create_room_with_founder(&self, room: &NewRoom) -> Result<Room, RoomRepositoryError> {
        let mut state = self.state.lock().await;
        if state.rooms.contains_key(&room.id) {
            return Err(RoomRepositoryError::query(format!(
                "room {} already exists",
                room.id
            )));
        }

        let created_at = state.stamp(self.clock.utc());
        let created = Room {
            id: room.id,
            name: room.name.clone(),
            created_by: room.created_by.clone(),
            created_at,
        };
        state.rooms.insert(created.id, created.clone());
        state.members.insert(
            (created.id, created.created_by.clone()),
            Membership {
                room_id: created.id,
                user_id: created.created_by.clone(),
                role: Role::Administrator,
                is_muted: false,
                joined_at: created_at,
            },
        );
        Ok(created)
    }

    async fn list_rooms(&self) -> Result<Vec<RoomSummary>, RoomRepositoryError> {
        let state = self.state.lock().await;
        let mut counts: HashMap<RoomId, u64> = HashMap::new();
        for (room_id, _) in state.members.keys() {
            *counts.entry(*room_id).or_default() += 1;
        }

        let mut rooms: Vec<RoomSummary> = state
            .rooms
            .values()
            .map(|room| {
                let creator = state.users.get(&room.created_by);
                RoomSummary {
                    room: room.clone(),
                    creator_name: creator.map(|user| user.display_name.clone()),
                    creator_avatar: creator.and_then(|user| user.avatar_ref.clone()),
                    member_count: counts.get(&room.id).copied().unwrap_or_default(),
                }
            })
            .collect();
        rooms.sort_by(|a, b| b.room.created_at.cmp(&a.room.created_at));
        Ok(rooms)
    }
}

#[async_trait]
impl MembershipRepository for InMemoryChatStore {
    async fn create_membership(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        role: Role,
    ) -> Result<Membership, MembershipRepositoryError> {
        let mut state = self.state.lock().await;
        if !state.rooms.contains_key(room_id) {
            return Err(MembershipRepositoryError::room_not_found(room_id.to_string()));
        }
        let key = (*room_id, user_id.clone());
        if let Some(existing) = state.members.get(&key) {
            return Ok(existing.clone());
        }

        let joined_at = state.stamp(self.clock.utc());
        let membership = Membership {
            room_id: *room_id,
            user_id: user_id.clone(),
            role,
            is_muted: false,
            joined_at,
        };
        state.members.insert(key, membership.clone());
        Ok(membership)
    }

    async fn find_membership(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<Option<Membership>, MembershipRepositoryError> {
        let state = self.state.lock().await;
        Ok(state.members.get(&(*room_id, user_id.clone())).cloned())
    }

    async fn list_members(
        &self,
        room_id: &RoomId,
    ) -> Result<Vec<MemberProfile>, MembershipRepositoryError> {
        let state = self.state.lock().await;
        let mut members: Vec<MemberProfile> = state
            .members
            .values()
            .filter(|m| &m.room_id == room_id)
            .filter_map(|m| {
                state.users.get(&m.user_id).map(|profile| MemberProfile {
                    membership: m.clone(),
                    profile: profile.clone(),
                })
            })
            .collect();
        members.sort_by(|a, b| b.membership.joined_at.cmp(&a.membership.joined_at));
        Ok(members)
    }

    async fn set_role(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        role: Role,
    ) -> Result<Membership, MembershipRepositoryError> {
        let mut state = self.state.lock().await;
        let key = (*room_id, user_id.clone());
        let Some(current) = state.members.get(&key) else {
            return Err(MembershipRepositoryError::missing_membership(
                user_id.to_string(),
            ));
        };
        if role != Role::Administrator && state.is_sole_administrator(current) {
            return Err(MembershipRepositoryError::last_administrator(
                user_id.to_string(),
            ));
        }

        let Some(membership) = state.members.get_mut(&key) else {
            return Err(MembershipRepositoryError::missing_membership(
                user_id.to_string(),
            ));
        };
        membership.role = role;
        Ok(membership.clone())
    }

    async fn set_muted(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        is_muted: bool,
    ) -> Result<Membership, MembershipRepositoryError> {
        let mut state = self.state.lock().await;
        let membership = state
            .members
            .get_mut(&(*room_id, user_id.clone()))
            .ok_or_else(|| MembershipRepositoryError::missing_membership(user_id.to_string()))?;
        membership.is_muted = is_muted;
        Ok(membership.clone())
    }

    async fn remove_membership(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<bool, MembershipRepositoryError> {
        let mut state = self.state.lock().await;
        let key = (*room_id, user_id.clone());
        let Some(current) = state.members.get(&key) else {
            return Ok(false);
        };
        if state.is_sole_administrator(current) {
            return Err(MembershipRepositoryError::last_administrator(
                user_id.to_string(),
            ));
        }
        Ok(state.members.remove(&key).is_some())
    }
}

#[async_trait]
impl MessageRepository for InMemoryChatStore {
    async fn append(&self, message: &NewMessage) -> Result<Message, MessageRepositoryError> {
        let mut state = self.state.lock().await;
        let created_at = state.stamp(self.clock.utc());
        let stored = Message {
            id: message.id,
            channel: message.channel,
            sender_id: message.sender_id.clone(),
            content: message.content.clone(),
            created_at,
        };
        state.messages.push(stored.clone());
        Ok(stored)
    }

    async fn list_recent(
        &self,
        channel: Channel,
        limit: usize,
    ) -> Result<Vec<Message>, MessageRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .messages
            .iter()
            .rev()
            .filter(|m| m.channel == channel)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests;
