//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and depend only on the driving
//! ports, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureMessageCommand, FixtureMessageQuery, FixtureRoomCommand, FixtureRoomQuery,
    MessageCommand, MessageQuery, RoomCommand, RoomQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub rooms: Arc<dyn RoomCommand>,
    pub room_queries: Arc<dyn RoomQuery>,
    pub messages: Arc<dyn MessageCommand>,
    pub message_queries: Arc<dyn MessageQuery>,
}

impl HttpState {
    /// Bundle the room and messaging use-cases.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use roomchat::domain::ports::{
    ///     FixtureMessageCommand, FixtureMessageQuery, FixtureRoomCommand, FixtureRoomQuery,
    /// };
    /// use roomchat::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixtureRoomCommand),
    ///     Arc::new(FixtureRoomQuery),
    ///     Arc::new(FixtureMessageCommand),
    ///     Arc::new(FixtureMessageQuery),
    /// );
    /// let _rooms = state.rooms.clone();
    /// ```
    pub fn new(
        rooms: Arc<dyn RoomCommand>,
        room_queries: Arc<dyn RoomQuery>,
        messages: Arc<dyn MessageCommand>,
        message_queries: Arc<dyn MessageQuery>,
    ) -> Self {
        Self {
            rooms,
            room_queries,
            messages,
            message_queries,
        }
    }
}

impl Default for HttpState {
    /// State backed entirely by fixture ports.
    fn default() -> Self {
        Self::new(
            Arc::new(FixtureRoomCommand),
            Arc::new(FixtureRoomQuery),
            Arc::new(FixtureMessageCommand),
            Arc::new(FixtureMessageQuery),
        )
    }
}
