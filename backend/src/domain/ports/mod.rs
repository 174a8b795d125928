//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`UserDirectory`]) describe what the domain
//! needs from storage. Driving ports (`*Command`, `*Query`) are the use-cases
//! inbound adapters call. Each comes with a `Fixture*` implementation and,
//! under test, a mockall mock.

mod macros;
pub(crate) use macros::define_port_error;

mod membership_repository;
mod message_command;
mod message_query;
mod message_repository;
mod room_command;
mod room_query;
mod room_repository;
mod user_directory;

#[cfg(test)]
pub use membership_repository::MockMembershipRepository;
pub use membership_repository::{
    FixtureMembershipRepository, MembershipRepository, MembershipRepositoryError,
};
#[cfg(test)]
pub use message_command::MockMessageCommand;
pub use message_command::{
    FixtureMessageCommand, MessageCommand, PostMessageRequest, PostMessageResponse,
};
#[cfg(test)]
pub use message_query::MockMessageQuery;
pub use message_query::{
    FetchRecentRequest, FetchRecentResponse, FixtureMessageQuery, MessageQuery,
};
#[cfg(test)]
pub use message_repository::MockMessageRepository;
pub use message_repository::{
    FixtureMessageRepository, MessageRepository, MessageRepositoryError,
};
#[cfg(test)]
pub use room_command::MockRoomCommand;
pub use room_command::{
    AdministerMemberRequest, AdministerMemberResponse, CreateRoomRequest, CreateRoomResponse,
    FixtureRoomCommand, JoinRoomRequest, JoinRoomResponse, RoomCommand,
};
#[cfg(test)]
pub use room_query::MockRoomQuery;
pub use room_query::{
    FixtureRoomQuery, ListMembersRequest, ListMembersResponse, ListRoomsRequest,
    ListRoomsResponse, RoomQuery,
};
#[cfg(test)]
pub use room_repository::MockRoomRepository;
pub use room_repository::{FixtureRoomRepository, NewRoom, RoomRepository, RoomRepositoryError};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{FixtureUserDirectory, UserDirectory, UserDirectoryError};
