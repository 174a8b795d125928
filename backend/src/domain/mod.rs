//! Domain primitives, authorization rules, and use-case services.
//!
//! Purpose: define strongly typed chat entities shared by the HTTP adapter
//! and the storage adapters, plus the services that implement the driving
//! ports. Nothing in this module knows about HTTP or SQL.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Room, Membership, Message and friends: the chat aggregates.
//! - authorization: the pure permission checks.
//! - RoomService / MessagingService: driving port implementations.

pub mod authorization;
pub mod error;
pub mod membership;
pub mod message;
pub mod ports;
pub mod room;
pub mod trace_id;
pub mod user;

mod messaging_service;
mod room_service;
mod service_support;

pub use self::authorization::Denial;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::membership::{MemberAction, MemberProfile, Membership, Role, RoleParseError};
pub use self::message::{
    Channel, MESSAGE_CONTENT_MAX, MESSAGE_HISTORY_LIMIT, Message, MessageContent, MessageId,
    MessageValidationError, MessageView, NewMessage, SenderProfile,
};
pub use self::messaging_service::MessagingService;
pub use self::room::{ROOM_NAME_MAX, Room, RoomId, RoomName, RoomSummary, RoomValidationError};
pub use self::room_service::RoomService;
pub use self::trace_id::TraceId;
pub use self::user::{
    Actor, DISPLAY_NAME_MAX, DisplayName, UserId, UserProfile, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use roomchat::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
