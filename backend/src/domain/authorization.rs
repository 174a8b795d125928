//! Authorization engine.
//!
//! Pure decisions over an actor snapshot and the membership row the caller
//! already loaded. Nothing here touches storage, so every rule is testable
//! with plain values. Denial is an ordinary return value; services convert
//! it to an [`Error`] at the boundary.

use serde_json::json;

use super::{Actor, Channel, Error, Membership, Role};

/// Reason an action was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Denial {
    /// The actor has no membership in the room.
    #[error("Not a member of this room")]
    NotAMember,
    /// The actor is a member but has been muted.
    #[error("You are muted in this room")]
    Muted,
    /// The actor's room role does not allow the action.
    #[error("Insufficient permissions")]
    InsufficientRole,
    /// The action needs the process-wide administrator flag.
    #[error("Only administrators can create rooms")]
    NotAdmin,
    /// The requested role cannot be granted through role updates.
    #[error("Invalid role")]
    RoleNotAssignable,
}

impl Denial {
    /// Machine-readable reason exposed in error details.
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotAMember => "not_a_member",
            Self::Muted => "muted",
            Self::InsufficientRole => "insufficient_role",
            Self::NotAdmin => "not_admin",
            Self::RoleNotAssignable => "invalid_role",
        }
    }
}

impl From<Denial> for Error {
    fn from(denial: Denial) -> Self {
        let message = denial.to_string();
        let error = match denial {
            Denial::Muted => Error::muted(message),
            Denial::RoleNotAssignable => Error::invalid_request(message),
            Denial::NotAMember | Denial::InsufficientRole | Denial::NotAdmin => {
                Error::forbidden(message)
            }
        };
        error.with_details(json!({ "code": denial.code() }))
    }
}

/// May the actor read `channel`, given their membership (if any)?
///
/// The global channel is open to every authenticated actor.
pub fn can_read(channel: Channel, membership: Option<&Membership>) -> Result<(), Denial> {
    match channel {
        Channel::Global => Ok(()),
        Channel::Room(_) => membership.map(|_| ()).ok_or(Denial::NotAMember),
    }
}

/// May the actor post to `channel`?
///
/// Room posts need a membership that is not muted.
pub fn can_post(channel: Channel, membership: Option<&Membership>) -> Result<(), Denial> {
    match channel {
        Channel::Global => Ok(()),
        Channel::Room(_) => match membership {
            None => Err(Denial::NotAMember),
            Some(member) if member.is_muted => Err(Denial::Muted),
            Some(_) => Ok(()),
        },
    }
}

/// May the actor kick, mute, or re-role members of the room?
pub fn can_administer(membership: Option<&Membership>) -> Result<(), Denial> {
    match membership {
        Some(member) if member.role.is_operator() => Ok(()),
        _ => Err(Denial::InsufficientRole),
    }
}

/// May the actor create rooms? Depends only on the process-wide flag.
pub fn can_create_room(actor: &Actor) -> Result<(), Denial> {
    if actor.is_admin {
        Ok(())
    } else {
        Err(Denial::NotAdmin)
    }
}

/// May an operator assign `target` through a role update?
///
/// Administrator is only ever seeded at room creation.
pub fn can_assign_role(target: Role) -> Result<(), Denial> {
    match target {
        Role::User | Role::Moderator => Ok(()),
        Role::Administrator => Err(Denial::RoleNotAssignable),
    }
}
