//! Builders wiring storage adapters into the room and messaging services.

use std::sync::Arc;

use actix_web::web;

use roomchat::domain::ports::{
    MembershipRepository, MessageRepository, RoomRepository, UserDirectory,
};
use roomchat::domain::{MessagingService, RoomService};
use roomchat::inbound::http::state::HttpState;
use roomchat::outbound::persistence::{
    DieselMembershipRepository, DieselMessageRepository, DieselRoomRepository,
    DieselUserDirectory,
};

use super::Storage;

/// Storage adapters for every driven port.
struct Adapters<R, M, G, D> {
    rooms: Arc<R>,
    members: Arc<M>,
    messages: Arc<G>,
    directory: Arc<D>,
}

/// Build both services over one set of adapters so room and messaging
/// checks see the same memberships.
fn services_over<R, M, G, D>(adapters: Adapters<R, M, G, D>) -> HttpState
where
    R: RoomRepository + 'static,
    M: MembershipRepository + 'static,
    G: MessageRepository + 'static,
    D: UserDirectory + 'static,
{
    let Adapters {
        rooms,
        members,
        messages,
        directory,
    } = adapters;
    let room_service = Arc::new(RoomService::new(rooms, members.clone(), directory.clone()));
    let messaging_service = Arc::new(MessagingService::new(messages, members, directory));
    HttpState::new(
        room_service.clone(),
        room_service,
        messaging_service.clone(),
        messaging_service,
    )
}

/// Build the shared HTTP state for the configured storage.
pub(super) fn build_http_state(storage: &Storage) -> web::Data<HttpState> {
    let state = match storage {
        Storage::Memory(store) => services_over(Adapters {
            rooms: store.clone(),
            members: store.clone(),
            messages: store.clone(),
            directory: store.clone(),
        }),
        Storage::Postgres(pool) => services_over(Adapters {
            rooms: Arc::new(DieselRoomRepository::new(pool.clone())),
            members: Arc::new(DieselMembershipRepository::new(pool.clone())),
            messages: Arc::new(DieselMessageRepository::new(pool.clone())),
            directory: Arc::new(DieselUserDirectory::new(pool.clone())),
        }),
    };
    web::Data::new(state)
}
