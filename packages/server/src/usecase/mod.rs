//! UseCase layer: the Mute Tracker service and one use case per chat operation.

mod connect_participant;
mod disconnect_participant;
mod error;
mod get_message_history;
mod lift_mute;
mod mute_tracker;
mod notify_typing;
mod register_user;
mod send_message;

pub use connect_participant::{ConnectParticipantUseCase, ConnectedSession};
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ConnectError, GetMessageHistoryError, RegisterUserError, SendMessageError};
pub use get_message_history::GetMessageHistoryUseCase;
pub use lift_mute::LiftMuteUseCase;
pub use mute_tracker::MuteTracker;
pub use notify_typing::NotifyTypingUseCase;
pub use register_user::RegisterUserUseCase;
pub use send_message::{SendMessageUseCase, SendOutcome};
