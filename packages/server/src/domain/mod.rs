//! Domain layer: value objects, entities, the spam throttle state machine,
//! and the collaborator traits implemented by the infrastructure layer.

pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod repository;
pub mod throttle;
pub mod value_object;

pub use entity::{Message, NewMessage, User};
pub use error::{MessagePushError, RepositoryError, StoreError, ValueObjectError};
pub use event::OutboundEvent;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{MessageStore, UserRepository};
pub use throttle::{
    AttemptOutcome, MuteObserver, ThrottlePolicy, ThrottleState, TimerAction, Transition,
};
pub use value_object::{
    AccessToken, AuthorId, AuthorName, ConnectionId, MessageId, MessageText, Timestamp,
};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
#[cfg(test)]
pub use repository::{MockMessageStore, MockUserRepository};
