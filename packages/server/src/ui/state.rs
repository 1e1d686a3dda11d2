//! Shared application state.

use std::sync::Arc;

use murmur_shared::time::Clock;

use crate::{
    domain::{MessagePusher, MessageStore, ThrottlePolicy, UserRepository},
    infrastructure::message_pusher::WebSocketMessagePusher,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, GetMessageHistoryUseCase,
        LiftMuteUseCase, MuteTracker, NotifyTypingUseCase, RegisterUserUseCase,
        SendMessageUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// ConnectParticipantUseCase（参加者接続のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// NotifyTypingUseCase（入力中通知のユースケース）
    pub notify_typing_usecase: Arc<NotifyTypingUseCase>,
    /// GetMessageHistoryUseCase（履歴取得のユースケース）
    pub get_message_history_usecase: Arc<GetMessageHistoryUseCase>,
    /// RegisterUserUseCase（ユーザー登録のユースケース）
    pub register_user_usecase: Arc<RegisterUserUseCase>,
    /// MessagePusher（接続数の取得に使用）
    pub message_pusher: Arc<dyn MessagePusher>,
    /// 接続ごとの送信キューの容量
    pub queue_capacity: usize,
}

impl AppState {
    /// Wire every use case on top of the given storage backends.
    ///
    /// Dependencies are created in order:
    /// 1. MessagePusher (connection registry)
    /// 2. LiftMuteUseCase and the MuteTracker that calls it on expiry
    /// 3. The remaining use cases
    pub fn build(
        store: Arc<dyn MessageStore>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
        policy: ThrottlePolicy,
        queue_capacity: usize,
    ) -> Self {
        // 1. Create MessagePusher (WebSocket implementation)
        let message_pusher: Arc<dyn MessagePusher> = Arc::new(WebSocketMessagePusher::new());

        // 2. Create MuteTracker
        let lift_mute_usecase = Arc::new(LiftMuteUseCase::new(
            users.clone(),
            message_pusher.clone(),
        ));
        let mute_tracker = Arc::new(MuteTracker::new(policy, lift_mute_usecase));

        // 3. Create UseCases
        let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
            store.clone(),
            users.clone(),
            message_pusher.clone(),
        ));
        let disconnect_participant_usecase =
            Arc::new(DisconnectParticipantUseCase::new(message_pusher.clone()));
        let send_message_usecase = Arc::new(SendMessageUseCase::new(
            store.clone(),
            message_pusher.clone(),
            mute_tracker,
            clock.clone(),
        ));
        let notify_typing_usecase = Arc::new(NotifyTypingUseCase::new(message_pusher.clone()));
        let get_message_history_usecase = Arc::new(GetMessageHistoryUseCase::new(store));
        let register_user_usecase = Arc::new(RegisterUserUseCase::new(users, clock));

        Self {
            connect_participant_usecase,
            disconnect_participant_usecase,
            send_message_usecase,
            notify_typing_usecase,
            get_message_history_usecase,
            register_user_usecase,
            message_pusher,
            queue_capacity,
        }
    }
}
