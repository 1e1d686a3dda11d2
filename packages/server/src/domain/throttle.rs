//! スパム判定（短時間の連投によるミュート）の状態遷移
//!
//! 副作用を持たない純粋な状態機械。タイマーの実行や排他制御は
//! UseCase 層の `MuteTracker` が担当する。
//!
//! ```text
//! Fresh ──msg──▶ Counting(1) ──msg──▶ ... Counting(limit) ──msg──▶ Muted
//!   ▲                 │ quiet window elapsed                          │ cooldown elapsed
//!   └─────────────────┴───────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use super::AuthorName;

pub const DEFAULT_BURST_LIMIT: u32 = 3;
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_secs(2);
pub const DEFAULT_MUTE_COOLDOWN: Duration = Duration::from_secs(10);

/// スロットルの設定値
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottlePolicy {
    /// quiet window 内で受け付けるメッセージ数。これを超えた 1 通でミュートになる
    pub burst_limit: u32,
    /// 最後のメッセージからカウンタがリセットされるまでの時間
    pub quiet_window: Duration,
    /// ミュートが自動解除されるまでの時間
    pub mute_cooldown: Duration,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            burst_limit: DEFAULT_BURST_LIMIT,
            quiet_window: DEFAULT_QUIET_WINDOW,
            mute_cooldown: DEFAULT_MUTE_COOLDOWN,
        }
    }
}

/// 作者ごとのスロットル状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThrottleState {
    /// 記録なし（またはカウンタがリセット済み）
    #[default]
    Fresh,
    /// quiet window 内に受け付けたメッセージ数
    Counting(u32),
    /// ミュート中
    Muted { expires_at: Instant },
}

/// 1 通のメッセージに対する判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Accepted,
    /// 連投の閾値を超えた（この 1 通でミュートが始まった）
    RejectedSpam,
    /// すでにミュート中
    RejectedMuted,
}

impl AttemptOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, AttemptOutcome::Accepted)
    }
}

/// 遷移に伴って必要になるタイマー操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// 保留中のタイマーをそのまま残す
    Keep,
    /// 保留中のタイマーを取り消し、quiet window 後のカウンタリセットを予約する
    QuietReset(Duration),
    /// 保留中のタイマーを取り消し、cooldown 後のミュート解除を予約する
    MuteExpiry(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: ThrottleState,
    pub outcome: AttemptOutcome,
    pub timer: TimerAction,
}

impl ThrottleState {
    /// メッセージを 1 通受け取ったときの遷移
    ///
    /// 閾値の比較はカウントを増やす前に行うため、`burst_limit + 1` 通目でミュートになる。
    pub fn on_attempt(self, policy: &ThrottlePolicy, now: Instant) -> Transition {
        match self {
            ThrottleState::Fresh => Transition {
                next: ThrottleState::Counting(1),
                outcome: AttemptOutcome::Accepted,
                timer: TimerAction::QuietReset(policy.quiet_window),
            },
            ThrottleState::Counting(sent) if sent >= policy.burst_limit => Transition {
                next: ThrottleState::Muted {
                    expires_at: now + policy.mute_cooldown,
                },
                outcome: AttemptOutcome::RejectedSpam,
                timer: TimerAction::MuteExpiry(policy.mute_cooldown),
            },
            ThrottleState::Counting(sent) => Transition {
                next: ThrottleState::Counting(sent + 1),
                outcome: AttemptOutcome::Accepted,
                timer: TimerAction::QuietReset(policy.quiet_window),
            },
            muted @ ThrottleState::Muted { .. } => Transition {
                next: muted,
                outcome: AttemptOutcome::RejectedMuted,
                timer: TimerAction::Keep,
            },
        }
    }

    /// quiet window が経過した（ミュート中は何もしない）
    pub fn on_quiet_window_elapsed(self) -> Self {
        match self {
            ThrottleState::Counting(_) => ThrottleState::Fresh,
            other => other,
        }
    }

    /// cooldown が経過した（ミュート解除とカウンタのリセットを同時に行う）
    pub fn on_mute_expired(self) -> Self {
        match self {
            ThrottleState::Muted { .. } => ThrottleState::Fresh,
            other => other,
        }
    }

    pub fn is_muted(&self) -> bool {
        matches!(self, ThrottleState::Muted { .. })
    }

    pub fn mute_expires_at(&self) -> Option<Instant> {
        match self {
            ThrottleState::Muted { expires_at } => Some(*expires_at),
            _ => None,
        }
    }

    /// quiet window 内に受け付けたメッセージ数
    pub fn sent_count(&self) -> u32 {
        match self {
            ThrottleState::Counting(sent) => *sent,
            _ => 0,
        }
    }
}

/// ミュートの開始と解除の通知先
///
/// どちらも `MuteTracker` が作者のロックを保持したまま呼ぶため、
/// 同じ作者に対する呼び出しは開始 → 解除の順に直列化される。
#[async_trait]
pub trait MuteObserver: Send + Sync {
    async fn on_muted(&self, author: &AuthorName);
    async fn on_mute_lifted(&self, author: &AuthorName);
}
