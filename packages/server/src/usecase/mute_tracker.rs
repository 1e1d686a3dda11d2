//! UseCase: 作者ごとの連投判定とミュート管理
//!
//! ## 排他制御
//!
//! - 作者ごとに `Mutex` を持ち、同じ作者の判定（check-then-act）を直列化する
//! - 作者の一覧（`slots`）のロックはスロットの取得時だけ保持する。
//!   異なる作者の判定は互いをブロックしない
//!
//! ## タイマー
//!
//! 作者ごとに保留中のタイマーは高々 1 つ。新しい遷移は前のタイマーを abort し、
//! epoch を進める。タイマーは発火時に作者のロックを取り、epoch が一致するときだけ効果を適用する。
//!
//! タイマーで `Fresh` に戻ったスロットは、他に保持者がいなければ一覧から取り除く。
//! ロックの順序は常に「作者 → 一覧」か「一覧のみ」で、一覧を保持したまま作者のロックは待たない。

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{sync::Mutex, task::JoinHandle, time::Instant};

use crate::domain::{
    AttemptOutcome, AuthorName, MuteObserver, ThrottlePolicy, ThrottleState, TimerAction,
};

#[derive(Default)]
struct AuthorSlot {
    state: ThrottleState,
    /// 予約済みタイマーの世代
    epoch: u64,
    timer: Option<JoinHandle<()>>,
}

type SharedSlot = Arc<Mutex<AuthorSlot>>;
type SlotMap = Arc<Mutex<HashMap<AuthorName, SharedSlot>>>;

#[derive(Debug, Clone, Copy)]
enum TimerKind {
    QuietReset,
    MuteExpiry,
}

/// 作者ごとのスパム判定サービス
pub struct MuteTracker {
    policy: ThrottlePolicy,
    slots: SlotMap,
    observer: Arc<dyn MuteObserver>,
}

impl MuteTracker {
    /// 新しい MuteTracker を作成
    ///
    /// `observer` はミュートの開始時と自動解除時に呼ばれる。
    pub fn new(policy: ThrottlePolicy, observer: Arc<dyn MuteObserver>) -> Self {
        Self {
            policy,
            slots: Arc::new(Mutex::new(HashMap::new())),
            observer,
        }
    }

    /// メッセージ 1 通分の判定を行い、状態とタイマーを更新する
    pub async fn record_attempt(&self, author: &AuthorName) -> AttemptOutcome {
        let slot = self.slot(author).await;
        let mut guard = slot.lock().await;

        let transition = guard.state.on_attempt(&self.policy, Instant::now());
        guard.state = transition.next;

        match transition.timer {
            TimerAction::Keep => {}
            TimerAction::QuietReset(delay) => {
                self.schedule(&slot, &mut guard, author, TimerKind::QuietReset, delay)
            }
            TimerAction::MuteExpiry(delay) => {
                tracing::info!(
                    "Author '{}' muted for {} ms",
                    author,
                    delay.as_millis()
                );
                self.schedule(&slot, &mut guard, author, TimerKind::MuteExpiry, delay);
                // 解除タイマーは作者のロックを待つので、開始の通知が必ず先に完了する
                self.observer.on_muted(author).await;
            }
        }

        tracing::debug!(
            "Throttle decision for '{}': {:?} (state: {:?})",
            author,
            transition.outcome,
            guard.state
        );

        transition.outcome
    }

    /// 作者が現在ミュート中か
    pub async fn is_muted(&self, author: &AuthorName) -> bool {
        self.state_of(author).await.is_muted()
    }

    /// 作者の現在の状態（記録がなければ `Fresh`）
    pub async fn state_of(&self, author: &AuthorName) -> ThrottleState {
        let slot = {
            let slots = self.slots.lock().await;
            slots.get(author).cloned()
        };
        match slot {
            Some(slot) => slot.lock().await.state,
            None => ThrottleState::Fresh,
        }
    }

    /// 状態を保持している作者の数
    pub async fn tracked_authors(&self) -> usize {
        self.slots.lock().await.len()
    }

    async fn slot(&self, author: &AuthorName) -> SharedSlot {
        let mut slots = self.slots.lock().await;
        Arc::clone(slots.entry(author.clone()).or_default())
    }

    fn schedule(
        &self,
        slot: &SharedSlot,
        guard: &mut AuthorSlot,
        author: &AuthorName,
        kind: TimerKind,
        delay: Duration,
    ) {
        if let Some(previous) = guard.timer.take() {
            previous.abort();
        }
        guard.epoch += 1;

        let epoch = guard.epoch;
        let slot = Arc::clone(slot);
        let slots = Arc::clone(&self.slots);
        let author = author.clone();
        let observer = Arc::clone(&self.observer);

        guard.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let mut guard = slot.lock().await;
            if guard.epoch != epoch {
                // superseded by a newer transition
                return;
            }
            guard.timer = None;

            match kind {
                TimerKind::QuietReset => {
                    guard.state = guard.state.on_quiet_window_elapsed();
                    tracing::debug!("Quiet window elapsed for '{}', counter reset", author);
                }
                TimerKind::MuteExpiry => {
                    if !guard.state.is_muted() {
                        return;
                    }
                    guard.state = guard.state.on_mute_expired();
                    tracing::info!("Mute lifted for '{}'", author);
                    // 作者のロックを保持したまま通知し、解除より後の判定と順序を揃える
                    observer.on_mute_lifted(&author).await;
                }
            }

            if guard.state == ThrottleState::Fresh {
                let mut slots = slots.lock().await;
                // 一覧とこのタスク以外に保持者がいなければ、判定待ちの呼び出しもない
                if Arc::strong_count(&slot) == 2 {
                    slots.remove(&author);
                    tracing::debug!("Released throttle state for '{}'", author);
                }
            }
        }));
    }
}
