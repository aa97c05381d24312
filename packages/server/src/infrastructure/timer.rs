//! Phase timers.
//!
//! One timer task per room. Arming a room's timer aborts the previous one.
//! Every signal carries the `phase_seq` it was armed for so the receiver can
//! drop signals that arrive after the phase already moved on.

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at, sleep_until},
};

use crate::domain::RoomCode;

/// Receiver of timer signals.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TimerSink: Send + Sync + 'static {
    /// Called every tick with the whole seconds left in the phase.
    async fn on_tick(&self, code: RoomCode, seq: u64, remaining_secs: u64);

    /// Called once when the phase duration has elapsed.
    async fn on_expire(&self, code: RoomCode, seq: u64);
}

struct Armed {
    seq: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
pub struct PhaseTimer {
    tasks: Arc<Mutex<HashMap<RoomCode, Armed>>>,
}

impl PhaseTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the timer for `code`, replacing whatever was armed before.
    pub async fn arm(
        &self,
        sink: Arc<dyn TimerSink>,
        code: RoomCode,
        seq: u64,
        duration: Duration,
        tick: Duration,
    ) {
        // interval panics on a zero period
        let tick = tick.max(Duration::from_millis(1));
        let mut tasks = self.tasks.lock().await;

        let registry = self.tasks.clone();
        let task_code = code.clone();
        let handle = tokio::spawn(async move {
            let deadline = Instant::now() + duration;
            let mut ticker = interval_at(Instant::now() + tick, tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    _ = sleep_until(deadline) => break,
                    _ = ticker.tick() => {
                        let remaining = deadline.saturating_duration_since(Instant::now());
                        sink.on_tick(task_code.clone(), seq, remaining.as_secs_f64().round() as u64)
                            .await;
                    }
                }
            }

            // Detach before firing so the expiry handler can arm the next
            // phase without aborting this task.
            {
                let mut tasks = registry.lock().await;
                if tasks.get(&task_code).is_some_and(|armed| armed.seq == seq) {
                    tasks.remove(&task_code);
                }
            }
            tracing::debug!("Phase timer expired for room {} (seq {})", task_code, seq);
            sink.on_expire(task_code, seq).await;
        });

        if let Some(previous) = tasks.insert(code, Armed { seq, handle }) {
            previous.handle.abort();
        }
    }

    pub async fn cancel(&self, code: &RoomCode) {
        let mut tasks = self.tasks.lock().await;
        if let Some(armed) = tasks.remove(code) {
            armed.handle.abort();
        }
    }

    /// Abort every armed timer.
    pub async fn cancel_all(&self) {
        let mut tasks = self.tasks.lock().await;
        for (_, armed) in tasks.drain() {
            armed.handle.abort();
        }
    }

    /// Sequence number the room's live timer was armed for.
    pub async fn armed_seq(&self, code: &RoomCode) -> Option<u64> {
        let tasks = self.tasks.lock().await;
        tasks.get(code).map(|armed| armed.seq)
    }

    pub async fn active_count(&self) -> usize {
        let tasks = self.tasks.lock().await;
        tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn code() -> RoomCode {
        RoomCode::new("ABC123".to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_timer_fires_expire_with_seq() {
        // テスト項目: 期間経過後に armed 時の seq で on_expire が一度だけ呼ばれる
        // given (前提条件):
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sink = MockTimerSink::new();
        sink.expect_on_tick().returning(|_, _, _| ());
        sink.expect_on_expire()
            .times(1)
            .returning(move |code, seq| {
                let _ = tx.send((code, seq));
            });
        let timer = PhaseTimer::new();

        // when (操作):
        timer
            .arm(
                Arc::new(sink),
                code(),
                7,
                Duration::from_millis(50),
                Duration::from_millis(10),
            )
            .await;
        let fired = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(fired, Some((code(), 7)));
        assert_eq!(timer.armed_seq(&code()).await, None);
    }

    #[tokio::test]
    async fn test_timer_ticks_count_down() {
        // テスト項目: tick ごとに残り秒数が通知される
        // given (前提条件):
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sink = MockTimerSink::new();
        sink.expect_on_tick().returning(move |_, seq, remaining| {
            let _ = tx.send((seq, remaining));
        });
        sink.expect_on_expire().returning(|_, _| ());
        let timer = PhaseTimer::new();

        // when (操作):
        timer
            .arm(
                Arc::new(sink),
                code(),
                1,
                Duration::from_secs(3),
                Duration::from_millis(1000),
            )
            .await;
        let first = tokio::time::timeout(Duration::from_secs(3), rx.recv())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(first, Some((1, 2)));
        timer.cancel_all().await;
    }

    #[tokio::test]
    async fn test_rearm_replaces_previous_timer() {
        // テスト項目: 再 arm すると以前のタイマーは破棄され、新しい seq のみ発火する
        // given (前提条件):
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sink = MockTimerSink::new();
        sink.expect_on_tick().returning(|_, _, _| ());
        sink.expect_on_expire().returning(move |_, seq| {
            let _ = tx.send(seq);
        });
        let sink: Arc<dyn TimerSink> = Arc::new(sink);
        let timer = PhaseTimer::new();

        // when (操作):
        timer
            .arm(
                sink.clone(),
                code(),
                1,
                Duration::from_millis(40),
                Duration::from_millis(10),
            )
            .await;
        timer
            .arm(
                sink,
                code(),
                2,
                Duration::from_millis(80),
                Duration::from_millis(10),
            )
            .await;

        // then (期待する結果):
        let fired = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap();
        assert_eq!(fired, Some(2));
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_cancel_prevents_expire() {
        // テスト項目: キャンセルしたタイマーは発火しない
        // given (前提条件):
        let mut sink = MockTimerSink::new();
        sink.expect_on_tick().returning(|_, _, _| ());
        sink.expect_on_expire().times(0);
        let timer = PhaseTimer::new();
        timer
            .arm(
                Arc::new(sink),
                code(),
                1,
                Duration::from_millis(30),
                Duration::from_millis(10),
            )
            .await;

        // when (操作):
        timer.cancel(&code()).await;
        tokio::time::sleep(Duration::from_millis(80)).await;

        // then (期待する結果):
        assert_eq!(timer.active_count().await, 0);
    }
}
