use crate::runner::types::{OutcomeRecord, OutcomeStatus, TestOutcome};
use std::sync::{Arc, Mutex};

/// 结果监听器
pub trait Listener<O> {
    fn notify(&self, outcome: &O);
}

impl<O, F> Listener<O> for F
where
    F: Fn(&O),
{
    fn notify(&self, outcome: &O) {
        self(outcome)
    }
}

/// 有序监听器列表
///
/// 按注册顺序同步调用；同一个监听器可以注册多次。
/// 监听器 panic 不会被隔离，会直接传播给调用方
pub struct ListenerSet<O> {
    listeners: Vec<Box<dyn Listener<O> + Send + Sync>>,
}

impl<O> ListenerSet<O> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// 注册监听器（追加到末尾）
    pub fn register<L>(&mut self, listener: L)
    where
        L: Listener<O> + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// 链式注册
    pub fn with<L>(mut self, listener: L) -> Self
    where
        L: Listener<O> + Send + Sync + 'static,
    {
        self.register(listener);
        self
    }

    /// 依次通知所有监听器
    pub fn broadcast(&self, outcome: &O) {
        for listener in &self.listeners {
            listener.notify(outcome);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<O> Default for ListenerSet<O> {
    fn default() -> Self {
        Self::new()
    }
}

/// 收集所有结果快照，克隆后共享同一份存储
#[derive(Debug, Clone, Default)]
pub struct CollectingListener {
    records: Arc<Mutex<Vec<OutcomeRecord>>>,
}

impl CollectingListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前已收集的结果（按到达顺序）
    pub fn records(&self) -> Vec<OutcomeRecord> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Listener<TestOutcome> for CollectingListener {
    fn notify(&self, outcome: &TestOutcome) {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(outcome.to_record());
    }
}

/// 通过 tracing 输出每个结果
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingListener;

impl Listener<TestOutcome> for LoggingListener {
    fn notify(&self, outcome: &TestOutcome) {
        let duration_ms = outcome.duration_ms();

        match &outcome.status {
            OutcomeStatus::Pass => {
                tracing::info!(test = %outcome.name, ?duration_ms, "test passed");
            }
            OutcomeStatus::Fail { message } => {
                tracing::warn!(test = %outcome.name, ?duration_ms, %message, "test failed");
            }
            OutcomeStatus::Error { cause } => {
                tracing::warn!(
                    test = %outcome.name,
                    ?duration_ms,
                    cause = %format!("{:#}", cause),
                    "test errored"
                );
            }
        }
    }
}
