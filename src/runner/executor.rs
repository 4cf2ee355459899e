use crate::runner::factory::ResultFactory;
use crate::runner::lifecycle::{IntegrationTest, Phase, TestFailure};
use crate::runner::listener::ListenerSet;
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// 名称获取失败时使用的占位名称
pub const UNKNOWN_TEST_NAME: &str = "<unknown>";

/// 测试主体计时
#[derive(Debug, Default, Clone, Copy)]
struct Timing {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl Timing {
    /// 广播前调用：已开始但未结束时补上结束时间
    fn settle(&mut self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        if self.start.is_some() && self.end.is_none() {
            self.end = Some(Utc::now());
        }
        (self.start, self.end)
    }
}

/// 阶段判定，尚未交给工厂
enum Verdict {
    Pass {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    Fail(String),
    Error(anyhow::Error),
}

/// 执行单个测试并广播结果
///
/// 保证：
/// - 恰好广播一个主结果（Pass / Fail / Error）
/// - `cleanup` 总会被调用一次；失败时额外广播一个 Error
/// - 测试的任何错误或 panic 都不会逃逸到调用方
///
/// 监听器自身的 panic 不做隔离：cleanup 完成后原样重新抛出给调用方
pub fn execute<T, F>(test: &mut T, factory: &F, listeners: &ListenerSet<F::Outcome>)
where
    T: IntegrationTest + ?Sized,
    F: ResultFactory + ?Sized,
{
    let mut timing = Timing::default();

    let (name, verdict) = match guarded(|| test.name()) {
        Ok(name) => {
            let verdict = run_phases(test, &name, &mut timing);
            (name, verdict)
        }
        Err(panic_message) => {
            tracing::debug!(phase = %Phase::Name, %panic_message, "test name unavailable");
            (
                UNKNOWN_TEST_NAME.to_string(),
                Verdict::Error(anyhow!("test name panicked: {}", panic_message)),
            )
        }
    };

    // 监听器 panic 时仍要执行 cleanup，结束后再重新抛出
    let broadcast_panic = panic::catch_unwind(AssertUnwindSafe(|| {
        publish(factory, listeners, &name, verdict, &mut timing)
    }))
    .err();

    tracing::trace!(test = %name, phase = %Phase::Cleanup, "entering phase");
    let cleanup_failure = match guarded(|| test.cleanup()) {
        Ok(Ok(())) => None,
        Ok(Err(err)) => Some(err.context("cleanup failed")),
        Err(panic_message) => Some(anyhow!("cleanup panicked: {}", panic_message)),
    };

    let cleanup_panic = cleanup_failure.and_then(|cause| {
        tracing::debug!(test = %name, phase = %Phase::Cleanup, cause = %format!("{:#}", cause), "phase failed");
        panic::catch_unwind(AssertUnwindSafe(|| {
            publish(factory, listeners, &name, Verdict::Error(cause), &mut timing)
        }))
        .err()
    });

    if let Some(payload) = broadcast_panic.or(cleanup_panic) {
        panic::resume_unwind(payload);
    }
}

/// setup + test 两个阶段
fn run_phases<T>(test: &mut T, name: &str, timing: &mut Timing) -> Verdict
where
    T: IntegrationTest + ?Sized,
{
    tracing::trace!(test = %name, phase = %Phase::Setup, "entering phase");
    let setup_failure = match guarded(|| test.setup()) {
        Ok(Ok(())) => None,
        Ok(Err(err)) => Some(err.context("setup failed")),
        Err(panic_message) => Some(anyhow!("setup panicked: {}", panic_message)),
    };

    if let Some(cause) = setup_failure {
        tracing::debug!(test = %name, phase = %Phase::Setup, cause = %format!("{:#}", cause), "phase failed");
        return Verdict::Error(cause);
    }

    tracing::trace!(test = %name, phase = %Phase::Test, "entering phase");
    let start = Utc::now();
    timing.start = Some(start);

    let result = guarded(|| test.test());

    let end = Utc::now();
    timing.end = Some(end);

    match result {
        Ok(Ok(())) => Verdict::Pass { start, end },
        Ok(Err(TestFailure::Assertion(message))) => Verdict::Fail(message),
        Ok(Err(TestFailure::Fault(cause))) => {
            tracing::debug!(test = %name, phase = %Phase::Test, cause = %format!("{:#}", cause), "phase failed");
            Verdict::Error(cause)
        }
        // assert! 系列宏以 panic 报告失败，按断言处理
        Err(panic_message) => Verdict::Fail(panic_message),
    }
}

fn publish<F>(
    factory: &F,
    listeners: &ListenerSet<F::Outcome>,
    name: &str,
    verdict: Verdict,
    timing: &mut Timing,
) where
    F: ResultFactory + ?Sized,
{
    let (start, end) = timing.settle();

    let outcome = match verdict {
        Verdict::Pass { start, end } => factory.pass(name, start, end),
        Verdict::Fail(message) => factory.fail(name, message, start, end),
        Verdict::Error(cause) => factory.error(name, cause, start, end),
    };

    listeners.broadcast(&outcome);
}

/// 运行闭包并捕获 panic，返回 panic 消息
fn guarded<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(panic_message)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// 持有工厂和监听器的执行器，可重复使用
pub struct TestExecutor<F: ResultFactory> {
    factory: Arc<F>,
    listeners: Arc<ListenerSet<F::Outcome>>,
}

impl<F: ResultFactory> TestExecutor<F> {
    pub fn new(factory: F, listeners: ListenerSet<F::Outcome>) -> Self {
        Self {
            factory: Arc::new(factory),
            listeners: Arc::new(listeners),
        }
    }

    /// 同步执行单个测试
    pub fn execute<T>(&self, test: &mut T)
    where
        T: IntegrationTest + ?Sized,
    {
        execute(test, self.factory.as_ref(), &self.listeners);
    }

    /// 包装为可交给调度器的任务
    pub fn task(&self, test: Box<dyn IntegrationTest + Send>) -> TestExecutorTask<F> {
        TestExecutorTask::new(test, self.factory.clone(), self.listeners.clone())
    }
}

impl<F: ResultFactory> Clone for TestExecutor<F> {
    fn clone(&self) -> Self {
        Self {
            factory: self.factory.clone(),
            listeners: self.listeners.clone(),
        }
    }
}

/// 单次执行任务，拥有测试实例，执行后即丢弃
pub struct TestExecutorTask<F: ResultFactory> {
    test: Box<dyn IntegrationTest + Send>,
    factory: Arc<F>,
    listeners: Arc<ListenerSet<F::Outcome>>,
}

impl<F: ResultFactory> TestExecutorTask<F> {
    pub fn new(
        test: Box<dyn IntegrationTest + Send>,
        factory: Arc<F>,
        listeners: Arc<ListenerSet<F::Outcome>>,
    ) -> Self {
        Self {
            test,
            factory,
            listeners,
        }
    }

    /// 在当前线程执行
    pub fn run(mut self) {
        execute(&mut *self.test, self.factory.as_ref(), &self.listeners);
    }
}

impl<F> TestExecutorTask<F>
where
    F: ResultFactory + Send + Sync + 'static,
    F::Outcome: 'static,
{
    /// 在 tokio 阻塞线程池上执行，需要在 runtime 内调用
    ///
    /// 不设超时；需要超时的调用方可以用 `tokio::time::timeout` 包住返回的句柄
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::task::spawn_blocking(move || self.run())
    }
}
