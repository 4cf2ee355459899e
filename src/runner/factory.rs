use crate::runner::types::TestOutcome;
use chrono::{DateTime, Utc};

/// 结果工厂，决定执行器广播的结果类型
///
/// 执行器只负责分类和计时，结果的具体形态由工厂决定。
/// pass 一定发生在测试主体完成后，因此两个时间戳都存在；
/// fail/error 可能发生在计时开始之前
pub trait ResultFactory {
    type Outcome;

    fn pass(&self, name: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Self::Outcome;

    fn fail(
        &self,
        name: &str,
        message: String,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self::Outcome;

    fn error(
        &self,
        name: &str,
        cause: anyhow::Error,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self::Outcome;
}

/// 默认工厂，产出 [`TestOutcome`]
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardResultFactory;

impl ResultFactory for StandardResultFactory {
    type Outcome = TestOutcome;

    fn pass(&self, name: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> TestOutcome {
        TestOutcome::pass(name, start, end)
    }

    fn fail(
        &self,
        name: &str,
        message: String,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> TestOutcome {
        TestOutcome::fail(name, message, start, end)
    }

    fn error(
        &self,
        name: &str,
        cause: anyhow::Error,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> TestOutcome {
        TestOutcome::error(name, cause, start, end)
    }
}
