use std::fmt;

/// 测试主体的失败类型
///
/// - `Assertion`: 预期条件不成立，只携带可读消息
/// - `Fault`: 其它任何意外错误，保留完整的错误链
#[derive(Debug, thiserror::Error)]
pub enum TestFailure {
    #[error("{0}")]
    Assertion(String),

    #[error(transparent)]
    Fault(#[from] anyhow::Error),
}

impl TestFailure {
    /// 构造断言失败
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion(message.into())
    }

    /// 将任意错误包装为 Fault
    pub fn fault<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Fault(anyhow::Error::new(err))
    }

    pub fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion(_))
    }
}

/// 条件不成立时返回断言失败
///
/// ```
/// use diagrun::runner::{TestFailure, ensure};
///
/// fn check(actual: i32) -> Result<(), TestFailure> {
///     ensure(actual == 5, format!("expected 5 got {}", actual))?;
///     Ok(())
/// }
///
/// assert!(check(5).is_ok());
/// assert!(check(3).unwrap_err().is_assertion());
/// ```
pub fn ensure(condition: bool, message: impl Into<String>) -> Result<(), TestFailure> {
    if condition {
        Ok(())
    } else {
        Err(TestFailure::assertion(message))
    }
}

/// 一个可执行的诊断测试
///
/// 执行器按 `name` → `setup` → `test` → `cleanup` 的顺序调用，
/// 无论前面的阶段是否失败，`cleanup` 总会被调用一次
pub trait IntegrationTest {
    /// 测试名称，用于标记结果
    fn name(&self) -> String;

    /// 准备测试环境，失败视为环境错误
    fn setup(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// 测试主体
    ///
    /// 返回 `TestFailure::Assertion` 或 panic（如 `assert!`）记为 Fail；
    /// 意外错误应返回 `TestFailure::Fault` 记为 Error，
    /// 不要用 `unwrap()` 之类的 panic 表达，否则同样会被记为 Fail
    fn test(&mut self) -> Result<(), TestFailure>;

    /// 清理资源
    fn cleanup(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl<T: IntegrationTest + ?Sized> IntegrationTest for Box<T> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn setup(&mut self) -> anyhow::Result<()> {
        (**self).setup()
    }

    fn test(&mut self) -> Result<(), TestFailure> {
        (**self).test()
    }

    fn cleanup(&mut self) -> anyhow::Result<()> {
        (**self).cleanup()
    }
}

/// 生命周期阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Name,
    Setup,
    Test,
    Cleanup,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Setup => "setup",
            Self::Test => "test",
            Self::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
