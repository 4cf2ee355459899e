use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// 结果类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Pass,
    Fail,
    Error,
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 结果状态
#[derive(Debug)]
pub enum OutcomeStatus {
    Pass,

    /// 断言失败，只有消息
    Fail { message: String },

    /// 意外错误，保留完整错误链
    Error { cause: anyhow::Error },
}

/// 单次执行的结果
#[derive(Debug)]
pub struct TestOutcome {
    /// 测试名称
    pub name: String,

    /// 测试主体开始时间（setup 失败时为空）
    pub started_at: Option<DateTime<Utc>>,

    /// 测试主体结束时间
    pub finished_at: Option<DateTime<Utc>>,

    pub status: OutcomeStatus,
}

impl TestOutcome {
    pub fn pass(name: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            started_at: Some(start),
            finished_at: Some(end),
            status: OutcomeStatus::Pass,
        }
    }

    pub fn fail(
        name: impl Into<String>,
        message: impl Into<String>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            name: name.into(),
            started_at: start,
            finished_at: end,
            status: OutcomeStatus::Fail {
                message: message.into(),
            },
        }
    }

    pub fn error(
        name: impl Into<String>,
        cause: anyhow::Error,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            name: name.into(),
            started_at: start,
            finished_at: end,
            status: OutcomeStatus::Error { cause },
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self.status {
            OutcomeStatus::Pass => OutcomeKind::Pass,
            OutcomeStatus::Fail { .. } => OutcomeKind::Fail,
            OutcomeStatus::Error { .. } => OutcomeKind::Error,
        }
    }

    /// 断言消息或错误链（`a: b: c` 形式）
    pub fn message(&self) -> Option<String> {
        match &self.status {
            OutcomeStatus::Pass => None,
            OutcomeStatus::Fail { message } => Some(message.clone()),
            OutcomeStatus::Error { cause } => Some(format!("{:#}", cause)),
        }
    }

    /// 测试主体耗时，两个时间戳都存在时才有值
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => (end - start).to_std().ok(),
            _ => None,
        }
    }

    /// 耗时毫秒数，超出 u64 时取上限
    pub fn duration_ms(&self) -> Option<u64> {
        self.duration()
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    /// 转换为可序列化、可克隆的记录
    pub fn to_record(&self) -> OutcomeRecord {
        OutcomeRecord {
            name: self.name.clone(),
            kind: self.kind(),
            message: self.message(),
            started_at: self.started_at,
            finished_at: self.finished_at,
            duration_ms: self.duration_ms(),
        }
    }
}

/// 结果快照（用于收集和 JSON 输出）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub name: String,
    pub kind: OutcomeKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// 测试摘要
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub total_duration: Duration,
}

impl TestSummary {
    pub fn from_records(records: &[OutcomeRecord]) -> Self {
        let count = |kind: OutcomeKind| records.iter().filter(|r| r.kind == kind).count();
        let total_duration = records
            .iter()
            .filter_map(|r| r.duration_ms)
            .map(Duration::from_millis)
            .sum();

        Self {
            total: records.len(),
            passed: count(OutcomeKind::Pass),
            failed: count(OutcomeKind::Fail),
            errored: count(OutcomeKind::Error),
            total_duration,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_outcome_duration() {
        let start = Utc::now();
        let end = start + TimeDelta::milliseconds(250);

        let outcome = TestOutcome::pass("T1", start, end);
        assert_eq!(outcome.kind(), OutcomeKind::Pass);
        assert_eq!(outcome.duration(), Some(Duration::from_millis(250)));
        assert_eq!(outcome.duration_ms(), Some(250));

        let outcome = TestOutcome::error("T3", anyhow::anyhow!("boom"), None, None);
        assert_eq!(outcome.duration(), None);
        assert_eq!(outcome.duration_ms(), None);
    }

    #[test]
    fn test_duration_ms_for_long_runs() {
        let start = Utc::now();
        let end = start + TimeDelta::days(365 * 100);
        let outcome = TestOutcome::pass("long", start, end);

        assert_eq!(
            outcome.duration_ms(),
            Some(TimeDelta::days(365 * 100).num_milliseconds() as u64)
        );
    }

    #[test]
    fn test_error_message_includes_chain() {
        let cause = anyhow::anyhow!("connection refused").context("setup failed");
        let outcome = TestOutcome::error("T3", cause, None, None);

        assert_eq!(
            outcome.message().as_deref(),
            Some("setup failed: connection refused")
        );
    }

    #[test]
    fn test_record_serialization() {
        let outcome = TestOutcome::fail("T2", "expected 5 got 3", None, None);
        let json = serde_json::to_value(outcome.to_record()).unwrap();

        assert_eq!(json["name"], "T2");
        assert_eq!(json["kind"], "fail");
        assert_eq!(json["message"], "expected 5 got 3");
        assert!(json["started_at"].is_null());
        assert!(json.get("duration_ms").is_none());
    }

    #[test]
    fn test_summary_counts() {
        let start = Utc::now();
        let records = vec![
            TestOutcome::pass("a", start, start + TimeDelta::milliseconds(100)).to_record(),
            TestOutcome::fail("b", "nope", Some(start), Some(start + TimeDelta::milliseconds(200)))
                .to_record(),
            TestOutcome::error("c", anyhow::anyhow!("io"), None, None).to_record(),
        ];

        let summary = TestSummary::from_records(&records);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errored, 1);
        assert_eq!(summary.total_duration, Duration::from_millis(300));
        assert!(!summary.all_passed());
    }
}
