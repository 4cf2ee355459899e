use crate::runner::{IntegrationTest, TestFailure, ensure};
use anyhow::Context;
use chrono::Utc;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

static PROBE_SEQ: AtomicUsize = AtomicUsize::new(0);

/// 临时目录可写：写入探针文件再读回
#[derive(Debug, Default)]
pub struct TempDirWritable {
    probe: Option<PathBuf>,
}

impl TempDirWritable {
    const PAYLOAD: &'static str = "diagrun probe";
}

impl IntegrationTest for TempDirWritable {
    fn name(&self) -> String {
        "temp-dir-writable".to_string()
    }

    fn setup(&mut self) -> anyhow::Result<()> {
        let dir = std::env::temp_dir();
        let meta = fs::metadata(&dir)
            .with_context(|| format!("temp dir {} is not accessible", dir.display()))?;
        anyhow::ensure!(meta.is_dir(), "{} is not a directory", dir.display());

        let seq = PROBE_SEQ.fetch_add(1, Ordering::Relaxed);
        self.probe = Some(dir.join(format!("diagrun-probe-{}-{}", std::process::id(), seq)));
        Ok(())
    }

    fn test(&mut self) -> Result<(), TestFailure> {
        let probe = self
            .probe
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("probe path not prepared"))?;

        fs::write(probe, Self::PAYLOAD).map_err(TestFailure::fault)?;
        let read_back = fs::read_to_string(probe).map_err(TestFailure::fault)?;

        ensure(
            read_back == Self::PAYLOAD,
            format!("probe content mismatch: got {:?}", read_back),
        )
    }

    fn cleanup(&mut self) -> anyhow::Result<()> {
        if let Some(probe) = self.probe.take()
            && probe.exists()
        {
            fs::remove_file(&probe)
                .with_context(|| format!("failed to remove {}", probe.display()))?;
        }
        Ok(())
    }
}

/// 系统时钟合理：晚于构建时间且不倒退
#[derive(Debug, Default)]
pub struct ClockSane;

impl IntegrationTest for ClockSane {
    fn name(&self) -> String {
        "clock-sane".to_string()
    }

    fn test(&mut self) -> Result<(), TestFailure> {
        let first = Utc::now();
        let second = Utc::now();

        ensure(
            first.timestamp() > 1_700_000_000,
            format!("system clock is in the past: {}", first.to_rfc3339()),
        )?;
        ensure(
            second >= first,
            format!("clock went backwards: {} -> {}", first, second),
        )
    }
}

/// 用户配置目录可解析
#[derive(Debug, Default)]
pub struct ConfigDirResolvable;

impl IntegrationTest for ConfigDirResolvable {
    fn name(&self) -> String {
        "config-dir-resolvable".to_string()
    }

    fn test(&mut self) -> Result<(), TestFailure> {
        ensure(dirs::home_dir().is_some(), "home directory cannot be resolved")?;
        ensure(dirs::config_dir().is_some(), "config directory cannot be resolved")
    }
}
