use clap::{Parser, Subcommand};
use diagrun::config::{ConfigLoader, ReportFormat, RunnerConfig};
use diagrun::diagnostics;
use diagrun::runner::{
    CollectingListener, ConsoleReporter, IntegrationTest, ListenerSet, LoggingListener,
    StandardResultFactory, TestExecutor, TestOutcome, TestSummary,
};
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, anyhow::Error>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 配置文件路径（默认自动查找 diagrun.toml）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 输出格式: text | json
    #[arg(long, global = true)]
    pub format: Option<ReportFormat>,

    /// 显示时间戳和完整错误链
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 列出内置诊断项
    List,

    /// 运行内置诊断项
    Selfcheck {
        /// 只运行指定名称的诊断项
        names: Vec<String>,
    },
}

impl Cli {
    /// 加载配置并用命令行参数覆盖
    pub fn resolve_config(&self) -> Result<RunnerConfig> {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::load_from_path(path)?,
            None => ConfigLoader::find_and_load()?.unwrap_or_default(),
        };

        if let Some(format) = self.format {
            config.report.format = format;
        }
        if self.verbose {
            config.report.verbose = true;
        }

        Ok(config)
    }
}

pub fn list() {
    for test in diagnostics::builtin_tests() {
        println!("{}", test.name());
    }
}

/// 依次执行所选诊断项，返回是否全部通过
pub async fn selfcheck(config: &RunnerConfig, names: &[String]) -> Result<bool> {
    let tests = diagnostics::select(names);
    if tests.is_empty() {
        anyhow::bail!("no diagnostics match {:?}", names);
    }

    let collector = CollectingListener::new();
    let listeners: ListenerSet<TestOutcome> = ListenerSet::new()
        .with(LoggingListener)
        .with(ConsoleReporter::new(
            config.report.format,
            config.report.verbose,
        ))
        .with(collector.clone());

    let executor = TestExecutor::new(StandardResultFactory, listeners);
    let reporter = ConsoleReporter::new(config.report.format, config.report.verbose);
    reporter.print_header(tests.len());

    for test in tests {
        tracing::debug!(test = %test.name(), "scheduling diagnostic");
        executor.task(test).spawn().await?;
    }

    let summary = TestSummary::from_records(&collector.records());
    reporter.print_summary(&summary);

    Ok(summary.all_passed())
}
