pub mod builtin;

pub use builtin::{ClockSane, ConfigDirResolvable, TempDirWritable};

use crate::runner::IntegrationTest;

/// 内置诊断项（按执行顺序）
pub fn builtin_tests() -> Vec<Box<dyn IntegrationTest + Send>> {
    vec![
        Box::new(TempDirWritable::default()),
        Box::new(ClockSane),
        Box::new(ConfigDirResolvable),
    ]
}

/// 按名称筛选内置诊断项，`names` 为空时返回全部
pub fn select(names: &[String]) -> Vec<Box<dyn IntegrationTest + Send>> {
    builtin_tests()
        .into_iter()
        .filter(|test| names.is_empty() || names.contains(&test.name()))
        .collect()
}
