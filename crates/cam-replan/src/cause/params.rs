//! 原因参数解析
//!
//! 参数以字符串键值对给出。配置错误从不导致构造失败：
//! - 未知键：`error!`，忽略
//! - 已知键缺失：`warn!`，保留默认值
//! - 值无法解析：`warn!`，保留默认值

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info, warn};

/// 原因参数（键 → 字符串值）
pub type CauseParams = BTreeMap<String, String>;

/// 带诊断输出的参数读取器
pub(crate) struct ParamReader<'a> {
    cause: &'a str,
    params: &'a CauseParams,
}

impl<'a> ParamReader<'a> {
    /// 创建读取器，并对 `known` 以外的键报错
    pub(crate) fn new(cause: &'a str, params: &'a CauseParams, known: &[&str]) -> Self {
        info!("{}: Number of parameters: {}", cause, params.len());
        for (key, value) in params {
            if known.contains(&key.as_str()) {
                info!("{}: Parameter {} set to value {}", cause, key, value);
            } else {
                error!(
                    "String {} does not match any parameter in '{}'",
                    key, cause
                );
            }
        }
        Self { cause, params }
    }

    /// 读取浮点数
    pub(crate) fn f64_or(&self, key: &str, default: f64) -> f64 {
        self.parse_or(key, default).filter(|v| v.is_finite()).unwrap_or_else(|| {
            self.report_default(key, default);
            default
        })
    }

    /// 读取以秒为单位的时长
    pub(crate) fn seconds_or(&self, key: &str, default: Duration) -> Duration {
        self.parse_or::<f64>(key, default.as_secs_f64())
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .unwrap_or_else(|| {
                self.report_default(key, format_args!("{:?}", default));
                default
            })
    }

    /// 读取非负整数
    pub(crate) fn u32_or(&self, key: &str, default: u32) -> u32 {
        self.parse_or(key, default).unwrap_or_else(|| {
            self.report_default(key, default);
            default
        })
    }

    /// 键缺失时返回 `Some(default)`，值非法时返回 `None`
    fn parse_or<T: FromStr>(&self, key: &str, default: T) -> Option<T> {
        match self.params.get(key) {
            Some(raw) => raw.trim().parse().ok(),
            None => {
                warn!(
                    "{}: Parameter {} not given, keeping default",
                    self.cause, key
                );
                Some(default)
            },
        }
    }

    fn report_default(&self, key: &str, default: impl std::fmt::Display) {
        warn!(
            "{}: Invalid value {:?} for parameter {}, using default {}",
            self.cause,
            self.params.get(key).map(String::as_str).unwrap_or_default(),
            key,
            default
        );
    }
}
