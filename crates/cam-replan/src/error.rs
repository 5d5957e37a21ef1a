//! 策略层错误类型定义

use std::path::PathBuf;
use thiserror::Error;

/// 策略层错误类型
///
/// 引擎本身从不因配置问题失败（未知名称只记录日志），
/// 这些错误只在加载和显式校验策略文件时返回。
#[derive(Error, Debug)]
pub enum ReplanError {
    /// 读取策略文件失败
    #[error("Failed to read policy file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML 解析失败
    #[error("Invalid policy file: {0}")]
    Parse(#[from] toml::de::Error),

    /// 未知的重规划原因
    #[error("Unknown replanning cause: {0}")]
    UnknownCause(String),

    /// 策略中没有任何原因
    #[error("Policy does not register any replanning cause")]
    EmptyPolicy,
}

#[cfg(test)]
mod tests {
    use super::ReplanError;

    #[test]
    fn test_replan_error_display() {
        let msg = ReplanError::UnknownCause("stuck".to_string()).to_string();
        assert_eq!(msg, "Unknown replanning cause: stuck");

        let msg = ReplanError::EmptyPolicy.to_string();
        assert!(msg.contains("does not register"));

        let err = ReplanError::Io {
            path: "/tmp/missing.toml".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/missing.toml") && msg.contains("not found"), "{}", msg);
    }
}
