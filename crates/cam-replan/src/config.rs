//! 策略文件（TOML）
//!
//! ```toml
//! verbosity = 1
//!
//! [[causes]]
//! name = "too_much_time_near_goal"
//! [causes.params]
//! time_threshold = 2.0
//! distance_threshold = 0.5
//!
//! [[causes]]
//! name = "isolated_goal"
//! params = { depth = 5 }
//! ```
//!
//! 参数值可以是字符串、整数、浮点数或布尔值，统一转换为字符串后交给原因解析。

use crate::cause::{CauseContext, CauseKind, CauseParams};
use crate::engine::ReplanPolicyEngine;
use crate::error::ReplanError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// 参数值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{}", v),
            ParamValue::Integer(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Text(v) => f.write_str(v),
        }
    }
}

/// 单个原因的配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CauseConfig {
    pub name: String,
    #[serde(default)]
    pub params: BTreeMap<String, ParamValue>,
}

impl CauseConfig {
    /// 转换为字符串参数表
    pub fn string_params(&self) -> CauseParams {
        self.params
            .iter()
            .map(|(key, value)| (key.clone(), value.to_string()))
            .collect()
    }
}

/// 重规划策略配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplanConfig {
    #[serde(default)]
    pub verbosity: u8,
    #[serde(default)]
    pub causes: Vec<CauseConfig>,
}

impl ReplanConfig {
    /// 从 TOML 字符串解析
    pub fn from_toml_str(content: &str) -> Result<Self, ReplanError> {
        Ok(toml::from_str(content)?)
    }

    /// 从文件加载
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ReplanError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ReplanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// 严格校验：至少一个原因，且所有名称都能识别
    ///
    /// 引擎本身对这些问题是宽容的，校验只供工具在启动前提示。
    pub fn validate(&self) -> Result<(), ReplanError> {
        if self.causes.is_empty() {
            return Err(ReplanError::EmptyPolicy);
        }
        for cause in &self.causes {
            cause.name.parse::<CauseKind>()?;
        }
        Ok(())
    }

    /// 按文件顺序构造引擎
    pub fn build_engine(&self, ctx: CauseContext) -> ReplanPolicyEngine {
        let mut engine = ReplanPolicyEngine::new(ctx).with_verbosity(self.verbosity);
        for cause in &self.causes {
            engine.add_cause(&cause.name, &cause.string_params());
        }
        engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubMap, StubMotion};
    use cam_motion::{MotionStatus, Pose};
    use std::io::Write;
    use std::sync::Arc;

    const POLICY: &str = r#"
verbosity = 2

[[causes]]
name = "too_much_time_near_goal"
[causes.params]
time_threshold = 2.0
distance_threshold = "0.5"
orientation_threshold = 1

[[causes]]
name = "isolated_goal"
params = { depth = 3 }

[[causes]]
name = "not_moving"
"#;

    fn ctx() -> CauseContext {
        let motion = Arc::new(StubMotion::new(
            Pose::default(),
            Pose::default(),
            MotionStatus::Moving,
        ));
        CauseContext::new(motion, Arc::new(StubMap::new(vec![], &[])))
    }

    #[test]
    fn test_parse_policy() {
        let config = ReplanConfig::from_toml_str(POLICY).unwrap();
        assert_eq!(config.verbosity, 2);
        assert_eq!(config.causes.len(), 3);

        let params = config.causes[0].string_params();
        assert_eq!(params["time_threshold"], "2");
        assert_eq!(params["distance_threshold"], "0.5");
        assert_eq!(params["orientation_threshold"], "1");

        assert_eq!(config.causes[1].string_params()["depth"], "3");
        assert!(config.causes[2].params.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_build_engine_in_file_order() {
        let config = ReplanConfig::from_toml_str(POLICY).unwrap();
        let engine = config.build_engine(ctx());
        assert_eq!(engine.verbosity(), 2);
        assert_eq!(
            engine.cause_names(),
            vec!["too_much_time_near_goal", "isolated_goal", "not_moving"]
        );
    }

    #[test]
    fn test_unknown_cause_skipped_by_engine_but_rejected_by_validate() {
        let config = ReplanConfig::from_toml_str(
            r#"
[[causes]]
name = "low_battery"

[[causes]]
name = "isolated_goal"
"#,
        )
        .unwrap();

        let engine = config.build_engine(ctx());
        assert_eq!(engine.cause_names(), vec!["isolated_goal"]);
        assert!(matches!(
            config.validate(),
            Err(ReplanError::UnknownCause(name)) if name == "low_battery"
        ));
    }

    #[test]
    fn test_empty_policy() {
        let config = ReplanConfig::from_toml_str("").unwrap();
        assert_eq!(config, ReplanConfig::default());
        assert!(matches!(config.validate(), Err(ReplanError::EmptyPolicy)));
    }

    #[test]
    fn test_invalid_toml() {
        let result = ReplanConfig::from_toml_str("[[causes]]\nname = ");
        assert!(matches!(result, Err(ReplanError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(POLICY.as_bytes()).unwrap();

        let config = ReplanConfig::load(file.path()).unwrap();
        assert_eq!(config.causes.len(), 3);

        let missing = ReplanConfig::load("/nonexistent/policy.toml");
        assert!(matches!(missing, Err(ReplanError::Io { .. })));
    }
}
