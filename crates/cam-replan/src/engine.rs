//! 重规划策略引擎
//!
//! 按注册顺序评估所有原因，结果取逻辑或。
//!
//! 每次 `replan()` 都会评估**全部**原因，即使前面的原因已经触发，
//! 这样后面原因的迟滞状态始终保持最新。

use crate::cause::{CauseContext, CauseKind, CauseParams, ReplanCause};
use tracing::{error, info};

/// 重规划策略引擎
pub struct ReplanPolicyEngine {
    ctx: CauseContext,
    causes: Vec<Box<dyn ReplanCause>>,
    verbosity: u8,
}

impl ReplanPolicyEngine {
    /// 创建空引擎
    pub fn new(ctx: CauseContext) -> Self {
        Self {
            ctx,
            causes: Vec::new(),
            verbosity: 0,
        }
    }

    /// 设置日志详细程度（> 0 时记录触发的原因）
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn verbosity(&self) -> u8 {
        self.verbosity
    }

    /// 按名称添加原因
    ///
    /// 名称未知时记录错误并忽略，返回 `false`。
    pub fn add_cause(&mut self, name: &str, params: &CauseParams) -> bool {
        info!("Replanner: Adding cause {}", name);
        match name.parse::<CauseKind>() {
            Ok(kind) => {
                let cause = kind.build(params, &self.ctx);
                self.causes.push(cause);
                true
            },
            Err(_) => {
                error!("String {} does not match any replanning condition", name);
                false
            },
        }
    }

    /// 添加已构造好的原因
    pub fn push_cause(&mut self, cause: Box<dyn ReplanCause>) {
        info!("Replanner: Adding cause {}", cause.name());
        self.causes.push(cause);
    }

    /// 是否需要重规划
    pub fn replan(&mut self) -> bool {
        let mut replan = false;
        for cause in self.causes.iter_mut() {
            let fired = cause.replan();
            if fired && self.verbosity > 0 {
                info!("    Replanning because: {}", cause.name());
            }
            replan |= fired;
        }
        replan
    }

    /// 已注册原因的名称（按评估顺序）
    pub fn cause_names(&self) -> Vec<&str> {
        self.causes.iter().map(|cause| cause.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.causes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.causes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubMap, StubMotion};
    use cam_motion::{MotionStatus, Pose};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 按预设序列返回结果，并记录调用次数
    struct ScriptedCause {
        name: String,
        results: Vec<bool>,
        calls: Arc<AtomicUsize>,
    }

    impl ReplanCause for ScriptedCause {
        fn name(&self) -> &str {
            &self.name
        }

        fn replan(&mut self) -> bool {
            let i = self.calls.fetch_add(1, Ordering::Relaxed);
            self.results[i % self.results.len()]
        }
    }

    fn scripted(name: &str, results: &[bool]) -> (Box<dyn ReplanCause>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let cause = ScriptedCause {
            name: name.to_string(),
            results: results.to_vec(),
            calls: calls.clone(),
        };
        (Box::new(cause), calls)
    }

    fn engine() -> ReplanPolicyEngine {
        let motion = Arc::new(StubMotion::new(
            Pose::default(),
            Pose::default(),
            MotionStatus::Moving,
        ));
        let map = Arc::new(StubMap::new(vec![1], &[1]));
        ReplanPolicyEngine::new(CauseContext::new(motion, map)).with_verbosity(1)
    }

    #[test]
    fn test_empty_engine_never_replans() {
        let mut engine = engine();
        assert!(engine.is_empty());
        assert!(!engine.replan());
    }

    #[test]
    fn test_disjunction_evaluates_every_cause() {
        let mut engine = engine();
        let (a, a_calls) = scripted("a", &[true, false, false]);
        let (b, b_calls) = scripted("b", &[false, false, true]);
        let (c, c_calls) = scripted("c", &[false, false, false]);
        engine.push_cause(a);
        engine.push_cause(b);
        engine.push_cause(c);

        assert!(engine.replan());
        assert!(!engine.replan());
        assert!(engine.replan());

        for calls in [a_calls, b_calls, c_calls] {
            assert_eq!(calls.load(Ordering::Relaxed), 3);
        }
    }

    #[test]
    fn test_add_cause_by_name() {
        let mut engine = engine();
        assert!(engine.add_cause("not_moving", &CauseParams::new()));
        assert!(engine.add_cause("too_much_time_near_goal", &CauseParams::new()));
        assert!(engine.add_cause("isolated_goal", &CauseParams::new()));
        assert_eq!(
            engine.cause_names(),
            vec!["not_moving", "too_much_time_near_goal", "isolated_goal"]
        );
    }

    #[test]
    fn test_unknown_cause_is_ignored() {
        let mut engine = engine();
        let (a, a_calls) = scripted("a", &[true]);
        engine.push_cause(a);

        assert!(!engine.add_cause("battery_low", &CauseParams::new()));
        assert_eq!(engine.len(), 1);

        assert!(engine.replan());
        assert_eq!(a_calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_verbosity_does_not_change_evaluation_count() {
        for verbosity in [0, 1, 3] {
            let mut engine = engine().with_verbosity(verbosity);
            let (a, a_calls) = scripted("a", &[true]);
            engine.push_cause(a);
            engine.replan();
            assert_eq!(a_calls.load(Ordering::Relaxed), 1);
        }
    }
}
