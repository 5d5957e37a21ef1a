//! 命令定义和实现

pub mod check_policy;
pub mod simulate;

pub use check_policy::CheckPolicyCommand;
pub use simulate::SimulateCommand;
