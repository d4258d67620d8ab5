//! 合成事件派发层（synthetic-event-dispatch）
//!
//! 在 `synthetic-event` 之上运行监听器：
//! - 按（目标、注册名）登记监听器；
//! - 一次派发获取一个池化实例，按捕获 → 冒泡的顺序调用监听器，
//!   每次调用前写入 `currentTarget`，传播停止后不再继续；
//! - 监听器失败被收集而非中断派发；
//! - 无论成功与否，派发结束时恰好释放一次实例（已 persist 的实例由池豁免）。
//!
pub mod dispatcher;
pub mod error;
pub mod listener;

pub use dispatcher::{DispatchOutcome, EventDispatcher, ListenerFailure};
pub use error::{DispatchError, DispatchResult};
pub use listener::{EventListener, FnListener, Phase};
