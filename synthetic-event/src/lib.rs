//! 合成事件基础库（synthetic-event）
//!
//! 为上层派发系统提供统一、跨平台的“合成事件”对象，并通过按种类划分的有界对象池
//! 避免每次派发都重新分配：
//! - 事件种类（`registry`）：以 `define_base` 定义根种类，以 `extend` 在父种类之上
//!   叠加字段规则，合并在定义期一次性完成；
//! - 字段规则（`schema`）：复制原生字段、由原生事件计算、或固定常量；
//! - 事件实例（`event`）：`acquire` 填充字段，`prevent_default`/`stop_propagation`
//!   为单调锁存，`persist` 使实例脱离回收；
//! - 对象池（`pool`）：每个种类独立的有界空闲列表（默认容量 10）；
//! - 误用诊断（`diagnostics`）：释放后访问实例时上报而非崩溃；
//! - 原生事件抽象（`native_event`）与标准事件种类（`kinds`）。
//!
//! 典型用法：
//! 1. 创建 `EventRegistry`，通过 `StandardKinds::register` 或自定义 `Schema` 定义种类；
//! 2. 派发时 `acquire` 获取实例，交由监听器读取/操作；
//! 3. 派发结束后对每个实例恰好调用一次 `release`，除非已 `persist`。
//!
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod event;
pub mod kinds;
pub mod native_event;
pub mod pool;
pub mod registry;
pub mod schema;

pub use config::PoolConfig;
pub use diagnostics::{Access, MisuseReporter, ReleasedAccess, TracingReporter};
pub use error::{EventError, EventResult};
pub use event::{DispatchConfig, PhasedRegistrationNames, SyntheticEvent, TargetHandle};
pub use kinds::StandardKinds;
pub use native_event::{NativeEvent, PlatformEvent};
pub use pool::PoolStats;
pub use registry::{EventKind, EventRegistry, KindHandle};
pub use schema::{FieldRule, Schema, SchemaBuilder};

#[cfg(feature = "macros")]
pub use synthetic_event_macros::native_event;

// 供 `#[native_event]` 宏展开代码引用
pub use serde_json;

// 允许在本 crate 内部通过 ::synthetic_event 进行自引用，
// 以便宏展开代码在本 crate 的单元测试中也能解析到 ::synthetic_event 路径。
extern crate self as synthetic_event;
