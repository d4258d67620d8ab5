//! 合成事件实例（SyntheticEvent）与其派发上下文
//!
//! `SyntheticEvent` 是指向池化槽位的轻量句柄，携带获取时的代次；槽位被释放
//! （代次递增）后，旧句柄上的访问都会被拦截并降级为默认值。
//! `DispatchConfig` 与 `TargetHandle` 为派发层传入的不透明上下文。

mod dispatch_config;
mod slot;
mod synthetic_event;
mod target_handle;

pub use dispatch_config::{DispatchConfig, PhasedRegistrationNames};
pub(crate) use slot::EventSlot;
pub use synthetic_event::SyntheticEvent;
pub use target_handle::TargetHandle;
