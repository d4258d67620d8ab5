use super::{DispatchConfig, EventSlot, TargetHandle};
use crate::{
    diagnostics::Access,
    error::{EventError, EventResult},
    native_event::NativeEvent,
    registry::{KindEntry, KindHandle},
    schema::Schema,
};
use serde_json::{Map, Value};
use std::{fmt, rc::Rc};

/// 合成事件句柄
///
/// 句柄可以克隆（例如交给多个监听器），所有克隆指向同一个池化实例。
/// 实例被 `release` 后，获取时记录的代次与槽位不再一致：此后经任何句柄的
/// 读取都返回 `null`/`false`，写入与方法调用都是空操作，并在诊断开启时上报；
/// 即使槽位已被下一次 `acquire` 复用，旧句柄也读不到新事件的数据。
#[derive(Clone)]
pub struct SyntheticEvent {
    slot: Rc<EventSlot>,
    generation: u64,
    kind: Rc<KindEntry>,
}

impl SyntheticEvent {
    pub(crate) fn new(slot: Rc<EventSlot>, kind: Rc<KindEntry>) -> Self {
        let generation = slot.generation();
        Self {
            slot,
            generation,
            kind,
        }
    }

    pub(crate) fn into_slot(self) -> Rc<EventSlot> {
        self.slot
    }

    /// 释放时使用，不触发误用上报
    pub(crate) fn persistent_unchecked(&self) -> bool {
        self.slot.state().persistent
    }

    /// 记录已 persist 实例的释放；返回此前是否已经释放过
    pub(crate) fn mark_persistent_released(&self) -> bool {
        std::mem::replace(&mut self.slot.state_mut().released_persistent, true)
    }

    pub fn kind(&self) -> KindHandle {
        self.kind.handle()
    }

    pub fn kind_name(&self) -> &str {
        self.kind.name()
    }

    pub fn schema(&self) -> &Schema {
        self.kind.schema()
    }

    /// 实例是否已经被释放（且未 persist）
    pub fn is_released(&self) -> bool {
        self.slot.generation() != self.generation
    }

    /// 两个句柄是否指向同一块池化存储
    pub fn ptr_eq(&self, other: &SyntheticEvent) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }

    fn live(&self, member: &str, access: Access) -> bool {
        if self.is_released() {
            self.kind.report(member, access);
            return false;
        }
        true
    }

    // ---- 字段 ----

    /// 读取字段；种类 Schema 中没有该字段时返回 `None`
    pub fn get(&self, name: &str) -> Option<Value> {
        let position = self.schema().position(name)?;
        if !self.live(name, Access::GetProperty) {
            return Some(Value::Null);
        }
        let state = self.slot.state();
        Some(state.values.get(position).cloned().unwrap_or(Value::Null))
    }

    /// 写入字段（如派发层设置 `currentTarget`）；释放后写入为空操作
    pub fn set(&self, name: &str, value: impl Into<Value>) -> EventResult<()> {
        let Some(position) = self.schema().position(name) else {
            return Err(EventError::UnknownField {
                kind: self.kind_name().to_string(),
                field: name.to_string(),
            });
        };
        if !self.live(name, Access::SetProperty) {
            return Ok(());
        }
        if let Some(slot) = self.slot.state_mut().values.get_mut(position) {
            *slot = value.into();
        }
        Ok(())
    }

    pub fn event_type(&self) -> Option<String> {
        self.get("type")
            .and_then(|v| v.as_str().map(str::to_owned))
    }

    pub fn target(&self) -> Value {
        self.get("target").unwrap_or(Value::Null)
    }

    pub fn current_target(&self) -> Value {
        self.get("currentTarget").unwrap_or(Value::Null)
    }

    pub fn time_stamp(&self) -> Option<f64> {
        self.get("timeStamp").and_then(|v| v.as_f64())
    }

    /// 全部字段的快照（按 Schema 顺序）
    pub fn to_json(&self) -> Value {
        let released = !self.live("toJSON", Access::CallMethod);
        let state = self.slot.state();
        let fields: Map<String, Value> = self
            .schema()
            .field_names()
            .enumerate()
            .map(|(i, name)| {
                let value = if released {
                    Value::Null
                } else {
                    state.values.get(i).cloned().unwrap_or(Value::Null)
                };
                (name.to_string(), value)
            })
            .collect();
        Value::Object(fields)
    }

    // ---- 派发上下文 ----

    pub fn dispatch_config(&self) -> Option<DispatchConfig> {
        if !self.live("dispatchConfig", Access::GetProperty) {
            return None;
        }
        self.slot.state().dispatch_config.clone()
    }

    pub fn target_handle(&self) -> Option<TargetHandle> {
        if !self.live("targetHandle", Access::GetProperty) {
            return None;
        }
        self.slot.state().target_handle.clone()
    }

    pub fn native_event(&self) -> Option<Rc<dyn NativeEvent>> {
        if !self.live("nativeEvent", Access::GetProperty) {
            return None;
        }
        self.slot.state().native_event.clone()
    }

    // ---- 锁存与持久化 ----

    /// 标记阻止默认行为；优先调用原生能力，否则尝试旧式 `returnValue` 回退
    pub fn prevent_default(&self) {
        if !self.live("preventDefault", Access::CallMethod) {
            return;
        }
        let native = {
            let mut state = self.slot.state_mut();
            state.default_prevented = true;
            if let Some(value) = self
                .schema()
                .position("defaultPrevented")
                .and_then(|i| state.values.get_mut(i))
            {
                *value = Value::Bool(true);
            }
            state.native_event.clone()
        };
        if let Some(native) = native {
            if !native.prevent_default() {
                native.suppress_return_value();
            }
        }
    }

    /// 标记停止传播；优先调用原生能力，否则尝试旧式 `cancelBubble` 回退
    pub fn stop_propagation(&self) {
        if !self.live("stopPropagation", Access::CallMethod) {
            return;
        }
        let native = {
            let mut state = self.slot.state_mut();
            state.propagation_stopped = true;
            state.native_event.clone()
        };
        if let Some(native) = native {
            if !native.stop_propagation() {
                native.cancel_bubble();
            }
        }
    }

    /// 使实例脱离回收，释放后字段仍然可读；不可撤销
    pub fn persist(&self) {
        if !self.live("persist", Access::CallMethod) {
            return;
        }
        self.slot.state_mut().persistent = true;
    }

    pub fn is_persistent(&self) -> bool {
        self.live("isPersistent", Access::CallMethod) && self.slot.state().persistent
    }

    pub fn is_default_prevented(&self) -> bool {
        self.live("isDefaultPrevented", Access::CallMethod) && self.slot.state().default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.live("isPropagationStopped", Access::CallMethod)
            && self.slot.state().propagation_stopped
    }
}

impl fmt::Debug for SyntheticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntheticEvent")
            .field("kind", &self.kind_name())
            .field("generation", &self.generation)
            .field("released", &self.is_released())
            .finish_non_exhaustive()
    }
}
