use super::NativeEvent;
use bon::Builder;
use serde_json::{Map, Value};
use std::cell::Cell;

/// 可变的原生事件实现，用于事件源适配与测试
///
/// 字段保存在 JSON 对象中；原生能力与旧式回退是否可用由构建参数决定，
/// 调用结果记录在内部标记上，并通过 `defaultPrevented` / `returnValue` /
/// `cancelBubble` 字段反映出来。
#[derive(Builder, Debug)]
pub struct PlatformEvent {
    #[builder(default)]
    fields: Map<String, Value>,
    /// 是否具备原生 `preventDefault`
    #[builder(default = true)]
    native_prevent_default: bool,
    /// 是否具备原生 `stopPropagation`
    #[builder(default = true)]
    native_stop_propagation: bool,
    /// 是否支持 `returnValue = false` 回退
    #[builder(default)]
    legacy_return_value: bool,
    /// 是否支持 `cancelBubble = true` 回退
    #[builder(default)]
    legacy_cancel_bubble: bool,

    #[builder(skip)]
    prevented: Cell<bool>,
    #[builder(skip)]
    stopped: Cell<bool>,
    #[builder(skip)]
    returned_false: Cell<bool>,
    #[builder(skip)]
    bubble_cancelled: Cell<bool>,
}

impl PlatformEvent {
    /// 具备原生能力的事件，仅设置 `type`
    pub fn new(event_type: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("type".into(), Value::String(event_type.into()));
        Self::builder().fields(fields).build()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn natively_prevented(&self) -> bool {
        self.prevented.get()
    }

    pub fn natively_stopped(&self) -> bool {
        self.stopped.get()
    }

    pub fn return_value_suppressed(&self) -> bool {
        self.returned_false.get()
    }

    pub fn bubble_cancelled(&self) -> bool {
        self.bubble_cancelled.get()
    }
}

impl NativeEvent for PlatformEvent {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "defaultPrevented" if self.prevented.get() => Some(Value::Bool(true)),
            "returnValue" if self.returned_false.get() => Some(Value::Bool(false)),
            "cancelBubble" if self.bubble_cancelled.get() => Some(Value::Bool(true)),
            _ => self.fields.get(name).cloned(),
        }
    }

    fn prevent_default(&self) -> bool {
        if self.native_prevent_default {
            self.prevented.set(true);
        }
        self.native_prevent_default
    }

    fn suppress_return_value(&self) -> bool {
        if self.legacy_return_value {
            self.returned_false.set(true);
        }
        self.legacy_return_value
    }

    fn stop_propagation(&self) -> bool {
        if self.native_stop_propagation {
            self.stopped.set(true);
        }
        self.native_stop_propagation
    }

    fn cancel_bubble(&self) -> bool {
        if self.legacy_cancel_bubble {
            self.bubble_cancelled.set(true);
        }
        self.legacy_cancel_bubble
    }
}

#[cfg(test)]
mod tests {
    use super::PlatformEvent;
    use crate::native_event::NativeEvent;
    use serde_json::{Map, Value, json};

    #[test]
    fn native_prevent_default_is_visible_through_fields() {
        let ev = PlatformEvent::new("submit");
        assert_eq!(ev.default_prevented(), None);
        assert!(ev.prevent_default());
        assert!(ev.natively_prevented());
        assert_eq!(ev.default_prevented(), Some(true));
    }

    #[test]
    fn legacy_hooks_are_opt_in() {
        let ev = PlatformEvent::builder()
            .fields(Map::from_iter([("type".to_string(), json!("propertychange"))]))
            .native_prevent_default(false)
            .native_stop_propagation(false)
            .build();
        assert!(!ev.prevent_default());
        assert!(!ev.suppress_return_value());
        assert!(!ev.cancel_bubble());
        assert_eq!(ev.field("returnValue"), None);

        let legacy = PlatformEvent::builder()
            .native_prevent_default(false)
            .legacy_return_value(true)
            .legacy_cancel_bubble(true)
            .build();
        assert!(legacy.suppress_return_value());
        assert!(legacy.cancel_bubble());
        assert_eq!(legacy.return_value(), Some(false));
        assert_eq!(legacy.field("cancelBubble"), Some(Value::Bool(true)));
    }

    #[test]
    fn builder_defaults_to_native_capabilities() {
        let ev = PlatformEvent::builder().build();
        assert!(ev.prevent_default());
        assert!(ev.stop_propagation());
        assert!(ev.natively_prevented());
        assert!(ev.natively_stopped());
        assert!(!ev.suppress_return_value());
        assert!(!ev.cancel_bubble());
        assert_eq!(ev.event_type(), None);
        assert_eq!(ev.field("cancelBubble"), None::<Value>);
    }
}
