//! 原生事件（NativeEvent）抽象
//!
//! 原生事件由外部事件源提供，本库只要求它能按名读取字段，并可选地提供
//! 原生的阻止默认行为/停止传播能力。旧式回退（`returnValue = false`、
//! `cancelBubble = true`）作为可选兼容钩子存在，默认视为不支持。
//!
mod platform;

pub use platform::PlatformEvent;

use serde::Serialize;
use serde_json::Value;

/// 合成事件所包装的原生事件
pub trait NativeEvent {
    /// 读取同名字段；缺失时返回 `None`，由归一化降级为 `null`
    fn field(&self, name: &str) -> Option<Value>;

    fn event_type(&self) -> Option<String> {
        self.field("type")
            .and_then(|v| v.as_str().map(str::to_owned))
    }

    fn default_prevented(&self) -> Option<bool> {
        self.field("defaultPrevented").and_then(|v| v.as_bool())
    }

    /// 旧式阻止默认行为标记，`Some(false)` 视为已阻止
    fn return_value(&self) -> Option<bool> {
        self.field("returnValue").and_then(|v| v.as_bool())
    }

    fn time_stamp(&self) -> Option<f64> {
        self.field("timeStamp").and_then(|v| v.as_f64())
    }

    /// 原生阻止默认行为；返回 `false` 表示不具备该能力
    fn prevent_default(&self) -> bool {
        false
    }

    /// 旧式回退：置 `returnValue = false`；返回 `false` 表示不支持
    fn suppress_return_value(&self) -> bool {
        false
    }

    /// 原生停止传播；返回 `false` 表示不具备该能力
    fn stop_propagation(&self) -> bool {
        false
    }

    /// 旧式回退：置 `cancelBubble = true`；返回 `false` 表示不支持
    fn cancel_bubble(&self) -> bool {
        false
    }
}

/// 只读的 JSON 原生事件，不具备任何阻止/停止能力
impl NativeEvent for Value {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

/// `#[native_event]` 宏展开时使用的字段值转换
#[doc(hidden)]
pub fn to_field_value<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::NativeEvent;
    use serde_json::json;

    #[test]
    fn json_event_reads_fields_and_has_no_capabilities() {
        let raw = json!({ "type": "click", "defaultPrevented": false, "timeStamp": 12.5 });
        assert_eq!(raw.event_type().as_deref(), Some("click"));
        assert_eq!(raw.default_prevented(), Some(false));
        assert_eq!(raw.time_stamp(), Some(12.5));
        assert_eq!(raw.return_value(), None);
        assert!(!raw.prevent_default());
        assert!(!raw.stop_propagation());
    }

    #[test]
    fn non_object_json_has_no_fields() {
        let raw = json!("not an event");
        assert_eq!(raw.field("type"), None);
    }
}
