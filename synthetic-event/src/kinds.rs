//! 标准事件种类
//!
//! `Event` 为根种类，`UIEvent`、`MouseEvent`、`DragEvent` 依次继承：
//!
//! ```text
//! Event ── UIEvent ── MouseEvent ── DragEvent
//! ```
//!
//! 字段大多按名复制；具体浏览器差异的修正不在此处处理。
//!
use crate::{
    error::EventResult,
    registry::{EventRegistry, KindHandle},
    schema::Schema,
};
use chrono::Utc;
use serde_json::{Number, Value};

/// `Event` 接口
pub fn event_interface() -> Schema {
    Schema::builder()
        .copy("type")
        .copy("target")
        // currentTarget 由派发层在调用每个监听器前写入
        .compute("currentTarget", |_| Value::Null)
        .copy("eventPhase")
        .copy("bubbles")
        .copy("cancelable")
        .compute("timeStamp", |e| {
            let ts = e
                .time_stamp()
                .filter(|ts| *ts != 0.0)
                .unwrap_or_else(|| Utc::now().timestamp_millis() as f64);
            Number::from_f64(ts).map(Value::Number).unwrap_or(Value::Null)
        })
        .copy("defaultPrevented")
        .copy("isTrusted")
        .build()
}

/// `UIEvent` 在 `Event` 之上增加的字段
pub fn ui_interface() -> Schema {
    Schema::builder().copy("view").copy("detail").build()
}

/// `MouseEvent` 在 `UIEvent` 之上增加的字段
pub fn mouse_interface() -> Schema {
    Schema::builder()
        .copy("screenX")
        .copy("screenY")
        .copy("clientX")
        .copy("clientY")
        .copy("pageX")
        .copy("pageY")
        .copy("ctrlKey")
        .copy("shiftKey")
        .copy("altKey")
        .copy("metaKey")
        .copy("button")
        .copy("buttons")
        .copy("relatedTarget")
        .build()
}

/// `DragEvent` 在 `MouseEvent` 之上增加的字段
pub fn drag_interface() -> Schema {
    Schema::builder().copy("dataTransfer").build()
}

/// 已注册的标准种类句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardKinds {
    pub event: KindHandle,
    pub ui: KindHandle,
    pub mouse: KindHandle,
    pub drag: KindHandle,
}

impl StandardKinds {
    pub fn register(registry: &mut EventRegistry) -> EventResult<Self> {
        let event = registry.define_base("Event", event_interface())?;
        let ui = registry.extend(event, "UIEvent", ui_interface())?;
        let mouse = registry.extend(ui, "MouseEvent", mouse_interface())?;
        let drag = registry.extend(mouse, "DragEvent", drag_interface())?;
        Ok(Self {
            event,
            ui,
            mouse,
            drag,
        })
    }
}
