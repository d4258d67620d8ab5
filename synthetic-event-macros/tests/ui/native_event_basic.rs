use synthetic_event::native_event::NativeEvent;
use synthetic_event_macros::native_event;

#[native_event]
struct KeyboardInput {
    #[native(rename = "type")]
    kind: String,
    key: String,
    ctrl_key: bool,
    #[native(skip)]
    #[allow(dead_code)]
    raw_scan_code: u32,
}

#[native_event]
struct Generic<T: serde::Serialize> {
    detail: T,
}

fn main() {
    let ev = KeyboardInput {
        kind: "keydown".into(),
        key: "Enter".into(),
        ctrl_key: true,
        raw_scan_code: 28,
    };
    assert_eq!(ev.event_type().as_deref(), Some("keydown"));
    assert_eq!(ev.field("ctrlKey"), Some(serde_json::json!(true)));
    assert_eq!(ev.field("rawScanCode"), None);
    assert!(!ev.prevent_default());

    let g = Generic { detail: 3u8 };
    assert_eq!(g.field("detail"), Some(serde_json::json!(3)));
}
