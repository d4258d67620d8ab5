use std::cell::Cell;
use synthetic_event::native_event::NativeEvent;
use synthetic_event_macros::native_event;

#[native_event(prevent_default = mark_prevented, stop_propagation = mark_stopped)]
struct Click {
    #[native(rename = "type")]
    kind: String,
    prevented: Cell<bool>,
    #[native(skip)]
    stopped: Cell<bool>,
}

impl Click {
    fn mark_prevented(&self) {
        self.prevented.set(true);
    }

    fn mark_stopped(&self) {
        self.stopped.set(true);
    }
}

fn main() {
    let ev = Click {
        kind: "click".into(),
        prevented: Cell::new(false),
        stopped: Cell::new(false),
    };
    assert!(ev.prevent_default());
    assert!(ev.stop_propagation());
    assert!(ev.stopped.get());
    assert_eq!(ev.field("prevented"), Some(serde_json::json!(true)));
}
