use serde_json::{Value, json};
use std::{cell::RefCell, rc::Rc};
use synthetic_event::{
    Access, DispatchConfig, EventError, EventRegistry, MisuseReporter, PlatformEvent, PoolConfig,
    ReleasedAccess, StandardKinds, SyntheticEvent, TargetHandle,
};

#[derive(Default)]
struct Recorder {
    seen: RefCell<Vec<ReleasedAccess>>,
}

impl MisuseReporter for Recorder {
    fn report(&self, misuse: &ReleasedAccess) {
        self.seen.borrow_mut().push(misuse.clone());
    }
}

impl Recorder {
    fn members(&self) -> Vec<(String, Access)> {
        self.seen
            .borrow()
            .iter()
            .map(|m| (m.member.clone(), m.access))
            .collect()
    }
}

fn registry_with(diagnostics: bool) -> (EventRegistry, StandardKinds, Rc<Recorder>) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let recorder = Rc::new(Recorder::default());
    let config = PoolConfig::builder().diagnostics(diagnostics).build();
    let mut registry = EventRegistry::with_reporter(config, recorder.clone()).unwrap();
    let kinds = StandardKinds::register(&mut registry).unwrap();
    (registry, kinds, recorder)
}

fn released_click(registry: &EventRegistry, kinds: &StandardKinds) -> (SyntheticEvent, Rc<PlatformEvent>) {
    let native = Rc::new(PlatformEvent::new("click").with_field("clientX", 3));
    let ev = registry
        .acquire(
            kinds.mouse,
            DispatchConfig::phased("onClick"),
            TargetHandle::new("btn"),
            native.clone(),
            json!("button"),
        )
        .unwrap();
    let stale = ev.clone();
    registry.release(kinds.mouse, ev).unwrap();
    (stale, native)
}

#[test]
fn every_post_release_access_is_reported_once() {
    let (registry, kinds, recorder) = registry_with(true);
    let (stale, native) = released_click(&registry, &kinds);

    assert_eq!(stale.get("clientX"), Some(Value::Null));
    stale.set("currentTarget", "x").unwrap();
    stale.prevent_default();
    stale.stop_propagation();
    stale.persist();
    assert!(!stale.is_default_prevented());
    assert!(!stale.is_propagation_stopped());
    assert!(stale.native_event().is_none());

    assert_eq!(
        recorder.members(),
        vec![
            ("clientX".to_string(), Access::GetProperty),
            ("currentTarget".to_string(), Access::SetProperty),
            ("preventDefault".to_string(), Access::CallMethod),
            ("stopPropagation".to_string(), Access::CallMethod),
            ("persist".to_string(), Access::CallMethod),
            ("isDefaultPrevented".to_string(), Access::CallMethod),
            ("isPropagationStopped".to_string(), Access::CallMethod),
            ("nativeEvent".to_string(), Access::GetProperty),
        ]
    );
    // 释放后的调用不会触达原生事件
    assert!(!native.natively_prevented());
    assert!(!native.natively_stopped());
    assert!(recorder.seen.borrow().iter().all(|m| m.kind == "MouseEvent"));
}

#[test]
fn persist_after_release_does_not_exempt_the_instance() {
    let (registry, kinds, _recorder) = registry_with(true);
    let (stale, _) = released_click(&registry, &kinds);
    stale.persist();
    assert_eq!(registry.pool_len(kinds.mouse).unwrap(), 1);

    let next = registry
        .acquire(
            kinds.mouse,
            DispatchConfig::phased("onClick"),
            TargetHandle::new("btn"),
            Rc::new(PlatformEvent::new("click")),
            Value::Null,
        )
        .unwrap();
    assert!(next.ptr_eq(&stale));
    assert!(!next.is_persistent());
}

#[test]
fn double_release_is_reported_and_never_pools_twice() {
    let (registry, kinds, recorder) = registry_with(true);
    let (stale, _) = released_click(&registry, &kinds);

    registry.release(kinds.mouse, stale).unwrap();
    assert_eq!(registry.pool_len(kinds.mouse).unwrap(), 1);
    assert_eq!(
        recorder.members(),
        vec![("release".to_string(), Access::CallMethod)]
    );
}

#[test]
fn releasing_a_persisted_instance_twice_is_reported() {
    let (registry, kinds, recorder) = registry_with(true);
    let ev = registry
        .acquire(
            kinds.mouse,
            DispatchConfig::phased("onClick"),
            TargetHandle::new("btn"),
            Rc::new(PlatformEvent::new("click").with_field("clientX", 3)),
            Value::Null,
        )
        .unwrap();
    ev.persist();
    let kept = ev.clone();
    let again = ev.clone();

    registry.release(kinds.mouse, ev).unwrap();
    registry.release(kinds.mouse, kept.clone()).unwrap();
    registry.release(kinds.mouse, again).unwrap();

    let stats = registry.stats(kinds.mouse).unwrap();
    assert_eq!(stats.persisted, 1);
    assert_eq!(stats.pooled, 0);
    assert_eq!(registry.pool_len(kinds.mouse).unwrap(), 0);
    assert_eq!(
        recorder.members(),
        vec![
            ("release".to_string(), Access::CallMethod),
            ("release".to_string(), Access::CallMethod),
        ]
    );

    // 重复释放不影响已持久化实例的可读性
    assert!(!kept.is_released());
    assert_eq!(kept.get("clientX"), Some(json!(3)));
}

#[test]
fn silent_when_diagnostics_are_disabled() {
    let (registry, kinds, recorder) = registry_with(false);
    let (stale, _) = released_click(&registry, &kinds);

    assert_eq!(stale.get("type"), Some(Value::Null));
    stale.prevent_default();
    assert!(!stale.is_default_prevented());
    assert!(recorder.seen.borrow().is_empty());
}

#[test]
fn unknown_fields_are_not_misuse() {
    let (registry, kinds, recorder) = registry_with(true);
    let ev = registry
        .acquire(
            kinds.event,
            DispatchConfig::phased("onClick"),
            TargetHandle::new("btn"),
            Rc::new(PlatformEvent::new("click")),
            Value::Null,
        )
        .unwrap();

    assert_eq!(ev.get("dataTransfer"), None);
    match ev.set("dataTransfer", json!({})).unwrap_err() {
        EventError::UnknownField { kind, field } => {
            assert_eq!(kind, "Event");
            assert_eq!(field, "dataTransfer");
        }
        other => panic!("unexpected {other:?}"),
    }
    ev.set("currentTarget", "btn").unwrap();
    assert_eq!(ev.current_target(), json!("btn"));
    assert!(recorder.seen.borrow().is_empty());
}

#[test]
fn snapshot_of_released_instance_is_all_null() {
    let (registry, kinds, _recorder) = registry_with(true);
    let (stale, _) = released_click(&registry, &kinds);
    let snapshot = stale.to_json();
    let fields = snapshot.as_object().unwrap();
    assert!(fields.contains_key("clientX"));
    assert!(fields.values().all(Value::is_null));
}
