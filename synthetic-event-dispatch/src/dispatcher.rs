//! 事件派发器（EventDispatcher）
//!
//! 负责一次派发中合成事件的完整生命周期：
//! - 获取实例，目标为传播路径的第一个元素；
//! - 捕获阶段由外向内、冒泡阶段由内向外调用监听器；
//! - 每次调用前写入 `currentTarget`，结束后清空；
//! - 恰好释放一次实例，并返回派发结果。
//!
use crate::{
    error::{DispatchError, DispatchResult},
    listener::{EventListener, Phase},
};
use bon::Builder;
use serde::Serialize;
use serde_json::Value;
use std::{collections::HashMap, rc::Rc};
use synthetic_event::{
    DispatchConfig, EventRegistry, KindHandle, NativeEvent, SyntheticEvent, TargetHandle,
};
use tracing::{debug, trace, warn};

const CURRENT_TARGET_FIELD: &str = "currentTarget";

/// 单个监听器的失败记录
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListenerFailure {
    #[builder(into)]
    pub listener: String,
    pub target: TargetHandle,
    pub phase: Phase,
    #[builder(into)]
    pub reason: String,
}

/// 一次派发的结果
#[derive(Debug, Default)]
pub struct DispatchOutcome {
    pub default_prevented: bool,
    pub propagation_stopped: bool,
    pub listeners_run: usize,
    pub failures: Vec<ListenerFailure>,
    /// 有监听器调用了 `persist` 时保留的句柄，派发结束后仍然可读
    pub persisted: Option<SyntheticEvent>,
}

impl DispatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

type ListenerMap = HashMap<TargetHandle, HashMap<String, Vec<Rc<dyn EventListener>>>>;

struct Step<'a> {
    phase: Phase,
    target: &'a TargetHandle,
    registration_name: String,
}

#[derive(Default)]
pub struct EventDispatcher {
    listeners: ListenerMap,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记监听器；同一（目标、注册名）下按登记顺序调用
    pub fn listen<L>(
        &mut self,
        target: TargetHandle,
        registration_name: impl Into<String>,
        listener: L,
    ) where
        L: EventListener + 'static,
    {
        let listener: Rc<dyn EventListener> = Rc::new(listener);
        self.listeners
            .entry(target)
            .or_default()
            .entry(registration_name.into())
            .or_default()
            .push(listener);
    }

    /// 移除目标上的全部监听器，返回移除的数量
    pub fn remove_all(&mut self, target: &TargetHandle) -> usize {
        self.listeners
            .remove(target)
            .map(|by_name| by_name.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    pub fn listener_count(&self, target: &TargetHandle, registration_name: &str) -> usize {
        self.listeners_for(target, registration_name).len()
    }

    fn listeners_for(
        &self,
        target: &TargetHandle,
        registration_name: &str,
    ) -> &[Rc<dyn EventListener>] {
        self.listeners
            .get(target)
            .and_then(|by_name| by_name.get(registration_name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 派发一次事件
    ///
    /// `path` 以目标开头，依次为其外层目标。监听器失败不会中断派发；
    /// 实例在返回前总会被释放，已 persist 的实例通过 `DispatchOutcome::persisted` 取回。
    pub fn dispatch(
        &self,
        registry: &EventRegistry,
        kind: KindHandle,
        config: DispatchConfig,
        native_event: Rc<dyn NativeEvent>,
        raw_target: Value,
        path: &[TargetHandle],
    ) -> DispatchResult<DispatchOutcome> {
        let Some(target) = path.first() else {
            return Err(DispatchError::EmptyPath);
        };
        // 先确定调用计划，避免出错时实例未被释放
        let steps = Self::plan(registry, kind, &config, target, path)?;
        let event = registry.acquire(kind, config, target.clone(), native_event, raw_target)?;

        let mut outcome = DispatchOutcome::default();
        let run = self.run(&event, &steps, &mut outcome);

        outcome.default_prevented = event.is_default_prevented();
        outcome.propagation_stopped = event.is_propagation_stopped();
        if event.is_persistent() {
            outcome.persisted = Some(event.clone());
        }
        registry.release(kind, event)?;
        run?;

        debug!(
            kind = %kind,
            target = %target,
            listeners_run = outcome.listeners_run,
            failures = outcome.failures.len(),
            default_prevented = outcome.default_prevented,
            "event dispatched"
        );
        Ok(outcome)
    }

    fn plan<'a>(
        registry: &EventRegistry,
        kind: KindHandle,
        config: &DispatchConfig,
        target: &'a TargetHandle,
        path: &'a [TargetHandle],
    ) -> DispatchResult<Vec<Step<'a>>> {
        if let Some(names) = config.phased_registration_names() {
            let captured = path.iter().rev().map(|t| Step {
                phase: Phase::Captured,
                target: t,
                registration_name: names.captured().to_string(),
            });
            let bubbled = path.iter().map(|t| Step {
                phase: Phase::Bubbled,
                target: t,
                registration_name: names.bubbled().to_string(),
            });
            return Ok(captured.chain(bubbled).collect());
        }

        if let Some(name) = config.registration_name() {
            return Ok(vec![Step {
                phase: Phase::Direct,
                target,
                registration_name: name.to_string(),
            }]);
        }

        Err(DispatchError::MissingRegistrationName {
            kind: registry.kind(kind)?.name().to_string(),
        })
    }

    fn run(
        &self,
        event: &SyntheticEvent,
        steps: &[Step<'_>],
        outcome: &mut DispatchOutcome,
    ) -> DispatchResult<()> {
        let tracks_current = event.schema().contains(CURRENT_TARGET_FIELD);

        'steps: for step in steps {
            let listeners = self.listeners_for(step.target, &step.registration_name);
            if listeners.is_empty() {
                continue;
            }
            if tracks_current {
                event.set(CURRENT_TARGET_FIELD, step.target.to_value())?;
            }

            for listener in listeners {
                if event.is_propagation_stopped() {
                    break 'steps;
                }
                trace!(
                    listener = listener.listener_name(),
                    target = %step.target,
                    phase = ?step.phase,
                    "invoking listener"
                );
                outcome.listeners_run += 1;
                if let Err(err) = listener.handle(event) {
                    warn!(
                        listener = listener.listener_name(),
                        target = %step.target,
                        phase = ?step.phase,
                        error = %err,
                        "listener failed"
                    );
                    outcome.failures.push(
                        ListenerFailure::builder()
                            .listener(listener.listener_name())
                            .target(step.target.clone())
                            .phase(step.phase)
                            .reason(err.to_string())
                            .build(),
                    );
                }
            }
        }

        if tracks_current {
            event.set(CURRENT_TARGET_FIELD, Value::Null)?;
        }
        Ok(())
    }
}
