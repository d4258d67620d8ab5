//! 事件监听器（EventListener）
//!
//! 监听器读取或操作派发中的合成事件；返回的错误被派发器记录为失败，
//! 不影响其余监听器的执行。
//!
use serde::Serialize;
use std::rc::Rc;
use synthetic_event::SyntheticEvent;

/// 监听器被调用时所处的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    Captured,
    Bubbled,
    /// 只派发到目标本身（`registration_name`）
    Direct,
}

pub trait EventListener {
    /// 监听器名称（用于失败记录与日志）
    fn listener_name(&self) -> &str;
    fn handle(&self, event: &SyntheticEvent) -> anyhow::Result<()>;
}

impl<T> EventListener for Rc<T>
where
    T: EventListener + ?Sized,
{
    fn listener_name(&self) -> &str {
        (**self).listener_name()
    }

    fn handle(&self, event: &SyntheticEvent) -> anyhow::Result<()> {
        (**self).handle(event)
    }
}

/// 以闭包实现的监听器
pub struct FnListener<F> {
    name: String,
    f: F,
}

impl<F> FnListener<F>
where
    F: Fn(&SyntheticEvent) -> anyhow::Result<()>,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> EventListener for FnListener<F>
where
    F: Fn(&SyntheticEvent) -> anyhow::Result<()>,
{
    fn listener_name(&self) -> &str {
        &self.name
    }

    fn handle(&self, event: &SyntheticEvent) -> anyhow::Result<()> {
        (self.f)(event)
    }
}
