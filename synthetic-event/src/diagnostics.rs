//! 释放后访问的误用诊断
//!
//! 实例释放后，其句柄上的每次字段读写或方法调用都会被拦截：返回无害的默认值
//! 或成为空操作，并在诊断开启时逐条上报给 `MisuseReporter`。
//!
use serde::Serialize;
use std::{fmt, rc::Rc};
use tracing::warn;

/// 被拦截的访问方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Access {
    GetProperty,
    SetProperty,
    CallMethod,
}

impl Access {
    fn action(self) -> &'static str {
        match self {
            Access::GetProperty => "accessing the property",
            Access::SetProperty => "setting the property",
            Access::CallMethod => "accessing the method",
        }
    }

    fn result(self) -> &'static str {
        match self {
            Access::GetProperty => "This is set to null",
            Access::SetProperty => "This is effectively a no-op",
            Access::CallMethod => "This is a no-op function",
        }
    }
}

/// 一次释放后访问
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleasedAccess {
    pub kind: String,
    pub member: String,
    pub access: Access,
}

impl fmt::Display for ReleasedAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "This synthetic event is reused for performance reasons. If you're seeing this, \
             you're {} `{}` on a released/nullified synthetic event. {}. \
             If you must keep the original synthetic event around, use event.persist().",
            self.access.action(),
            self.member,
            self.access.result(),
        )
    }
}

/// 误用上报通道
pub trait MisuseReporter {
    fn report(&self, misuse: &ReleasedAccess);
}

impl<T> MisuseReporter for Rc<T>
where
    T: MisuseReporter + ?Sized,
{
    fn report(&self, misuse: &ReleasedAccess) {
        (**self).report(misuse)
    }
}

/// 默认上报：输出 `warn` 级别的 tracing 事件
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl MisuseReporter for TracingReporter {
    fn report(&self, misuse: &ReleasedAccess) {
        warn!(
            target: "synthetic_event",
            kind = %misuse.kind,
            member = %misuse.member,
            access = ?misuse.access,
            "{misuse}"
        );
    }
}

/// 注册表内共享的诊断开关与上报通道
pub(crate) struct Diagnostics {
    enabled: bool,
    reporter: Box<dyn MisuseReporter>,
}

impl Diagnostics {
    pub(crate) fn new(enabled: bool, reporter: Box<dyn MisuseReporter>) -> Self {
        Self { enabled, reporter }
    }

    pub(crate) fn report(&self, kind: &str, member: &str, access: Access) {
        if !self.enabled {
            return;
        }
        self.reporter.report(&ReleasedAccess {
            kind: kind.to_string(),
            member: member.to_string(),
            access,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{Access, ReleasedAccess};

    #[test]
    fn message_names_member_action_and_persist() {
        let misuse = ReleasedAccess {
            kind: "MouseEvent".into(),
            member: "preventDefault".into(),
            access: Access::CallMethod,
        };
        let msg = misuse.to_string();
        assert!(msg.contains("accessing the method `preventDefault`"));
        assert!(msg.contains("This is a no-op function"));
        assert!(msg.contains("event.persist()"));
    }
}
