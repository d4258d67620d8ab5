//! 合成事件统一错误定义
//!
//! 只有构造期与契约层面的错误会以 `EventError` 返回：未知种类、重复定义、
//! 跨种类释放、未知字段与非法配置。释放后访问等误用走诊断通道，不在此列。
//!
use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EventError {
    // --- 种类注册 ---
    #[error("unknown event kind: {kind}")]
    UnknownKind { kind: String },
    #[error("event kind already defined: {name}")]
    DuplicateKind { name: String },

    // --- 实例生命周期 ---
    #[error(
        "trying to release an event instance into a pool of a different type: expected={expected}, found={found}"
    )]
    KindMismatch { expected: String, found: String },
    #[error("unknown field: kind={kind}, field={field}")]
    UnknownField { kind: String, field: String },

    // --- 配置 ---
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },
}

/// 统一 Result 类型别名
pub type EventResult<T> = Result<T, EventError>;
