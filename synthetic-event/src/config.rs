//! 对象池配置
//!
use crate::error::{EventError, EventResult};
use bon::Builder;
use serde::{Deserialize, Serialize};

/// 每个种类空闲实例的默认上限
pub const DEFAULT_POOL_CAPACITY: usize = 10;

/// 注册表级别的池化与诊断配置，对其下所有种类生效
#[derive(Builder, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// 单个种类池中最多保留的空闲实例数，超出部分直接丢弃
    #[builder(default = DEFAULT_POOL_CAPACITY)]
    capacity: usize,
    /// 是否上报释放后访问；默认仅在 debug 构建中开启
    #[builder(default = cfg!(debug_assertions))]
    diagnostics: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_POOL_CAPACITY,
            diagnostics: cfg!(debug_assertions),
        }
    }
}

impl PoolConfig {
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn diagnostics(&self) -> bool {
        self.diagnostics
    }

    pub(crate) fn validate(&self) -> EventResult<()> {
        if self.capacity == 0 {
            return Err(EventError::InvalidConfig {
                reason: "pool capacity must be > 0".into(),
            });
        }
        Ok(())
    }
}
