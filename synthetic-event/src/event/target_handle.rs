use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// 逻辑目标的不透明标识，区别于原生事件目标
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetHandle(String);

impl TargetHandle {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 作为字段值（如 `currentTarget`）写入实例时的表示
    pub fn to_value(&self) -> Value {
        Value::String(self.0.clone())
    }
}

impl fmt::Display for TargetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetHandle {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TargetHandle {
    fn from(value: String) -> Self {
        Self(value)
    }
}
