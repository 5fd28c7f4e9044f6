//! 组件标识
//!
//! 定义组件的 `(name, instance)` 标识符。

use std::fmt;
use std::sync::Arc;

/// 组件标识：`(name, instance)`，在一个 Registry 内唯一，构造后不可变。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentKey {
    name: Arc<str>,
    instance: Arc<str>,
}

impl ComponentKey {
    pub fn new(name: impl AsRef<str>, instance: impl fmt::Display) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
            instance: Arc::from(instance.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// `name.instance` 形式的唯一名称
    pub fn unique_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.name, self.instance)
    }
}
