//! 组件层错误类型

use thiserror::Error;

use super::event::EventKind;
use super::key::ComponentKey;

/// 事件处理函数返回的错误。只在分发边界记录日志，不会回传给发送者。
#[derive(Debug, Error)]
pub enum HandlerError {
    /// 组件没有为该事件类别实现处理函数
    #[error("handler not implemented for event kind `{0}`")]
    Unhandled(EventKind),
    #[error("unexpected payload type, expected `{expected}`")]
    PayloadType { expected: &'static str },
    #[error("handler failed: {0}")]
    Failed(String),
}

impl HandlerError {
    pub fn failed(msg: impl Into<String>) -> Self {
        HandlerError::Failed(msg.into())
    }
}

/// 处理函数的返回值
pub type HandlerResult = Result<(), HandlerError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("component `{0}` is already registered")]
    DuplicateKey(ComponentKey),
    #[error("registry init broadcast already ran")]
    AlreadyInitialized,
}
