//! 连接器表
//!
//! 普通组件按角色（Down/Up/Peer）索引所连接的组件；Channel 按每个接入方的
//! 标识索引，每个接入方对应一个单元素列表。表只追加，在 `start()` 之前填充完毕。

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Weak;

use super::actor::ComponentCell;
use super::key::ComponentKey;

/// 连接器角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConnectorRole {
    Down,
    Up,
    Peer,
}

impl fmt::Display for ConnectorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorRole::Down => f.write_str("DOWN"),
            ConnectorRole::Up => f.write_str("UP"),
            ConnectorRole::Peer => f.write_str("PEER"),
        }
    }
}

/// 连接器表的键
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConnectorKey {
    Role(ConnectorRole),
    /// Channel 上某个接入方
    Attached(ComponentKey),
}

impl fmt::Display for ConnectorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorKey::Role(role) => role.fmt(f),
            ConnectorKey::Attached(key) => key.fmt(f),
        }
    }
}

/// 一条连接：目标组件的标识 + 弱引用（组件由 Registry 持有）
#[derive(Clone)]
pub(crate) struct Connection {
    pub(crate) key: ComponentKey,
    pub(crate) target: Weak<ComponentCell>,
}

#[derive(Default)]
pub(crate) struct ConnectorTable {
    entries: BTreeMap<ConnectorKey, Vec<Connection>>,
}

impl ConnectorTable {
    pub(crate) fn push(&mut self, key: ConnectorKey, conn: Connection) {
        self.entries.entry(key).or_default().push(conn);
    }

    pub(crate) fn get(&self, key: &ConnectorKey) -> &[Connection] {
        self.entries.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&ConnectorKey, &[Connection])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }
}
