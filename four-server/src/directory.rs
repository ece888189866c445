//! 对局目录
//!
//! 连接到所属对局的 O(1) 映射；每个连接至多属于一个对局，
//! 对局终结或连接关闭时两个连接的条目恰好移除一次。

use std::collections::HashMap;

use protocol::{ConnId, SessionId};

use crate::session::GameSession;

/// 对局目录
#[derive(Debug, Default)]
pub struct SessionDirectory {
    /// 对局 ID -> 对局
    sessions: HashMap<SessionId, GameSession>,
    /// 连接 ID -> 所属对局 ID
    by_conn: HashMap<ConnId, SessionId>,
}

impl SessionDirectory {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
            by_conn: HashMap::new(),
        }
    }

    /// 登记新对局，同时为两个槽位的连接建立索引
    pub fn insert(&mut self, session: GameSession) {
        for slot in &session.slots {
            self.by_conn.insert(slot.conn, session.id.clone());
        }
        self.sessions.insert(session.id.clone(), session);
    }

    /// 连接是否在某个对局中
    pub fn contains_conn(&self, conn: ConnId) -> bool {
        self.by_conn.contains_key(&conn)
    }

    /// 查找连接所属的对局
    pub fn get_by_conn(&self, conn: ConnId) -> Option<&GameSession> {
        self.sessions.get(self.by_conn.get(&conn)?)
    }

    /// 查找连接所属的对局（可变）
    pub fn get_mut_by_conn(&mut self, conn: ConnId) -> Option<&mut GameSession> {
        let session_id = self.by_conn.get(&conn)?;
        self.sessions.get_mut(session_id)
    }

    /// 移除对局及其两个连接的索引。重复移除返回 None。
    pub fn remove(&mut self, session_id: &SessionId) -> Option<GameSession> {
        let session = self.sessions.remove(session_id)?;
        for slot in &session.slots {
            self.by_conn.remove(&slot.conn);
        }
        Some(session)
    }

    /// 当前对局数量
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
