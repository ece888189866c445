//! 匹配队列
//!
//! 最多缓冲一个等待中的玩家；第二个加入者到达时按先到先红的规则配对。

use protocol::ConnId;

/// 等待配对的玩家
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPlayer {
    pub conn: ConnId,
    pub name: String,
}

/// join 的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// 入队等待对手
    Waiting,
    /// 同一连接重复加入，忽略
    AlreadyWaiting,
    /// 配对成功，red 为先到者
    Paired {
        red: PendingPlayer,
        black: PendingPlayer,
    },
}

/// 匹配队列状态机：Empty 或 Waiting(pending)
#[derive(Debug, Default)]
pub struct MatchQueue {
    pending: Option<PendingPlayer>,
}

impl MatchQueue {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// 加入队列。队列为空则入队等待，否则与等待者配对。
    pub fn join(&mut self, conn: ConnId, name: String) -> JoinOutcome {
        match self.pending.take() {
            None => {
                self.pending = Some(PendingPlayer { conn, name });
                JoinOutcome::Waiting
            }
            Some(waiting) if waiting.conn == conn => {
                // 同一连接不能与自己配对
                self.pending = Some(waiting);
                JoinOutcome::AlreadyWaiting
            }
            Some(waiting) => JoinOutcome::Paired {
                red: waiting,
                black: PendingPlayer { conn, name },
            },
        }
    }

    /// 取消等待。仅当等待者正是该连接时清空队列，否则无操作。
    pub fn cancel(&mut self, conn: ConnId) -> bool {
        if self.pending.as_ref().map(|p| p.conn) == Some(conn) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// 队列是否为空
    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }
}
