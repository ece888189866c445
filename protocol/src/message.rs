//! 消息类型定义

use serde::{Deserialize, Serialize};

use crate::cell::Color;

/// 连接 ID（接入时由服务端分配，连接存续期内唯一）
pub type ConnId = u64;

/// 对局 ID（不透明随机字符串）
pub type SessionId = String;

/// 玩家身份令牌（不透明随机字符串，配对时下发给客户端）
pub type PlayerToken = String;

/// 客户端发送给服务端的消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClientMessage {
    /// 加入匹配队列
    Join { name: String },
    /// 落子
    Move { row: u8, column: u8 },
}

/// 服务端发送给客户端的消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ServerMessage {
    // === 匹配 ===
    /// 正在等待对手
    Waiting,
    /// 配对成功，告知己方颜色、对局 ID 与身份令牌
    Init {
        color: Color,
        session_id: SessionId,
        player_id: PlayerToken,
    },
    /// 对局开始确认
    MatchStarted { session_id: SessionId },

    // === 对局事件 ===
    /// 对方落子（只发给落子方的对手）
    MoveBroadcast { row: u8, column: u8, color: Color },
    /// 对局结束，winner 为获胜颜色
    GameOver { winner: Color, session_id: SessionId },
    /// 和棋（winner 隐含为空）
    GameDraw { session_id: SessionId },
    /// 对手离开
    OpponentLeft,
}
