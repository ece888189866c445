//! 战绩记录格式
//!
//! 每局终局写入一条 JSON 记录，只追加不修改。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::DRAW_WINNER;

/// 记录格式版本
pub const RECORD_VERSION: &str = "1.0";

/// 一局对局的终局记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    /// 版本号
    pub version: String,
    /// 红方玩家名（slot 0）
    pub player1: String,
    /// 黑方玩家名（slot 1）
    pub player2: String,
    /// 胜者玩家名，和棋为 "draw"
    pub winner: String,
    /// 记录时间
    pub created_at: DateTime<Utc>,
}

impl MatchRecord {
    /// 创建新记录
    pub fn new(player1: String, player2: String, winner: String) -> Self {
        Self {
            version: RECORD_VERSION.to_string(),
            player1,
            player2,
            winner,
            created_at: Utc::now(),
        }
    }

    /// 创建和棋记录
    pub fn draw(player1: String, player2: String) -> Self {
        Self::new(player1, player2, DRAW_WINNER.to_string())
    }

    /// 是否为和棋记录
    pub fn is_draw(&self) -> bool {
        self.winner == DRAW_WINNER
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
