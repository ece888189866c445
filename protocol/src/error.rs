//! 错误类型定义

use thiserror::Error;

/// 对局规则错误（非法落子，一律静默丢弃，仅用于服务端日志）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// 坐标越界
    #[error("Position out of range: ({row}, {column})")]
    OutOfRange { row: u8, column: u8 },

    /// 格子已被占用
    #[error("Cell already occupied: ({row}, {column})")]
    CellOccupied { row: u8, column: u8 },

    /// 不是该连接的回合
    #[error("Not your turn")]
    NotYourTurn,

    /// 对局已结束
    #[error("Game is already over")]
    GameOver,
}

/// 协议错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化错误（bincode）
    #[error("Bincode serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// JSON 序列化错误
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// 协议版本不匹配
    #[error("Protocol version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: u8, actual: u8 },

    /// 帧大小超限
    #[error("Frame too large: {size} bytes (max: {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// 连接超时
    #[error("Connection timeout")]
    ConnectionTimeout,

    /// 连接已关闭
    #[error("Connection closed")]
    ConnectionClosed,
}

impl ProtocolError {
    /// 是否为帧内容解码错误（帧已整帧读出，连接可以继续收下一帧）
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ProtocolError::Bincode(_))
    }
}

/// 协议操作结果类型
pub type Result<T> = std::result::Result<T, ProtocolError>;
