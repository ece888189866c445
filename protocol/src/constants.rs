//! 协议常量定义

use std::time::Duration;

/// 协议版本号
pub const PROTOCOL_VERSION: u8 = 1;

/// 棋盘行数
pub const BOARD_ROWS: usize = 6;

/// 棋盘列数
pub const BOARD_COLS: usize = 7;

/// 棋盘格子总数（满盘即和棋）
pub const TOTAL_CELLS: u32 = (BOARD_ROWS * BOARD_COLS) as u32;

/// 获胜所需的连子数
pub const WIN_LENGTH: usize = 4;

/// 玩家名称最大长度
pub const MAX_NAME_LEN: usize = 20;

/// 不透明 ID（对局 ID / 玩家令牌）长度
pub const IDENT_LEN: usize = 16;

/// 战绩记录中表示和棋的胜者字段值
pub const DRAW_WINNER: &str = "draw";

/// 消息帧最大大小
pub const MAX_FRAME_SIZE: usize = 65536;

/// 连接超时（秒）
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// 连接超时 Duration
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(CONNECT_TIMEOUT_SECS);
