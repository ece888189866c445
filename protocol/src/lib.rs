//! 四子棋共享协议库
//!
//! 包含:
//! - 格子、棋盘、坐标等核心数据结构
//! - 连四胜利判定
//! - 消息类型定义 (ClientMessage, ServerMessage)
//! - 传输层抽象 (Connector, Connection, Listener traits)
//! - 帧编解码 (FrameReader, FrameWriter)
//! - 战绩记录格式 (JSON)

mod board;
mod cell;
mod constants;
mod error;
mod message;
mod record;
mod transport;
mod win;

pub use board::Board;
pub use cell::{Cell, Color, Position};
pub use constants::*;
pub use error::{GameError, ProtocolError, Result};
pub use message::{ClientMessage, ConnId, PlayerToken, ServerMessage, SessionId};
pub use record::{MatchRecord, RECORD_VERSION};
pub use transport::{
    Connection, Connector, FrameReader, FrameWriter, Listener, NetworkConfig, TcpConnection,
    TcpConnector, TcpListener,
};
pub use win::WinDetector;
