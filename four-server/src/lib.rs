//! 四子棋服务端
//!
//! 包含:
//! - 匹配队列
//! - 对局会话与目录
//! - 连接路由与清理
//! - 战绩存储

pub mod directory;
pub mod ident;
pub mod queue;
pub mod server;
pub mod session;
pub mod storage;

pub use directory::SessionDirectory;
pub use ident::new_ident;
pub use queue::{JoinOutcome, MatchQueue, PendingPlayer};
pub use server::{run, HubEvent, HubState, MessageHandler};
pub use session::{GameSession, MoveOutcome, PlayerSlot, SessionStatus};
pub use storage::RecordStore;
