//! 服务器主逻辑
//!
//! ConnectionHub：入站消息路由、配对、对局事件分发与连接清理。
//! 全部可变状态由单一事件循环持有，每个入站事件（消息或断开）
//! 处理完毕后才取下一个，对局状态不存在并发修改。

use std::collections::HashMap;

use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use protocol::{
    ClientMessage, Color, ConnId, Connection, FrameReader, FrameWriter, Listener, ServerMessage,
    SessionId, TcpListener, DRAW_WINNER, MAX_NAME_LEN,
};

use crate::directory::SessionDirectory;
use crate::ident::new_ident;
use crate::queue::{JoinOutcome, MatchQueue};
use crate::session::{GameSession, MoveOutcome, PlayerSlot};
use crate::storage::RecordStore;

/// 每个连接的出站消息缓冲大小
const OUTBOUND_BUFFER: usize = 64;

/// 中央事件通道缓冲大小
const EVENT_BUFFER: usize = 1024;

/// 入站事件
#[derive(Debug)]
pub enum HubEvent {
    /// 连接收到一条消息
    Message(ConnId, ClientMessage),
    /// 连接已断开
    Closed(ConnId),
}

/// 服务器状态。显式构造一次，按引用传入各处理函数。
pub struct HubState {
    /// 连接 ID -> 出站通道；键集合即当前打开的连接集合
    pub connections: HashMap<ConnId, mpsc::Sender<ServerMessage>>,
    pub queue: MatchQueue,
    pub directory: SessionDirectory,
    pub store: RecordStore,
}

impl HubState {
    pub fn new(store: RecordStore) -> Self {
        Self {
            connections: HashMap::new(),
            queue: MatchQueue::new(),
            directory: SessionDirectory::new(),
            store,
        }
    }

    /// 发送消息给指定连接。发送是尽力而为的，从不阻塞事件循环：
    /// 连接已关闭或通道已满导致的失败只记录日志，不影响对局状态。
    pub fn send_to(&self, conn: ConnId, msg: ServerMessage) {
        if let Some(tx) = self.connections.get(&conn) {
            if let Err(e) = tx.try_send(msg) {
                debug!(conn, error = %e, "出站消息丢弃");
            }
        }
    }
}

/// 待发送的消息，状态机处理结束后统一发出
struct PendingMessages {
    messages: Vec<(ConnId, ServerMessage)>,
}

impl PendingMessages {
    fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    fn send(&mut self, conn: ConnId, msg: ServerMessage) {
        self.messages.push((conn, msg));
    }

    fn flush(self, state: &HubState) {
        for (conn, msg) in self.messages {
            state.send_to(conn, msg);
        }
    }
}

/// 消息处理器
pub struct MessageHandler;

impl MessageHandler {
    /// 处理客户端消息，返回给发送方的直接回复（如有）
    pub fn handle(state: &mut HubState, conn: ConnId, msg: ClientMessage) -> Option<ServerMessage> {
        let mut pending = PendingMessages::new();

        let result = match msg {
            ClientMessage::Join { name } => Self::handle_join(state, &mut pending, conn, name),
            ClientMessage::Move { row, column } => {
                Self::handle_move(state, &mut pending, conn, row, column)
            }
        };

        pending.flush(state);

        result
    }

    /// 处理加入匹配
    fn handle_join(
        state: &mut HubState,
        pending: &mut PendingMessages,
        conn: ConnId,
        name: String,
    ) -> Option<ServerMessage> {
        if state.directory.contains_conn(conn) {
            debug!(conn, "连接已在对局中，加入请求忽略");
            return None;
        }

        let name: String = name.chars().take(MAX_NAME_LEN).collect();

        match state.queue.join(conn, name) {
            JoinOutcome::Waiting => Some(ServerMessage::Waiting),
            JoinOutcome::AlreadyWaiting => {
                debug!(conn, "连接已在等待中，加入请求忽略");
                None
            }
            JoinOutcome::Paired { red, black } => {
                let session_id: SessionId = new_ident();
                let red_slot = PlayerSlot::new(red.conn, red.name, Color::Red, new_ident());
                let black_slot = PlayerSlot::new(black.conn, black.name, Color::Black, new_ident());

                // 双方先收到 Init（颜色、对局 ID、身份令牌），再收到开局确认
                pending.send(
                    red_slot.conn,
                    ServerMessage::Init {
                        color: Color::Red,
                        session_id: session_id.clone(),
                        player_id: red_slot.token.clone(),
                    },
                );
                pending.send(
                    black_slot.conn,
                    ServerMessage::Init {
                        color: Color::Black,
                        session_id: session_id.clone(),
                        player_id: black_slot.token.clone(),
                    },
                );
                pending.send(
                    red_slot.conn,
                    ServerMessage::MatchStarted {
                        session_id: session_id.clone(),
                    },
                );

                info!(
                    %session_id,
                    red = %red_slot.name,
                    black = %black_slot.name,
                    "配对成功，对局开始"
                );

                let session = GameSession::new(session_id.clone(), red_slot, black_slot);
                state.directory.insert(session);

                // 后到者（黑方）的开局确认作为直接回复，在 Init 之后送达
                Some(ServerMessage::MatchStarted { session_id })
            }
        }
    }

    /// 处理落子
    fn handle_move(
        state: &mut HubState,
        pending: &mut PendingMessages,
        conn: ConnId,
        row: u8,
        column: u8,
    ) -> Option<ServerMessage> {
        let session = match state.directory.get_mut_by_conn(conn) {
            Some(session) => session,
            None => {
                debug!(conn, "连接不在任何对局中，落子丢弃");
                return None;
            }
        };
        let session_id = session.id.clone();

        let outcome = match session.handle_move(conn, row, column) {
            Ok(outcome) => outcome,
            Err(e) => {
                // 非法落子静默丢弃：不回发任何消息，状态不变
                debug!(conn, %session_id, error = %e, "非法落子丢弃");
                return None;
            }
        };

        match outcome {
            MoveOutcome::Placed { position, color } => {
                // 落子方客户端已乐观应用本手，只广播给对手
                if let Some(opponent) = session.opponent_of(conn) {
                    pending.send(
                        opponent.conn,
                        ServerMessage::MoveBroadcast {
                            row: position.row,
                            column: position.column,
                            color,
                        },
                    );
                }
                None
            }
            MoveOutcome::Won {
                position,
                color,
                run,
            } => {
                let winner = session.slot(color);
                let winner_conn = winner.conn;
                let winner_name = winner.name.clone();
                let loser_conn = session.slot(color.opponent()).conn;
                let player1 = session.slots[0].name.clone();
                let player2 = session.slots[1].name.clone();

                debug!(%session_id, winning_run = ?run, "连四达成");
                info!(%session_id, winner = %winner_name, "对局结束：连四");

                // 败方先收到制胜一手的广播，再收到终局消息；胜方只收终局消息
                pending.send(
                    loser_conn,
                    ServerMessage::MoveBroadcast {
                        row: position.row,
                        column: position.column,
                        color,
                    },
                );
                pending.send(
                    loser_conn,
                    ServerMessage::GameOver {
                        winner: color,
                        session_id: session_id.clone(),
                    },
                );
                pending.send(
                    winner_conn,
                    ServerMessage::GameOver {
                        winner: color,
                        session_id: session_id.clone(),
                    },
                );

                Self::record_and_remove(state, &session_id, &player1, &player2, &winner_name);
                None
            }
            MoveOutcome::Draw { .. } => {
                let conns = [session.slots[0].conn, session.slots[1].conn];
                let player1 = session.slots[0].name.clone();
                let player2 = session.slots[1].name.clone();

                info!(%session_id, "对局结束：和棋");

                for c in conns {
                    pending.send(
                        c,
                        ServerMessage::GameDraw {
                            session_id: session_id.clone(),
                        },
                    );
                }

                Self::record_and_remove(state, &session_id, &player1, &player2, DRAW_WINNER);
                None
            }
        }
    }

    /// 处理连接断开
    pub fn handle_disconnect(state: &mut HubState, conn: ConnId) {
        let mut pending = PendingMessages::new();

        // 1. 移除出站通道（即打开集合中的条目）
        state.connections.remove(&conn);

        // 2. 还在等待配对则清空队列；等待中断开不写战绩
        if state.queue.cancel(conn) {
            debug!(conn, "等待中的玩家断开，队列清空");
        }

        // 3. 对局中断开：判弃局，通知对手并记对手胜。
        //    对局已自然终结时目录里不再有条目，这里自然成为空操作。
        let teardown = state.directory.get_mut_by_conn(conn).map(|session| {
            let session_id = session.id.clone();
            let credited = session.abandon(conn).map(|winner_color| {
                let winner = session.slot(winner_color);
                (winner.conn, winner.name.clone())
            });
            let player1 = session.slots[0].name.clone();
            let player2 = session.slots[1].name.clone();
            (session_id, credited, player1, player2)
        });

        if let Some((session_id, credited, player1, player2)) = teardown {
            match credited {
                Some((winner_conn, winner_name)) => {
                    info!(%session_id, conn, winner = %winner_name, "对局中玩家断开，判弃局");
                    if state.connections.contains_key(&winner_conn) {
                        pending.send(winner_conn, ServerMessage::OpponentLeft);
                    }
                    Self::record_and_remove(state, &session_id, &player1, &player2, &winner_name);
                }
                None => {
                    // 与自然终局竞争时对局可能已终结：只清理目录，不重复记录
                    state.directory.remove(&session_id);
                }
            }
        }

        pending.flush(state);
    }

    /// 写入终局记录并将对局从目录移除。
    /// 写入失败只记录日志，终局消息已发出，目录照常清理。
    fn record_and_remove(
        state: &mut HubState,
        session_id: &SessionId,
        player1: &str,
        player2: &str,
        winner: &str,
    ) {
        match state.store.create_record(player1, player2, winner) {
            Ok(record) => debug!(%session_id, winner = %record.winner, "战绩已写入"),
            Err(e) => error!(%session_id, error = %e, "战绩写入失败"),
        }
        state.directory.remove(session_id);
    }
}

/// 运行服务器：接受连接，并在单一事件循环中串行处理全部入站事件
pub async fn run(mut listener: TcpListener, mut state: HubState) -> anyhow::Result<()> {
    let (event_tx, mut event_rx) = mpsc::channel::<HubEvent>(EVENT_BUFFER);
    let mut next_conn_id: ConnId = 1;

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok(conn) => {
                        let conn_id = next_conn_id;
                        next_conn_id += 1;

                        let peer = conn.peer_addr();
                        info!(conn_id, ?peer, "新连接接入");

                        let (out_tx, out_rx) = mpsc::channel(OUTBOUND_BUFFER);
                        state.connections.insert(conn_id, out_tx);

                        let (reader, writer) = conn.split();
                        tokio::spawn(read_loop(conn_id, reader, event_tx.clone()));
                        tokio::spawn(write_loop(conn_id, writer, out_rx));
                    }
                    Err(e) => warn!(error = %e, "接受连接失败"),
                }
            }
            event = event_rx.recv() => {
                let Some(event) = event else { break };
                match event {
                    HubEvent::Message(conn_id, msg) => {
                        if let Some(reply) = MessageHandler::handle(&mut state, conn_id, msg) {
                            state.send_to(conn_id, reply);
                        }
                    }
                    HubEvent::Closed(conn_id) => {
                        info!(conn_id, "连接断开");
                        MessageHandler::handle_disconnect(&mut state, conn_id);
                    }
                }
            }
        }
    }

    Ok(())
}

/// 连接读取循环：解码帧并转发到中央事件通道
async fn read_loop(
    conn_id: ConnId,
    mut reader: FrameReader<OwnedReadHalf>,
    events: mpsc::Sender<HubEvent>,
) {
    loop {
        match reader.read_frame::<ClientMessage>().await {
            Ok(msg) => {
                if events.send(HubEvent::Message(conn_id, msg)).await.is_err() {
                    return;
                }
            }
            Err(e) if e.is_recoverable() => {
                // 帧体解码失败：该帧已整帧消费，记录后继续收，连接保持打开
                warn!(conn_id, error = %e, "消息解码失败，丢弃该帧");
            }
            Err(e) => {
                debug!(conn_id, error = %e, "读取结束");
                let _ = events.send(HubEvent::Closed(conn_id)).await;
                return;
            }
        }
    }
}

/// 连接写入循环：把出站消息写入套接字，失败仅记录
async fn write_loop(
    conn_id: ConnId,
    mut writer: FrameWriter<OwnedWriteHalf>,
    mut outbound: mpsc::Receiver<ServerMessage>,
) {
    while let Some(msg) = outbound.recv().await {
        if let Err(e) = writer.write_frame(&msg).await {
            debug!(conn_id, error = %e, "消息发送失败");
            return;
        }
    }
}
