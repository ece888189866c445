//! 对局会话
//!
//! 一局比赛的状态机：两个玩家槽位、棋盘、状态。
//! 所有落子校验都在这里完成，非法落子一律静默拒绝（不回发任何消息）。

use protocol::{
    Board, Color, GameError, PlayerToken, Position, SessionId, WinDetector, ConnId, TOTAL_CELLS,
};

/// 玩家槽位。slot 0 恒为红方（先到者），slot 1 恒为黑方。
#[derive(Debug, Clone)]
pub struct PlayerSlot {
    pub conn: ConnId,
    pub name: String,
    pub color: Color,
    pub token: PlayerToken,
}

impl PlayerSlot {
    pub fn new(conn: ConnId, name: String, color: Color, token: PlayerToken) -> Self {
        Self {
            conn,
            name,
            color,
            token,
        }
    }
}

/// 对局状态。InProgress 为唯一可落子状态，转移单向不可逆。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// 进行中
    InProgress,
    /// 连四获胜
    Won(Color),
    /// 满盘和棋
    Draw,
    /// 玩家中途离开
    Abandoned,
}

/// 一次合法落子的结果
#[derive(Debug, Clone)]
pub enum MoveOutcome {
    /// 普通落子，对局继续
    Placed { position: Position, color: Color },
    /// 落子构成连四
    Won {
        position: Position,
        color: Color,
        run: Vec<Position>,
    },
    /// 第 42 子落下且无连四
    Draw { position: Position, color: Color },
}

/// 对局会话
#[derive(Debug)]
pub struct GameSession {
    pub id: SessionId,
    pub slots: [PlayerSlot; 2],
    pub board: Board,
    status: SessionStatus,
}

impl GameSession {
    /// 创建新对局，red 放入 slot 0，black 放入 slot 1
    pub fn new(id: SessionId, red: PlayerSlot, black: PlayerSlot) -> Self {
        debug_assert_eq!(red.color, Color::Red);
        debug_assert_eq!(black.color, Color::Black);
        Self {
            id,
            slots: [red, black],
            board: Board::new(),
            status: SessionStatus::InProgress,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == SessionStatus::InProgress
    }

    /// 当前应落子的颜色：偶数步为红方，奇数步为黑方
    pub fn expected_color(&self) -> Color {
        if self.board.move_count() % 2 == 0 {
            Color::Red
        } else {
            Color::Black
        }
    }

    /// 该连接对应的槽位
    pub fn slot_of(&self, conn: ConnId) -> Option<&PlayerSlot> {
        self.slots.iter().find(|s| s.conn == conn)
    }

    /// 该连接的对手槽位
    pub fn opponent_of(&self, conn: ConnId) -> Option<&PlayerSlot> {
        self.slot_of(conn)
            .map(|s| self.slot(s.color.opponent()))
    }

    /// 指定颜色的槽位
    pub fn slot(&self, color: Color) -> &PlayerSlot {
        match color {
            Color::Red => &self.slots[0],
            Color::Black => &self.slots[1],
        }
    }

    /// 处理落子请求。
    /// 任何非法情形（对局已结束、不是该连接的回合、坐标非法、格子已占用）
    /// 都返回错误且不改变任何状态，由调用方记日志后丢弃。
    pub fn handle_move(
        &mut self,
        conn: ConnId,
        row: u8,
        column: u8,
    ) -> Result<MoveOutcome, GameError> {
        if !self.is_in_progress() {
            return Err(GameError::GameOver);
        }

        let expected = self.expected_color();
        let mover = self.slot_of(conn).ok_or(GameError::NotYourTurn)?;
        if mover.color != expected {
            return Err(GameError::NotYourTurn);
        }

        let position = self.board.place(row, column, expected)?;

        if let Some(run) = WinDetector::detect(&self.board, row, column, expected) {
            self.status = SessionStatus::Won(expected);
            return Ok(MoveOutcome::Won {
                position,
                color: expected,
                run,
            });
        }

        if self.board.move_count() == TOTAL_CELLS {
            self.status = SessionStatus::Draw;
            return Ok(MoveOutcome::Draw {
                position,
                color: expected,
            });
        }

        Ok(MoveOutcome::Placed {
            position,
            color: expected,
        })
    }

    /// 玩家离开：进行中的对局判弃，返回获胜方颜色。
    /// 对局已终结时返回 None，不发生任何状态变化。
    pub fn abandon(&mut self, leaver: ConnId) -> Option<Color> {
        if !self.is_in_progress() {
            return None;
        }
        let winner = self.slot_of(leaver)?.color.opponent();
        self.status = SessionStatus::Abandoned;
        Some(winner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::Cell;

    const RED_CONN: ConnId = 1;
    const BLACK_CONN: ConnId = 2;

    fn make_session() -> GameSession {
        GameSession::new(
            "session-1".to_string(),
            PlayerSlot::new(RED_CONN, "Ann".to_string(), Color::Red, "tok-red".to_string()),
            PlayerSlot::new(
                BLACK_CONN,
                "Bob".to_string(),
                Color::Black,
                "tok-black".to_string(),
            ),
        )
    }

    #[test]
    fn test_turn_alternation() {
        let mut session = make_session();

        assert_eq!(session.expected_color(), Color::Red);
        assert!(session.handle_move(RED_CONN, 5, 3).is_ok());

        assert_eq!(session.expected_color(), Color::Black);
        assert!(session.handle_move(BLACK_CONN, 5, 0).is_ok());

        assert_eq!(session.expected_color(), Color::Red);
    }

    #[test]
    fn test_wrong_turn_rejected_without_state_change() {
        let mut session = make_session();

        let result = session.handle_move(BLACK_CONN, 5, 0);
        assert_eq!(result.unwrap_err(), GameError::NotYourTurn);

        assert_eq!(session.board.move_count(), 0);
        assert_eq!(session.board.get(Position::new_unchecked(5, 0)), Cell::Empty);
        // 红方仍可正常落子
        assert!(session.handle_move(RED_CONN, 5, 0).is_ok());
    }

    #[test]
    fn test_unknown_conn_rejected() {
        let mut session = make_session();
        assert_eq!(
            session.handle_move(99, 5, 0).unwrap_err(),
            GameError::NotYourTurn
        );
    }

    #[test]
    fn test_occupied_cell_rejected() {
        let mut session = make_session();

        session.handle_move(RED_CONN, 5, 3).unwrap();
        let result = session.handle_move(BLACK_CONN, 5, 3);
        assert_eq!(
            result.unwrap_err(),
            GameError::CellOccupied { row: 5, column: 3 }
        );

        // 写一次后格子颜色不再改变
        assert_eq!(session.board.get(Position::new_unchecked(5, 3)), Cell::Red);
        // 回合未被消耗
        assert_eq!(session.expected_color(), Color::Black);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut session = make_session();
        assert_eq!(
            session.handle_move(RED_CONN, 9, 9).unwrap_err(),
            GameError::OutOfRange { row: 9, column: 9 }
        );
        assert_eq!(session.board.move_count(), 0);
    }

    #[test]
    fn test_vertical_win() {
        let mut session = make_session();

        // 黑方在 0 列纵向连四，红方落子分散
        session.handle_move(RED_CONN, 5, 3).unwrap();
        session.handle_move(BLACK_CONN, 5, 0).unwrap();
        session.handle_move(RED_CONN, 5, 4).unwrap();
        session.handle_move(BLACK_CONN, 4, 0).unwrap();
        session.handle_move(RED_CONN, 5, 6).unwrap();
        session.handle_move(BLACK_CONN, 3, 0).unwrap();
        session.handle_move(RED_CONN, 0, 0).unwrap();

        let outcome = session.handle_move(BLACK_CONN, 2, 0).unwrap();
        match outcome {
            MoveOutcome::Won {
                position,
                color,
                run,
            } => {
                assert_eq!(position, Position::new_unchecked(2, 0));
                assert_eq!(color, Color::Black);
                assert_eq!(run.len(), 4);
                assert!(run.iter().all(|p| p.column == 0));
            }
            _ => panic!("Expected win"),
        }
        assert_eq!(session.status(), SessionStatus::Won(Color::Black));
    }

    #[test]
    fn test_no_moves_after_terminal() {
        let mut session = make_session();

        session.handle_move(RED_CONN, 5, 3).unwrap();
        session.handle_move(BLACK_CONN, 5, 0).unwrap();
        session.handle_move(RED_CONN, 5, 4).unwrap();
        session.handle_move(BLACK_CONN, 4, 0).unwrap();
        session.handle_move(RED_CONN, 5, 6).unwrap();
        session.handle_move(BLACK_CONN, 3, 0).unwrap();
        session.handle_move(RED_CONN, 0, 0).unwrap();
        session.handle_move(BLACK_CONN, 2, 0).unwrap();

        let count = session.board.move_count();
        assert_eq!(
            session.handle_move(RED_CONN, 5, 5).unwrap_err(),
            GameError::GameOver
        );
        assert_eq!(session.board.move_count(), count);
    }

    /// 满盘无连四的填法：(column + row / 2) 奇偶决定颜色，
    /// 横向连长 1、纵向连长 2、斜向连长 2，均不足 4。
    fn pattern_color(row: u8, column: u8) -> Color {
        if (column as u32 + row as u32 / 2) % 2 == 0 {
            Color::Red
        } else {
            Color::Black
        }
    }

    #[test]
    fn test_draw_on_move_42() {
        let mut session = make_session();

        // 直接铺满前 41 个格子，留下 (5, 1)（按填法应为黑子）
        for row in 0..6u8 {
            for column in 0..7u8 {
                if (row, column) == (5, 1) {
                    continue;
                }
                session
                    .board
                    .place(row, column, pattern_color(row, column))
                    .unwrap();
            }
        }
        assert_eq!(session.board.move_count(), 41);
        // 41 步已落，轮到黑方
        assert_eq!(session.expected_color(), Color::Black);

        let outcome = session.handle_move(BLACK_CONN, 5, 1).unwrap();
        assert!(matches!(outcome, MoveOutcome::Draw { .. }));
        assert_eq!(session.status(), SessionStatus::Draw);

        // 和棋后不再接受落子
        assert_eq!(
            session.handle_move(RED_CONN, 0, 0).unwrap_err(),
            GameError::GameOver
        );
    }

    #[test]
    fn test_abandon() {
        let mut session = make_session();

        let winner = session.abandon(RED_CONN);
        assert_eq!(winner, Some(Color::Black));
        assert_eq!(session.status(), SessionStatus::Abandoned);

        // 已终结的对局再次弃局无效果
        assert_eq!(session.abandon(BLACK_CONN), None);
        assert_eq!(session.status(), SessionStatus::Abandoned);
    }

    #[test]
    fn test_abandon_after_win_is_noop() {
        let mut session = make_session();

        session.handle_move(RED_CONN, 5, 0).unwrap();
        session.handle_move(BLACK_CONN, 4, 0).unwrap();
        session.handle_move(RED_CONN, 5, 1).unwrap();
        session.handle_move(BLACK_CONN, 4, 1).unwrap();
        session.handle_move(RED_CONN, 5, 2).unwrap();
        session.handle_move(BLACK_CONN, 4, 2).unwrap();
        let outcome = session.handle_move(RED_CONN, 5, 3).unwrap();
        assert!(matches!(outcome, MoveOutcome::Won { .. }));

        assert_eq!(session.abandon(BLACK_CONN), None);
        assert_eq!(session.status(), SessionStatus::Won(Color::Red));
    }
}
