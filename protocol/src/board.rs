//! 棋盘状态

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, Color, Position};
use crate::constants::{BOARD_COLS, BOARD_ROWS};
use crate::error::GameError;

/// 6x7 棋盘，下标为 row * 7 + column，row 0 为顶行，使用 Vec 以支持 serde
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: Vec<Cell>,
    /// 已落子数，恒等于非空格子数
    move_count: u32,
}

impl Board {
    /// 创建空棋盘
    pub fn new() -> Self {
        Self {
            cells: vec![Cell::Empty; BOARD_ROWS * BOARD_COLS],
            move_count: 0,
        }
    }

    /// 获取指定位置的格子（越界返回 Empty）
    pub fn get(&self, pos: Position) -> Cell {
        if pos.is_valid() {
            self.cells[pos.to_index()]
        } else {
            Cell::Empty
        }
    }

    /// 落子。越界或格子已占用时拒绝且不改变棋盘。
    pub fn place(&mut self, row: u8, column: u8, color: Color) -> Result<Position, GameError> {
        let pos = Position::new(row, column).ok_or(GameError::OutOfRange { row, column })?;
        if !self.cells[pos.to_index()].is_empty() {
            return Err(GameError::CellOccupied { row, column });
        }

        self.cells[pos.to_index()] = Cell::from(color);
        self.move_count += 1;
        Ok(pos)
    }

    /// 指定位置是否为指定颜色的棋子
    pub fn is_color(&self, row: i8, column: i8, color: Color) -> bool {
        if row < 0 || column < 0 {
            return false;
        }
        match Position::new(row as u8, column as u8) {
            Some(pos) => self.get(pos).color() == Some(color),
            None => false,
        }
    }

    /// 已落子数
    pub fn move_count(&self) -> u32 {
        self.move_count
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board() {
        let board = Board::new();
        assert_eq!(board.move_count(), 0);
        assert_eq!(board.get(Position::new_unchecked(0, 0)), Cell::Empty);
        assert_eq!(board.get(Position::new_unchecked(5, 6)), Cell::Empty);
    }

    #[test]
    fn test_place() {
        let mut board = Board::new();

        let pos = board.place(5, 3, Color::Red).unwrap();
        assert_eq!(pos, Position::new_unchecked(5, 3));
        assert_eq!(board.get(pos), Cell::Red);
        assert_eq!(board.move_count(), 1);
    }

    #[test]
    fn test_place_out_of_range() {
        let mut board = Board::new();

        assert_eq!(
            board.place(6, 0, Color::Red),
            Err(GameError::OutOfRange { row: 6, column: 0 })
        );
        assert_eq!(
            board.place(0, 7, Color::Red),
            Err(GameError::OutOfRange { row: 0, column: 7 })
        );
        assert_eq!(board.move_count(), 0);
    }

    #[test]
    fn test_place_occupied() {
        let mut board = Board::new();

        board.place(2, 2, Color::Red).unwrap();
        let result = board.place(2, 2, Color::Black);
        assert_eq!(result, Err(GameError::CellOccupied { row: 2, column: 2 }));

        // 拒绝后格子保持原色，计数不变
        assert_eq!(board.get(Position::new_unchecked(2, 2)), Cell::Red);
        assert_eq!(board.move_count(), 1);
    }

    #[test]
    fn test_move_count_matches_filled_cells() {
        let mut board = Board::new();

        board.place(0, 0, Color::Red).unwrap();
        board.place(0, 1, Color::Black).unwrap();
        board.place(0, 1, Color::Red).unwrap_err();
        board.place(1, 0, Color::Red).unwrap();

        let filled = (0..6u8)
            .flat_map(|r| (0..7u8).map(move |c| (r, c)))
            .filter(|&(r, c)| !board.get(Position::new_unchecked(r, c)).is_empty())
            .count();
        assert_eq!(board.move_count() as usize, filled);
    }
}
