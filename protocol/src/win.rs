//! 连四胜利判定
//!
//! 以最后落子点为起点沿四个轴向扫描连子，纯函数，不含 I/O。

use crate::board::Board;
use crate::cell::{Color, Position};
use crate::constants::WIN_LENGTH;

/// 扫描轴向，按固定顺序：横向、纵向、右下斜、左下斜。
/// 第一个连子数达到 4 的轴向即为胜利结果，轴向之间不比较长短。
const AXES: [(i8, i8); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// 胜利判定器
pub struct WinDetector;

impl WinDetector {
    /// 判定刚落在 (row, column) 的 color 棋子是否构成连四。
    /// 构成时返回获胜连线（包含落子点本身，顺序不保证）。
    pub fn detect(board: &Board, row: u8, column: u8, color: Color) -> Option<Vec<Position>> {
        for (dr, dc) in AXES {
            let run = Self::scan_axis(board, row, column, color, dr, dc);
            if run.len() >= WIN_LENGTH {
                return Some(run);
            }
        }
        None
    }

    /// 沿单个轴向收集经过落子点的同色连线：
    /// 先沿正方向走到断点，再沿负方向走到断点。
    fn scan_axis(
        board: &Board,
        row: u8,
        column: u8,
        color: Color,
        dr: i8,
        dc: i8,
    ) -> Vec<Position> {
        let mut run = vec![Position::new_unchecked(row, column)];

        let mut r = row as i8 + dr;
        let mut c = column as i8 + dc;
        while board.is_color(r, c, color) {
            run.push(Position::new_unchecked(r as u8, c as u8));
            r += dr;
            c += dc;
        }

        let mut r = row as i8 - dr;
        let mut c = column as i8 - dc;
        while board.is_color(r, c, color) {
            run.push(Position::new_unchecked(r as u8, c as u8));
            r -= dr;
            c -= dc;
        }

        run
    }
}
