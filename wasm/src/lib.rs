use minesweeper_ai as ms;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn create_board(height: usize, width: usize, mines: usize) -> Result<Vec<u8>, String> {
    console_error_panic_hook::set_once();

    let board = ms::Board::new(height, width, mines, &mut rand::rng()).map_err(|e| e.to_string())?;
    board.serialize().map_err(|e| e.to_string())
}

#[wasm_bindgen]
pub fn create_agent(height: usize, width: usize) -> Result<Vec<u8>, String> {
    console_error_panic_hook::set_once();

    ms::Agent::new(height, width)
        .serialize()
        .map_err(|e| e.to_string())
}

/// Adjacent mine count for the cell, or -1 if it holds a mine.
#[wasm_bindgen]
pub fn reveal(board: Vec<u8>, row: usize, col: usize) -> Result<i8, String> {
    console_error_panic_hook::set_once();

    let board = ms::Board::deserialize(&board).map_err(|e| e.to_string())?;
    let cell = ms::Cell { row, col };
    if !board.contains(cell) {
        return Err(format!("cell {} is off the board", cell));
    }
    if board.is_mine(cell) {
        return Ok(-1);
    }
    Ok(board.adjacent_mine_count(cell) as i8)
}

#[wasm_bindgen]
pub fn observe(agent: Vec<u8>, row: usize, col: usize, count: usize) -> Result<Vec<u8>, String> {
    console_error_panic_hook::set_once();

    let mut agent = ms::Agent::deserialize(&agent).map_err(|e| e.to_string())?;
    agent
        .observe(ms::Cell { row, col }, count)
        .map_err(|e| e.to_string())?;
    agent.serialize().map_err(|e| e.to_string())
}

/// `[row, col]` of the next move, a proven safe cell when one is known.
/// Empty when nothing is left to play.
#[wasm_bindgen]
pub fn next_move(agent: Vec<u8>) -> Result<Vec<usize>, String> {
    console_error_panic_hook::set_once();

    let agent = ms::Agent::deserialize(&agent).map_err(|e| e.to_string())?;
    let cell = agent
        .safe_move()
        .or_else(|| agent.random_move(&mut rand::rng()));
    Ok(cell.map(|c| vec![c.row, c.col]).unwrap_or_default())
}

/// Deduced mines, flattened as `row, col` pairs.
#[wasm_bindgen]
pub fn known_mines(agent: Vec<u8>) -> Result<Vec<usize>, String> {
    console_error_panic_hook::set_once();

    let agent = ms::Agent::deserialize(&agent).map_err(|e| e.to_string())?;
    let mut mines: Vec<ms::Cell> = agent.mines().iter().copied().collect();
    mines.sort();
    Ok(mines.into_iter().flat_map(|c| [c.row, c.col]).collect())
}

/// Flags the agent's deduced mines on the board and reports a win.
#[wasm_bindgen]
pub fn is_won(board: Vec<u8>, agent: Vec<u8>) -> Result<bool, String> {
    console_error_panic_hook::set_once();

    let mut board = ms::Board::deserialize(&board).map_err(|e| e.to_string())?;
    let agent = ms::Agent::deserialize(&agent).map_err(|e| e.to_string())?;
    for &mine in agent.mines() {
        board.flag(mine);
    }
    Ok(board.won())
}
