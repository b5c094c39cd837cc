use crate::components::{RenderCell, Status};
use crate::config::DisplayConfig;
use crate::engine::RenderState;
use crate::game::{BOARD_HEIGHT, BOARD_WIDTH, ScoreRank, lines_for_next_level};
use crate::shapes::PieceKind;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

// Each cell is 2 characters wide and 1 tall to look roughly square
const CELL_WIDTH: u16 = 2;
const INFO_WIDTH: u16 = 24;

#[must_use]
pub fn board_size() -> (u16, u16) {
    (
        BOARD_WIDTH as u16 * CELL_WIDTH + 2,
        BOARD_HEIGHT as u16 + 2,
    )
}

pub fn render(f: &mut Frame, state: &RenderState, display: &DisplayConfig) {
    let (board_width, board_height) = board_size();
    let min_total_width = board_width + INFO_WIDTH;
    let min_total_height = board_height + 2;

    // Check if the terminal is too small to render the game properly
    if f.area().width < min_total_width || f.area().height < min_total_height {
        let warning_text = Paragraph::new(
            "Terminal too small!\nPlease resize your terminal\nto continue playing.",
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Blockfall"));
        f.render_widget(warning_text, centered_rect(60, 40, f.area()));
        return;
    }

    let play_area = centered_fixed(min_total_width, min_total_height, f.area());
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(board_width), Constraint::Length(INFO_WIDTH)])
        .split(play_area);

    let game_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(board_height)])
        .split(main_layout[0]);

    let title = Paragraph::new("BLOCKFALL")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, game_layout[0]);

    render_game_board(f, state, game_layout[1]);
    render_info(f, state, display, main_layout[1]);

    match state.status {
        Status::Idle => render_banner(
            f,
            game_layout[1],
            "Press S or Enter\nto start",
            Color::Yellow,
        ),
        Status::Paused => render_banner(f, game_layout[1], "PAUSED\nP to resume", Color::Yellow),
        Status::Over => render_game_over(f, state, game_layout[1]),
        Status::Running => {
            if let Some(level) = state.level_up {
                let text = format!(
                    "LEVEL {level}!\nSpeed up!\nNext: {} lines",
                    lines_for_next_level(level)
                );
                render_banner(f, game_layout[1], &text, Color::LightYellow);
            }
        }
    }
}

fn render_game_board(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    for (y, row) in state.board.iter().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            let Some(kind) = cell.kind() else {
                continue;
            };
            let symbol = match cell {
                RenderCell::Current(_) => "▓",
                _ => "█",
            };
            let block_x = inner_area.left() + x as u16 * CELL_WIDTH;
            let block_y = inner_area.top() + y as u16;
            draw_cell(f, block_x, block_y, inner_area, symbol, kind.color());
        }
    }
}

fn draw_cell(f: &mut Frame, x: u16, y: u16, clip: Rect, symbol: &str, color: Color) {
    for dx in 0..CELL_WIDTH {
        if x + dx >= clip.right() || y >= clip.bottom() {
            continue;
        }
        if let Some(cell) = f.buffer_mut().cell_mut((x + dx, y)) {
            cell.set_symbol(symbol);
            cell.set_fg(color);
            cell.set_bg(Color::Black);
        }
    }
}

fn render_info(f: &mut Frame, state: &RenderState, display: &DisplayConfig, area: Rect) {
    let info_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(4), // Score, level, lines
            Constraint::Length(6), // Next piece
            Constraint::Length(4), // Best
            Constraint::Min(3),    // Controls
        ])
        .split(area);

    let info_title = Paragraph::new("INFO")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(info_title, info_layout[0]);

    let status_text = match state.status {
        Status::Idle => "READY",
        Status::Running => "PLAYING",
        Status::Paused => "PAUSED",
        Status::Over => "GAME OVER",
    };
    let basic_stats = format!(
        " Score: {}\n Level: {}\n Lines: {}\n {status_text}",
        state.score, state.level, state.lines
    );
    f.render_widget(
        Paragraph::new(basic_stats).wrap(Wrap { trim: false }),
        info_layout[1],
    );

    if display.show_next {
        render_next_piece(f, state.next, info_layout[2]);
    }

    if display.show_best {
        let best = format!(
            " Best: {}\n Level {} / {} lines",
            state.best.score, state.best.level, state.best.lines
        );
        f.render_widget(
            Paragraph::new(best).block(Block::default().borders(Borders::TOP).title("Record")),
            info_layout[3],
        );
    }

    let controls = Paragraph::new(
        "←/→: Move\n\
        ↓: Soft drop\n\
        ↑/Space: Rotate\n\
        Enter: Hard drop\n\
        P: Pause  S: Start\n\
        R: Reset  C: Clear best\n\
        Q: Quit",
    )
    .block(Block::default().borders(Borders::TOP))
    .wrap(Wrap { trim: true });
    f.render_widget(controls, info_layout[4]);
}

pub fn render_next_piece(f: &mut Frame, kind: PieceKind, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Next");
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    for (dx, dy) in kind.cells(0) {
        let x = inner_area.left() + 1 + dx as u16 * CELL_WIDTH;
        // Spawn bitmaps leave their first row empty
        let y = inner_area.top() + (dy - kind.top_row(0)) as u16;
        draw_cell(f, x, y, inner_area, "█", kind.color());
    }
}

fn render_game_over(f: &mut Frame, state: &RenderState, area: Rect) {
    let rank = ScoreRank::for_score(state.score);
    let mut text = format!(
        "GAME OVER\n{}\n\nScore: {}\nLevel: {}\nLines: {}",
        rank.message(),
        state.score,
        state.level,
        state.lines
    );
    if state.new_record {
        text.push_str("\n\nNEW RECORD!");
    }
    text.push_str("\n\nS: play again");
    render_banner(f, area, &text, Color::Red);
}

fn render_banner(f: &mut Frame, area: Rect, text: &str, color: Color) {
    let height = text.lines().count() as u16 + 2;
    let banner_area = centered_fixed(area.width.saturating_sub(2), height, area);
    f.render_widget(Clear, banner_area);
    f.render_widget(
        Paragraph::new(text.to_string())
            .alignment(Alignment::Center)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL)),
        banner_area,
    );
}

/// Rect of at most `width` x `height`, centred in `r`.
#[must_use]
pub fn centered_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

/// Helper function to create a centered rect using up certain percentage of the available rect
#[must_use]
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
