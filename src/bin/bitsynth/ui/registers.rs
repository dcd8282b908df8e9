//! Live register table

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use bitsynth::{
    protocol::ProtocolEngine,
    registers::map::{Access, REGISTERS},
};

/// Every register with its current value as the host reads it. Write-only
/// ports show as `--`.
pub fn render_registers(frame: &mut Frame, area: Rect, engine: &ProtocolEngine) {
    let block = Block::default()
        .title(" Registers ")
        .borders(Borders::ALL);

    let rows = REGISTERS.iter().map(|info| {
        let value = engine.read(info.address);
        let (text, style) = match info.access {
            Access::WriteOnly => ("--".to_string(), Style::default().fg(Color::DarkGray)),
            Access::ReadOnly => (format!("{value:02X}"), Style::default().fg(Color::Yellow)),
            Access::ReadWrite if value != info.default => (
                format!("{value:02X}"),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Access::ReadWrite => (format!("{value:02X}"), Style::default().fg(Color::White)),
        };
        Row::new(vec![
            Cell::from(format!("{:02X}", info.address)).style(Style::default().fg(Color::DarkGray)),
            Cell::from(info.name),
            Cell::from(text).style(style),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Min(14),
            Constraint::Length(3),
        ],
    )
    .block(block);

    frame.render_widget(table, area);
}
