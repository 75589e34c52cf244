// ratatui painting of a rendered View
use super::view::{View, ViewLine};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn styled_line(line: &ViewLine) -> Line<'static> {
    match line {
        ViewLine::Item { selected: true, .. } => Line::from(Span::styled(
            line.plain(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        ViewLine::Field {
            label,
            value,
            focused,
        } => {
            let (marker, value_style) = if *focused {
                ("➜ ", Style::default().fg(Color::Yellow))
            } else {
                ("  ", Style::default().fg(Color::White))
            };
            Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{}: ", label), Style::default().fg(Color::Cyan)),
                Span::styled(value.clone(), value_style),
            ])
        }
        ViewLine::Error(_) => Line::from(Span::styled(
            line.plain(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        _ => Line::from(line.plain()),
    }
}

pub fn draw(f: &mut Frame, view: &View) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(3),    // Body
            Constraint::Length(1), // Notice
            Constraint::Length(1), // Instructions
        ])
        .split(f.area());

    let title = Paragraph::new(view.title.clone())
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let body: Vec<Line> = view.lines.iter().map(styled_line).collect();
    let body = Paragraph::new(body)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    f.render_widget(body, chunks[1]);

    if let Some(notice) = &view.notice {
        let notice = Paragraph::new(notice.clone()).style(Style::default().fg(Color::Yellow));
        f.render_widget(notice, chunks[2]);
    }

    let instructions = Paragraph::new(view.hint.clone()).style(Style::default().fg(Color::Gray));
    f.render_widget(instructions, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_draw_paints_title_rows_and_hint() {
        let view = View {
            title: "Clusters on 'dev'".to_string(),
            lines: vec![ViewLine::Item {
                text: "c1 (gen1)".to_string(),
                selected: true,
            }],
            hint: "q/Esc: Back to main menu".to_string(),
            notice: Some("saved".to_string()),
        };

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|f| draw(f, &view)).unwrap();
        let text = screen_text(&terminal);

        assert!(text.contains("Clusters on 'dev'"));
        assert!(text.contains("c1 (gen1)"));
        assert!(text.contains("saved"));
        assert!(text.contains("q/Esc: Back to main menu"));
    }

    #[test]
    fn test_error_line_is_red() {
        let line = styled_line(&ViewLine::Error("HTTP 401: invalid_client".to_string()));
        assert_eq!(line.spans[0].style.fg, Some(Color::Red));
        assert_eq!(line.spans[0].content, "[ERROR] HTTP 401: invalid_client");
    }
}
