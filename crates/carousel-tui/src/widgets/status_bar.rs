use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let snapshot = &app.snapshot;

        let auto = if snapshot.auto_advance_active {
            "AUTO"
        } else if snapshot.hovered {
            "PAUSED"
        } else {
            "MANUAL"
        };

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            format!(
                " {} | Slide {}/{} | {}",
                auto,
                snapshot.current_index + 1,
                snapshot.slide_count,
                snapshot.track_transform
            )
        };

        let help_hint = " q:quit \u{2190}/\u{2192} h/l:slide click:dots ";
        let padding_len = area
            .width
            .saturating_sub(status_text.chars().count() as u16 + help_hint.chars().count() as u16)
            as usize;

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey1).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
