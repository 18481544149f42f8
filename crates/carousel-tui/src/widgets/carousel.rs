use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::widgets::DotsWidget;

/// Width of each nav button column
const BUTTON_WIDTH: u16 = 5;

pub struct CarouselWidget;

impl CarouselWidget {
    /// Render the slide, nav buttons and dots; refreshes the hit map
    pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
        app.hit_map.clear();
        app.hit_map.set_area(area);

        let theme = &app.theme;
        let border_style = if app.snapshot.focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.grey0)
        };
        let title = format!(
            " Slide {}/{} ",
            app.snapshot.current_index + 1,
            app.snapshot.slide_count
        );
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(theme.bg0));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(BUTTON_WIDTH),
                Constraint::Min(1),
                Constraint::Length(BUTTON_WIDTH),
            ])
            .split(rows[0]);

        app.hit_map.add(columns[1], app.controls.track);
        Self::render_slide(frame, columns[1], app);

        let prev_disabled = app.snapshot.prev_disabled;
        let next_disabled = app.snapshot.next_disabled;
        let prev_rect = Self::render_button(frame, columns[0], app, "\u{2039}", prev_disabled);
        app.hit_map.add(prev_rect, app.controls.prev);
        let next_rect = Self::render_button(frame, columns[2], app, "\u{203a}", next_disabled);
        app.hit_map.add(next_rect, app.controls.next);

        DotsWidget::render(frame, rows[1], app);
    }

    fn render_slide(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let Some(slide) = app.current_slide() else {
            return;
        };

        let mut lines = Vec::new();
        if let Some(label) = &slide.media_label {
            lines.push(Line::from(Span::styled(
                label.clone(),
                Style::default()
                    .fg(theme.info)
                    .add_modifier(Modifier::ITALIC),
            )));
            lines.push(Line::default());
        }
        let text = slide.content_text(area.width.saturating_sub(2));
        for line in text.lines() {
            lines.push(Line::from(Span::styled(
                line.to_string(),
                Style::default().fg(theme.fg0),
            )));
        }

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .style(Style::default().bg(theme.bg0));
        frame.render_widget(paragraph, area);
    }

    /// Draw a three-row button centred vertically; returns its rect
    fn render_button(frame: &mut Frame, area: Rect, app: &App, glyph: &str, disabled: bool) -> Rect {
        let theme = &app.theme;
        let height = area.height.min(3);
        let rect = Rect {
            x: area.x,
            y: area.y + (area.height - height) / 2,
            width: area.width,
            height,
        };

        let style = if disabled {
            Style::default().fg(theme.disabled).bg(theme.bg0)
        } else {
            Style::default()
                .fg(theme.fg1)
                .bg(theme.bg2)
                .add_modifier(Modifier::BOLD)
        };
        let button = Paragraph::new(glyph)
            .centered()
            .block(Block::default().borders(Borders::ALL).border_style(style))
            .style(style);
        frame.render_widget(button, rect);
        rect
    }
}
