use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

const ACTIVE_DOT: &str = "\u{25cf}";
const DOT: &str = "\u{25cb}";

pub struct DotsWidget;

impl DotsWidget {
    /// Centred row of dots, one per slide; each dot is a click target
    pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
        let theme = &app.theme;
        let dot_width = DOT.width();
        let start = row_start(area, app.controls.dots.len(), dot_width);

        let mut spans = Vec::new();
        if start > area.x {
            spans.push(Span::raw(" ".repeat((start - area.x) as usize)));
        }
        for (i, _) in app.controls.dots.iter().enumerate() {
            let active = app.snapshot.active_dot == Some(i);
            let (glyph, style) = if active {
                (ACTIVE_DOT, Style::default().fg(theme.highlight))
            } else {
                (DOT, Style::default().fg(theme.grey1))
            };
            spans.push(Span::styled(glyph, style));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.bg0)),
            area,
        );

        let dots = app.controls.dots.clone();
        for (i, dot) in dots.into_iter().enumerate() {
            let x = usize::from(start) + i * (dot_width + 1);
            if x >= usize::from(area.right()) {
                break;
            }
            app.hit_map.add(Rect::new(x as u16, area.y, dot_width as u16, 1), dot);
        }
    }
}

/// First column of the centred dot row; rows wider than `area` start at its left edge
fn row_start(area: Rect, count: usize, dot_width: usize) -> u16 {
    // Dot plus one space of padding, minus the trailing space
    let total = count.saturating_mul(dot_width + 1).saturating_sub(1);
    let free = usize::from(area.width).saturating_sub(total);
    area.x + (free / 2) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_is_centred() {
        // 4 dots: "o o o o" is 7 columns wide
        assert_eq!(row_start(Rect::new(0, 0, 21, 1), 4, 1), 7);
        assert_eq!(row_start(Rect::new(5, 3, 21, 1), 4, 1), 12);
        assert_eq!(row_start(Rect::new(0, 0, 21, 1), 0, 1), 10);
    }

    #[test]
    fn test_wide_row_starts_at_left_edge() {
        assert_eq!(row_start(Rect::new(2, 0, 80, 1), 40_000, 1), 2);
        assert_eq!(row_start(Rect::new(0, 0, 80, 1), usize::MAX, 2), 0);
    }
}
