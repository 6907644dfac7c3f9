pub mod gauge;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::config::Config;
use crate::system::counters::LoadSample;
use gauge::{render_with, GaugeLine};

/// A gauge plus where it goes on the surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedLine {
    pub x: u16,
    pub y: u16,
    pub gauge: GaugeLine,
}

/// Render one gauge per core and stack them: core `i` lands on row
/// `baseline_row + i * line_height`.
pub fn layout_frame(sample: &LoadSample, cfg: &Config) -> Vec<PlacedLine> {
    sample
        .iter()
        .enumerate()
        .map(|(i, percent)| {
            let offset = u16::try_from(i)
                .unwrap_or(u16::MAX)
                .saturating_mul(cfg.line_height);
            PlacedLine {
                x: cfg.left_margin,
                y: cfg.baseline_row.saturating_add(offset),
                gauge: render_with(percent, cfg.bar_width, cfg.filled_glyph, cfg.empty_glyph),
            }
        })
        .collect()
}

/// Paint the current frame. Lines outside the visible area are skipped,
/// lines running past the right edge are cut.
pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    for line in app.frame() {
        if line.y >= area.height || line.x >= area.width {
            continue;
        }
        let width = (line.gauge.width() as u16).min(area.width - line.x);
        let target = Rect {
            x: area.x + line.x,
            y: area.y + line.y,
            width,
            height: 1,
        };
        f.render_widget(Paragraph::new(line.gauge.as_str()), target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn lines_are_stacked_from_the_baseline() {
        let cfg = Config::default();
        let sample = LoadSample::from(vec![0.0, 50.0, 100.0]);
        let frame = layout_frame(&sample, &cfg);

        assert_eq!(frame.len(), 3);
        for (i, line) in frame.iter().enumerate() {
            assert_eq!(line.x, cfg.left_margin);
            assert_eq!(line.y, cfg.baseline_row + i as u16 * cfg.line_height);
            assert_eq!(line.gauge.width(), cfg.bar_width);
        }
        assert_eq!(frame[0].gauge.filled(), 0);
        assert_eq!(frame[1].gauge.filled(), 25);
        assert_eq!(frame[2].gauge.filled(), 50);
    }

    #[test]
    fn taller_line_height_spreads_rows() {
        let cfg = Config {
            baseline_row: 2,
            line_height: 3,
            ..Config::default()
        };
        let frame = layout_frame(&LoadSample::from(vec![10.0, 20.0, 30.0]), &cfg);
        let rows: Vec<u16> = frame.iter().map(|l| l.y).collect();
        assert_eq!(rows, vec![2, 5, 8]);
    }

    #[test]
    fn draws_gauges_at_their_positions() {
        let cfg = Config { bar_width: 10, ..Config::default() };
        let mut app = App::new("test".to_string(), cfg.clone());
        app.set_frame(layout_frame(&LoadSample::from(vec![30.0, 100.0]), &cfg));

        let mut terminal = Terminal::new(TestBackend::new(20, 4)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();

        assert_eq!(row_text(&terminal, 0), " ".repeat(20));
        assert_eq!(row_text(&terminal, 1), format!(" ###{}", " ".repeat(16)));
        assert_eq!(row_text(&terminal, 2), format!(" {}{}", "#".repeat(10), " ".repeat(9)));
        assert_eq!(row_text(&terminal, 3), " ".repeat(20));
    }

    #[test]
    fn small_surfaces_clip_instead_of_panicking() {
        let cfg = Config::default();
        let mut app = App::new("test".to_string(), cfg.clone());
        app.set_frame(layout_frame(&LoadSample::from(vec![100.0; 8]), &cfg));

        let mut terminal = Terminal::new(TestBackend::new(12, 3)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();

        assert_eq!(row_text(&terminal, 1), format!(" {}", "#".repeat(11)));
        assert_eq!(row_text(&terminal, 2), format!(" {}", "#".repeat(11)));
    }
}
