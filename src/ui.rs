pub mod keyboard;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthChar;

use keydrill::{
    dataset::PositionGroup,
    i18n::Strings,
    judge::{InputState, Outcome},
    metrics,
    task::{LevelFilter, Mode},
};

use crate::App;
use keyboard::KeyboardWidget;

const HORIZONTAL_MARGIN: u16 = 2;
const KEYBOARD_HEIGHT: u16 = 7;

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn selected() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let s = self.lang.strings();
        let session = &self.session;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(2),               // title, subtitle, best
                Constraint::Length(1),               // mode tabs
                Constraint::Length(2),               // group chips / difficulty
                Constraint::Length(1),               // task label
                Constraint::Min(3),                  // target text
                Constraint::Length(3),               // input line
                Constraint::Length(KEYBOARD_HEIGHT), // keyboard
                Constraint::Length(1),               // stats
                Constraint::Length(1),               // key hints
            ])
            .split(area);

        render_header(self, s, chunks[0], buf);

        Paragraph::new(mode_tabs(s, session.mode())).render(chunks[1], buf);

        let selector = match session.mode() {
            Mode::Position => group_chips(s, session.group(), session.is_custom()),
            Mode::Sentence => level_selector(s, session.level()),
        };
        Paragraph::new(selector)
            .wrap(Wrap { trim: true })
            .render(chunks[2], buf);

        Paragraph::new(Span::styled(task_label(self), dim().add_modifier(Modifier::ITALIC)))
            .render(chunks[3], buf);

        Paragraph::new(Line::from(target_spans(&session.task().text, session.input())))
            .wrap(Wrap { trim: false })
            .render(chunks[4], buf);

        render_input(self, s, chunks[5], buf);

        let active = session.active_keys();
        KeyboardWidget::new(&active, session.expected_char()).render(chunks[6], buf);

        Paragraph::new(stats_line(self, s)).render(chunks[7], buf);

        Paragraph::new(Span::styled(key_hints(s), dim()))
            .alignment(Alignment::Center)
            .render(chunks[8], buf);
    }
}

fn render_header(app: &App, s: &Strings, area: Rect, buf: &mut Buffer) {
    let best = app.session.best();

    Paragraph::new(vec![
        Line::from(Span::styled(s.title, bold())),
        Line::from(Span::styled(s.subtitle, dim())),
    ])
    .render(area, buf);

    Paragraph::new(Line::from(vec![
        Span::styled(format!("{} ", s.best), Style::default().fg(Color::Yellow)),
        Span::styled(format!("WPM {}", best.wpm), bold()),
        Span::raw(" · "),
        Span::styled(format!("ACC {}%", best.accuracy), bold()),
    ]))
    .alignment(Alignment::Right)
    .render(area, buf);
}

fn mode_tabs(s: &Strings, mode: Mode) -> Line<'static> {
    let tab = |m: Mode| {
        let style = if m == mode { selected() } else { dim() };
        Span::styled(format!(" {} ", s.mode(m)), style)
    };
    Line::from(vec![
        tab(Mode::Position),
        Span::raw(" "),
        tab(Mode::Sentence),
        Span::styled("  (Tab)", dim()),
    ])
}

fn group_chips(s: &Strings, current: PositionGroup, custom: bool) -> Line<'static> {
    let mut spans = Vec::with_capacity(PositionGroup::ALL.len() * 2);
    for (i, group) in PositionGroup::ALL.iter().enumerate() {
        let style = if *group == current && !custom {
            selected()
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!("F{}", i + 1), dim()));
        spans.push(Span::styled(format!(" {} ", s.group(*group)), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn level_selector(s: &Strings, current: LevelFilter) -> Line<'static> {
    let mut spans = vec![Span::styled(format!("{}: ", s.difficulty), dim())];
    for level in [
        LevelFilter::All,
        LevelFilter::Easy,
        LevelFilter::Medium,
        LevelFilter::Hard,
    ] {
        let style = if level == current {
            selected()
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!(" {} ", s.level(level)), style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(" (PgUp/PgDn)", dim()));
    Line::from(spans)
}

fn task_label(app: &App) -> String {
    let s = app.lang.strings();
    let session = &app.session;
    if session.is_custom() {
        return s.sentence_label.to_string();
    }
    match session.mode() {
        Mode::Position => s.group(session.group()).to_string(),
        Mode::Sentence => match session.task().difficulty {
            Some(d) => format!("{} · {}", s.sentence_label, d),
            None => s.sentence_label.to_string(),
        },
    }
}

/// Target text coloured by what has been typed so far
pub fn target_spans(text: &str, input: &InputState) -> Vec<Span<'static>> {
    let green_bold_style = bold().fg(Color::Green);
    let red_bold_style = bold().fg(Color::Red);
    let underlined_bold_style = bold().add_modifier(Modifier::UNDERLINED);

    let outcomes: Vec<Outcome> = input.outcomes(text).collect();

    text.chars()
        .enumerate()
        .map(|(idx, c)| match outcomes.get(idx) {
            Some(Outcome::Correct) => Span::styled(c.to_string(), green_bold_style),
            // a missed space is invisible otherwise
            Some(Outcome::Incorrect) if c == ' ' => Span::styled("·", red_bold_style),
            Some(Outcome::Incorrect) => Span::styled(c.to_string(), red_bold_style),
            None if idx == outcomes.len() => Span::styled(c.to_string(), underlined_bold_style),
            None => Span::styled(c.to_string(), dim()),
        })
        .collect()
}

/// Number of leading chars to drop so the tail of `text` fits in `width` columns
pub fn overflow_skip(text: &str, width: usize) -> usize {
    let mut used = 0;
    let mut kept = 0;
    for c in text.chars().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        kept += 1;
    }
    text.chars().count() - kept
}

fn render_input(app: &App, s: &Strings, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let input = session.input();
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    block.render(area, buf);

    let line = if input.typed.is_empty() {
        Line::from(vec![
            Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)),
            Span::styled(s.placeholder, dim().add_modifier(Modifier::ITALIC)),
        ])
    } else {
        let outcomes: Vec<Outcome> = input.outcomes(&session.task().text).collect();
        // keep one column for the cursor
        let skip = overflow_skip(&input.typed, inner.width.saturating_sub(1) as usize);
        let mut spans: Vec<Span> = input
            .typed
            .chars()
            .zip(outcomes)
            .skip(skip)
            .map(|(c, outcome)| match outcome {
                Outcome::Correct => Span::raw(c.to_string()),
                Outcome::Incorrect => Span::styled(c.to_string(), Style::default().fg(Color::Red)),
            })
            .collect();
        if !session.is_complete() {
            spans.push(Span::styled(
                " ",
                Style::default().add_modifier(Modifier::REVERSED),
            ));
        }
        Line::from(spans)
    };

    Paragraph::new(line).render(inner, buf);
}

fn stats_line(app: &App, s: &Strings) -> Line<'static> {
    let session = &app.session;
    let mut spans = vec![
        Span::styled(format!("{} ", s.time), dim()),
        Span::styled(metrics::format_elapsed(session.elapsed()), bold()),
        Span::raw("   "),
        Span::styled(format!("{} ", s.wpm), dim()),
        Span::styled(session.wpm().to_string(), bold()),
        Span::raw("   "),
        Span::styled(format!("{} ", s.accuracy), dim()),
        Span::styled(metrics::format_accuracy(session.input().correct, session.input().wrong), bold()),
    ];
    if session.is_complete() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(s.complete, bold().fg(Color::Green)));
    }
    Line::from(spans)
}

fn key_hints(s: &Strings) -> String {
    format!(
        "Tab mode · F1-F8 · PgUp/PgDn · Ctrl+N {} · Ctrl+R {} · Ctrl+L 한/EN · Esc quit",
        s.next, s.restart
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use keydrill::{
        best::MemoryBestScoreStore, dataset::Dataset, i18n::Lang, session::PracticeSession,
    };
    use rand::{rngs::StdRng, SeedableRng};
    use std::time::Instant;

    fn app(lang: Lang) -> App {
        let session = PracticeSession::with_rng(
            Dataset::builtin(),
            Box::new(MemoryBestScoreStore::new()),
            StdRng::seed_from_u64(5),
        );
        App::new(session, lang)
    }

    fn rendered(app: &App) -> String {
        let area = Rect::new(0, 0, 110, 30);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_target_spans_mark_progress() {
        let mut input = InputState::new("ab c");
        input.typed = "aX".into();

        let spans = target_spans("ab c", &input);

        assert_eq!(spans.len(), 4);
        assert_eq!(spans[0].style.fg, Some(Color::Green));
        assert_eq!(spans[1].style.fg, Some(Color::Red));
        assert!(spans[2].style.add_modifier.contains(Modifier::UNDERLINED));
        assert!(spans[3].style.add_modifier.contains(Modifier::DIM));
    }

    #[test]
    fn test_missed_space_is_visible() {
        let mut input = InputState::new("a b");
        input.typed = "ax".into();

        let spans = target_spans("a b", &input);

        assert_eq!(spans[1].content, "·");
        assert_eq!(spans[1].style.fg, Some(Color::Red));
    }

    #[test]
    fn test_overflow_skip() {
        assert_eq!(overflow_skip("hello", 10), 0);
        assert_eq!(overflow_skip("hello", 3), 2);
        assert_eq!(overflow_skip("", 3), 0);
        // wide chars take two columns
        assert_eq!(overflow_skip("가나다", 4), 1);
    }

    #[test]
    fn test_renders_english_screen() {
        let mut a = app(Lang::En);
        a.session.load_custom("quick brown fox".into());

        let content = rendered(&a);

        assert!(content.contains("Simple English Typing Practice"));
        assert!(content.contains("quick brown fox"));
        assert!(content.contains("Start typing here"));
        assert!(content.contains("00:00"));
    }

    #[test]
    fn test_renders_completion_message() {
        let mut a = app(Lang::En);
        a.session.load_custom("ok".into());
        let now = Instant::now();
        let _ = a.session.type_char('o', now);
        let _ = a.session.type_char('k', now);

        let content = rendered(&a);

        assert!(content.contains("Done! Press Enter for the next task"));
        assert!(content.contains("100%"));
    }

    #[test]
    fn test_sentence_mode_shows_difficulty_selector() {
        let mut a = app(Lang::En);
        a.session.switch_mode(Mode::Sentence);

        let content = rendered(&a);

        assert!(content.contains("Difficulty"));
        assert!(content.contains("Medium"));
    }
}
