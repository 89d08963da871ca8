use crate::app::{App, Focus, byte_idx_for_g};
use crate::notification::NotificationKind;
use crate::storage::KeyValueStorage;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_segmentation::UnicodeSegmentation;

const TITLE: &str = "JSON Outputs Dataset";
const KEY_HINTS: &str =
    "Ctrl+Y copy to clipboard · Ctrl+P paste from clipboard · Tab next field · Ctrl+D delete scenario · Ctrl+Q quit";
const FOOTER: &str = "Data is saved locally after every change, so go ahead and quit or restart. You can also copy and paste the data to/from the clipboard.";

const TEXT_INDENT: u16 = 4;
const KEY_INDENT: u16 = 6;

/// Body lines plus where the terminal cursor belongs.
struct Body {
    lines: Vec<Line<'static>>,
    cursor: Option<(usize, u16)>,
}

pub fn render<S: KeyValueStorage>(f: &mut Frame, app: &App<S>) {
    let notification_height = if app.notifier.current().is_some() { 1 } else { 0 };
    let [header_area, notification_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(notification_height),
        Constraint::Min(1),
        Constraint::Length(3),
    ])
    .areas(f.area());

    let header = Paragraph::new(Line::from(Span::styled(KEY_HINTS, Style::default().fg(Color::Gray))))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(TITLE)
                .title_style(Style::default().fg(Color::Blue).bold()),
        );
    f.render_widget(header, header_area);

    if let Some(n) = app.notifier.current() {
        let style = match n.kind {
            NotificationKind::Success => Style::default().fg(Color::Black).bg(Color::Green),
            NotificationKind::Error => Style::default().fg(Color::White).bg(Color::Red),
        };
        f.render_widget(Paragraph::new(format!(" {} ", n.message)).style(style), notification_area);
    }

    render_body(f, app, body_area);

    let footer = Paragraph::new(Text::from(FOOTER))
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(footer, footer_area);
}

fn render_body<S: KeyValueStorage>(f: &mut Frame, app: &App<S>, area: Rect) {
    let body = build_body(app);

    let height = area.height as usize;
    let scroll = match body.cursor {
        Some((line, _)) if line >= height => line + 1 - height / 2,
        _ => 0,
    };

    f.render_widget(Paragraph::new(Text::from(body.lines)).scroll((scroll as u16, 0)), area);

    if let Some((line, col)) = body.cursor {
        let y = line.saturating_sub(scroll);
        if y < height && col < area.width {
            f.set_cursor_position(Position::new(area.x + col, area.y + y as u16));
        }
    }
}

fn focused_style() -> Style {
    Style::default().fg(Color::Black).bg(Color::Cyan)
}

fn build_body<S: KeyValueStorage>(app: &App<S>) -> Body {
    let mut body = Body {
        lines: Vec::new(),
        cursor: None,
    };

    name_field(
        &mut body,
        app,
        &Focus::NewScenario,
        &app.new_scenario_name,
        "Enter new scenario name",
        0,
    );
    body.lines.push(Line::default());

    for (name, scenario) in app.store.scenarios() {
        body.lines.push(Line::from(vec![
            Span::styled(format!("── {name} "), Style::default().fg(Color::Magenta).bold()),
            Span::styled("(Ctrl+D delete)", Style::default().fg(Color::DarkGray)),
        ]));

        body.lines.push(Line::from(Span::styled("  User:", Style::default().bold())));
        text_area(
            &mut body,
            app,
            &Focus::Input {
                scenario: name.clone(),
            },
            &scenario.input,
            TEXT_INDENT,
        );

        body.lines.push(Line::from(Span::styled("  Assistant:", Style::default().bold())));
        for (key, value) in &scenario.output {
            body.lines.push(Line::from(Span::styled(
                format!("    {key}:"),
                Style::default().fg(Color::Yellow),
            )));
            text_area(
                &mut body,
                app,
                &Focus::Output {
                    scenario: name.clone(),
                    key: key.clone(),
                },
                value,
                KEY_INDENT,
            );
        }

        let new_key = Focus::NewKey {
            scenario: name.clone(),
        };
        // the key buffer is shared, only show it where it is being typed
        let shown = if app.focus == new_key { app.new_key_name.as_str() } else { "" };
        name_field(&mut body, app, &new_key, shown, "New output key name", TEXT_INDENT);
        body.lines.push(Line::default());
    }

    if app.store.is_empty() {
        body.lines.push(Line::from(Span::styled(
            "No scenarios yet. Type a name above and press Enter.",
            Style::default().fg(Color::DarkGray).italic(),
        )));
    }

    body
}

fn name_field<S: KeyValueStorage>(
    body: &mut Body,
    app: &App<S>,
    focus: &Focus,
    value: &str,
    placeholder: &str,
    indent: u16,
) {
    let focused = app.focus == *focus;
    let prefix = format!("{}+ ", " ".repeat(indent as usize));
    let content = if value.is_empty() {
        Span::styled(format!("[{placeholder}]"), Style::default().fg(Color::DarkGray))
    } else if focused {
        Span::styled(value.to_string(), focused_style())
    } else {
        Span::raw(value.to_string())
    };
    let prefix_style = if focused { focused_style() } else { Style::default() };

    if focused {
        let col = prefix.len() + app.cursor_g.min(value.graphemes(true).count());
        body.cursor = Some((body.lines.len(), col as u16));
    }
    body.lines.push(Line::from(vec![Span::styled(prefix, prefix_style), content]));
}

/// One line per text line, so the area grows with its content.
fn text_area<S: KeyValueStorage>(
    body: &mut Body,
    app: &App<S>,
    focus: &Focus,
    value: &str,
    indent: u16,
) {
    let focused = app.focus == *focus;
    let style = if focused { focused_style() } else { Style::default() };
    let pad = " ".repeat(indent as usize);
    let start = body.lines.len();

    for part in value.split('\n') {
        body.lines.push(Line::from(vec![
            Span::raw(pad.clone()),
            Span::styled(part.to_string(), style),
        ]));
    }
    if value.is_empty() && !focused {
        if let Some(last) = body.lines.last_mut() {
            *last = Line::from(vec![
                Span::raw(pad.clone()),
                Span::styled("…", Style::default().fg(Color::DarkGray)),
            ]);
        }
    }

    if focused {
        let before = &value[..byte_idx_for_g(value, app.cursor_g)];
        let row = before.matches('\n').count();
        let col = before.rsplit('\n').next().unwrap_or("").graphemes(true).count();
        body.cursor = Some((start + row, indent + col as u16));
    }
}
