use crate::core::conversation::{Message, Role};
use crate::core::state::App;
use crate::core::tools::{ToolCall, ToolCallStatus};
use crate::tui::TuiState;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, Paragraph, Wrap};

const SIDEBAR_WIDTH: u16 = 26;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};

    let [sidebar_area, main_area] =
        Layout::horizontal([Length(SIDEBAR_WIDTH), Min(0)]).areas(frame.area());
    let [title_area, transcript_area, status_area, input_area] =
        Layout::vertical([Length(1), Min(0), Length(1), Length(3)]).areas(main_area);

    draw_sidebar(frame, sidebar_area, app);

    // Title bar
    let title = format!("Flightdeck | {}", app.session_title);
    frame.render_widget(
        Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
        title_area,
    );

    draw_transcript(frame, transcript_area, app, tui);

    // Status line
    frame.render_widget(
        Span::styled(
            app.status.label(),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ),
        status_area,
    );

    // Input area
    let input = Paragraph::new(tui.input_buffer.as_str())
        .block(Block::bordered().title("Message"))
        .wrap(Wrap { trim: false });
    frame.render_widget(input, input_area);
}

fn draw_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let active_id = app.store.active_id();
    let items: Vec<ListItem> = app
        .store
        .list_by_recency()
        .into_iter()
        .map(|session| {
            let marker = if session.id == active_id { "▸ " } else { "  " };
            let style = if session.id == active_id {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };
            ListItem::new(Span::styled(format!("{marker}{}", session.title), style))
        })
        .collect();

    let list = List::new(items).block(Block::bordered().title("Sessions"));
    frame.render_widget(list, area);
}

fn draw_transcript(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState) {
    let lines = transcript_lines(app);
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });

    // Stick to the bottom unless the user scrolled away
    let total = paragraph.line_count(area.width) as u16;
    let max_scroll = total.saturating_sub(area.height);
    if tui.stick_to_bottom {
        tui.scroll = max_scroll;
    } else {
        tui.scroll = tui.scroll.min(max_scroll);
    }

    frame.render_widget(paragraph.scroll((tui.scroll, 0)), area);
}

/// Flatten the active thread (and the current run's tool calls) into
/// styled lines.
pub fn transcript_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for message in &app.log.messages {
        lines.push(message_header(message));
        for content_line in message.content.split('\n') {
            lines.push(Line::styled(
                content_line.to_string(),
                content_style(message.role),
            ));
        }
        if message.table.is_some() {
            lines.push(Line::styled(
                "[table attached]".to_string(),
                Style::default().fg(Color::DarkGray),
            ));
        }
        if message.chart.is_some() {
            lines.push(Line::styled(
                "[chart attached]".to_string(),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::raw(""));
    }

    for tool_call in app.tool_calls.calls() {
        append_tool_call_lines(&mut lines, tool_call);
    }

    lines
}

fn message_header(message: &Message) -> Line<'static> {
    let (label, style) = match message.role {
        Role::User => ("you", Style::default().fg(Color::Cyan)),
        Role::Assistant => ("assistant", Style::default().fg(Color::Green)),
    };
    Line::from(vec![
        Span::styled(label, style.add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  {}", message.time),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn content_style(role: Role) -> Style {
    match role {
        Role::User => Style::default(),
        Role::Assistant => Style::default().fg(Color::Gray),
    }
}

fn append_tool_call_lines(lines: &mut Vec<Line<'static>>, tool_call: &ToolCall) {
    let (badge, style) = match tool_call.status {
        ToolCallStatus::Calling => ("calling", Style::default().fg(Color::Yellow)),
        ToolCallStatus::Completed => ("done", Style::default().fg(Color::Green)),
    };
    lines.push(Line::from(vec![
        Span::styled("⚙ ".to_string(), style),
        Span::styled(tool_call.name.clone(), style.add_modifier(Modifier::BOLD)),
        Span::styled(format!(" [{badge}]"), style),
    ]));

    if tool_call.expanded {
        let detail_style = Style::default().fg(Color::DarkGray);
        for args_line in tool_call.display_args().split('\n') {
            lines.push(Line::styled(format!("  {args_line}"), detail_style));
        }
        if tool_call.status == ToolCallStatus::Completed {
            for result_line in tool_call.display_result().split('\n') {
                lines.push(Line::styled(format!("  {result_line}"), detail_style));
            }
        }
    }
    lines.push(Line::raw(""));
}
