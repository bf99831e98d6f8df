//! Terminal UI rendering for the yit TUI.
//!
//! Layout, top to bottom:
//! - Header: workflow name and a progress gauge
//! - Body: step list (left) and the current step's detail (right); the
//!   template picker replaces the detail pane while it is open
//! - Status bar: keymap legend or the active input prompt
//!
//! This module renders from RenderState (immutable snapshot) - it never
//! mutates application state.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::render::{RenderState, StepView, EMPTY_WORKFLOW};
use crate::tea::{ConfirmKind, InputKind, Mode, Notification, NotificationLevel};
use crate::templates;
use crate::workflow::StepStatus;

// Color tokens (selection uses REVERSED modifier to adapt to terminal theme)
const COLOR_TEXT_DIMMED: Color = Color::Gray;
const COLOR_TEXT_MUTED: Color = Color::DarkGray;
const COLOR_SEPARATOR: Color = Color::White;
const COLOR_ACCENT: Color = Color::Cyan;

// Status color coding for faster visual parsing (uses terminal palette)
const COLOR_STATUS_PENDING: Color = Color::Gray;
const COLOR_STATUS_ACTIVE: Color = Color::Yellow;
const COLOR_STATUS_DONE: Color = Color::Green;

// Layout constants
const HEADER_HEIGHT: u16 = 2;
const LIST_PERCENT: u16 = 40;

// Column widths for the step list
const NUMBER_WIDTH: usize = 3;
const STATUS_WIDTH: usize = 11;
const SPACING: usize = 2;

// -----------------------------------------------------------------------------
// Context-sensitive keymap system
// -----------------------------------------------------------------------------

/// Context for determining which keybindings to display.
/// Derived from RenderState - this is the "view model" for the statusbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeymapContext {
    /// Normal list browsing; `has_step` is false on an empty workflow
    List { has_step: bool },
    /// Text input mode (step fields, workflow name)
    TextInput,
    /// Template picker
    Templates,
    /// Delete / clear confirmation
    Confirm,
}

impl KeymapContext {
    /// Derive keymap context from render state.
    pub fn from_render_state(state: &RenderState) -> Self {
        match state.mode {
            Mode::Confirm(_) => KeymapContext::Confirm,
            Mode::Input(_) => KeymapContext::TextInput,
            Mode::Templates => KeymapContext::Templates,
            Mode::List => KeymapContext::List {
                has_step: state.current_step().is_some(),
            },
        }
    }
}

/// A single keybinding entry for display.
struct Keybinding(&'static str, &'static str);

/// A group of related keybindings (separated by │).
struct KeybindingGroup(Vec<Keybinding>);

/// Get keybindings for a given context.
fn keybindings_for_context(ctx: KeymapContext) -> Vec<KeybindingGroup> {
    match ctx {
        KeymapContext::List { has_step } => {
            let add_group = vec![Keybinding("a", "add"), Keybinding("t", "template")];

            let step_group = if has_step {
                vec![
                    Keybinding("j/k", "move"),
                    Keybinding("x", "done"),
                    Keybinding("s", "start"),
                    Keybinding("p", "pending"),
                    Keybinding("e", "edit"),
                    Keybinding("d", "delete"),
                    Keybinding("y", "copy prompt"),
                ]
            } else {
                vec![]
            };

            let workflow_group = vec![
                Keybinding("n", "rename"),
                Keybinding("r", "reset"),
                Keybinding("C", "clear"),
                Keybinding("Y", "copy plan"),
            ];

            vec![
                KeybindingGroup(add_group),
                KeybindingGroup(step_group),
                KeybindingGroup(workflow_group),
                KeybindingGroup(vec![Keybinding("q", "quit")]),
            ]
        }
        KeymapContext::TextInput => vec![KeybindingGroup(vec![
            Keybinding("Enter", "save"),
            Keybinding("Tab", "next field"),
            Keybinding("Esc", "cancel"),
        ])],
        KeymapContext::Templates => vec![KeybindingGroup(vec![
            Keybinding("j/k", "move"),
            Keybinding("Enter", "add"),
            Keybinding("Esc", "cancel"),
        ])],
        KeymapContext::Confirm => vec![KeybindingGroup(vec![
            Keybinding("y", "confirm"),
            Keybinding("n", "cancel"),
        ])],
    }
}

/// Main render function - entry point for all UI drawing.
/// Takes an immutable RenderState snapshot.
pub fn draw(frame: &mut Frame, state: &RenderState) {
    render_main_layout(frame, state);

    // Render notification if present
    if let Some(ref notification) = state.notification {
        render_notification(frame, notification, frame.area());
    }
}

/// Render the main layout: header + separator + body + status bar.
fn render_main_layout(frame: &mut Frame, state: &RenderState) {
    let area = frame.area();

    if area.height < 5 {
        render_step_list(frame, state, area);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_header(frame, state, chunks[0]);
    render_separator(frame, chunks[1]);

    let body = Layout::horizontal([
        Constraint::Percentage(LIST_PERCENT),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .split(chunks[2]);

    render_step_list(frame, state, body[0]);
    match state.mode {
        Mode::Templates => render_template_picker(frame, state, body[2]),
        _ => render_detail(frame, state, body[2]),
    }
    render_statusbar(frame, state, chunks[3]);
}

/// Render workflow name on the first line and progress gauge on the second.
fn render_header(frame: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(area);

    let title = Line::from(vec![
        Span::styled(
            state.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ", Style::default()),
        Span::styled(
            state.progress.to_string(),
            Style::default().fg(COLOR_TEXT_DIMMED),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), chunks[0]);

    let percentage = state.progress.percentage();
    let label = format!(
        "{}% ({}/{})",
        percentage, state.progress.done, state.progress.total
    );
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(COLOR_ACCENT).bg(Color::DarkGray))
        .percent(percentage)
        .label(label);
    frame.render_widget(gauge, chunks[1]);
}

/// Render the separator - solid divider line between header and body.
fn render_separator(frame: &mut Frame, area: Rect) {
    let solid = "─".repeat(area.width as usize);
    let line = Line::from(Span::styled(solid, Style::default().fg(COLOR_SEPARATOR)));
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the step list with scrolloff navigation (current step stays centered).
fn render_step_list(frame: &mut Frame, state: &RenderState, area: Rect) {
    if state.steps.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            EMPTY_WORKFLOW,
            Style::default().fg(COLOR_TEXT_DIMMED),
        )))
        .wrap(Wrap { trim: true });
        frame.render_widget(msg, area);
        return;
    }

    let visible = area.height as usize;
    let current = state.current.unwrap_or(0);
    let (start, end) = scroll_window(current, state.steps.len(), visible);

    let lines: Vec<Line> = state.steps[start..end]
        .iter()
        .map(|step| render_step_row(step, state.current == Some(step.number - 1), area.width))
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

/// Visible `[start, end)` slice of a list of `len` rows that keeps `selected`
/// centered in a window of `height` rows.
fn scroll_window(selected: usize, len: usize, height: usize) -> (usize, usize) {
    let center = height / 2;
    let start = selected.saturating_sub(center);
    let end = (start + height).min(len);
    let start = end.saturating_sub(height);
    (start, end)
}

fn status_color(status: StepStatus) -> Color {
    match status {
        StepStatus::Pending => COLOR_STATUS_PENDING,
        StepStatus::Active => COLOR_STATUS_ACTIVE,
        StepStatus::Done => COLOR_STATUS_DONE,
    }
}

/// Render a single step row. Columns: NUMBER | STATUS | TITLE (flex)
fn render_step_row(step: &StepView, is_current: bool, width: u16) -> Line<'static> {
    let title_width = (width as usize).saturating_sub(NUMBER_WIDTH + STATUS_WIDTH + SPACING * 2);

    let number = format!("{:>width$}", step.number, width = NUMBER_WIDTH);
    let status = format!("{:<width$}", step.status.label(), width = STATUS_WIDTH);
    let title = truncate(step.display_title(), title_width);

    let (number_style, status_style, title_style) = if is_current {
        let selected = Style::default().add_modifier(Modifier::REVERSED);
        (selected, selected, selected)
    } else {
        let title_style = if step.status.is_done() {
            Style::default()
                .fg(COLOR_TEXT_MUTED)
                .add_modifier(Modifier::CROSSED_OUT)
        } else {
            Style::default()
        };
        (
            Style::default().fg(COLOR_TEXT_MUTED),
            Style::default().fg(status_color(step.status)),
            title_style,
        )
    };

    let spacing = " ".repeat(SPACING);
    Line::from(vec![
        Span::styled(number, number_style),
        Span::styled(spacing.clone(), number_style),
        Span::styled(status, status_style),
        Span::styled(spacing, status_style),
        Span::styled(title, title_style),
    ])
}

/// Render the current step's fields, falling back to placeholders.
fn render_detail(frame: &mut Frame, state: &RenderState, area: Rect) {
    let Some(step) = state.current_step() else {
        return;
    };

    let label_style = Style::default()
        .fg(COLOR_TEXT_DIMMED)
        .add_modifier(Modifier::BOLD);
    let field_style = |value: &str| {
        if value.trim().is_empty() {
            Style::default().fg(COLOR_TEXT_MUTED)
        } else {
            Style::default()
        }
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("Step {} of {}: ", step.number, state.steps.len()),
                Style::default().fg(COLOR_TEXT_DIMMED),
            ),
            Span::styled(
                step.display_title().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            step.status.label(),
            Style::default().fg(status_color(step.status)),
        )),
        Line::default(),
        Line::from(Span::styled("Tab", label_style)),
        Line::from(Span::styled(
            step.display_tab().to_string(),
            field_style(&step.tab),
        )),
        Line::default(),
        Line::from(Span::styled("Prompt", label_style)),
    ];
    lines.extend(
        step.display_instructions()
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), field_style(&step.instructions)))),
    );
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Notes", label_style)));
    lines.extend(
        step.display_notes()
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), field_style(&step.notes)))),
    );

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

/// Render the template catalog with the highlighted entry's description.
fn render_template_picker(frame: &mut Frame, state: &RenderState, area: Rect) {
    let catalog = templates::all();
    let mut lines = vec![
        Line::from(Span::styled(
            "Templates",
            Style::default()
                .fg(COLOR_TEXT_DIMMED)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];

    for (i, template) in catalog.iter().enumerate() {
        let selected = i == state.template_selected;
        let style = if selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<14}", template.category), style.fg(COLOR_ACCENT)),
            Span::styled(template.title, style),
        ]));
    }

    if let Some(template) = catalog.get(state.template_selected) {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            template.description,
            Style::default().fg(COLOR_TEXT_DIMMED),
        )));
        lines.push(Line::from(vec![
            Span::styled("Opens in: ", Style::default().fg(COLOR_TEXT_MUTED)),
            Span::styled(template.suggested_tool, Style::default()),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

/// Render the status bar - single bottom line with conditional display.
/// Shows either:
/// - Input prompt (when in Input mode)
/// - Confirmation question (when in Confirm mode)
/// - "?" indicator only (when keymap is collapsed)
/// - "? │ <full keymap>" (when keymap is expanded via '?' toggle)
fn render_statusbar(frame: &mut Frame, state: &RenderState, area: Rect) {
    let line = match state.mode {
        Mode::Input(kind) => render_input_line(state, kind),
        Mode::Confirm(kind) => render_confirm_line(kind),
        _ => render_keymap_line(state),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Render keybindings legend for the bottom line.
/// When show_keymap is false: Shows just "?" (grayed out)
/// When show_keymap is true: Shows "? │ <full keymap legend>" with bright "?"
fn render_keymap_line(state: &RenderState) -> Line<'static> {
    let ctx = KeymapContext::from_render_state(state);
    let groups = keybindings_for_context(ctx);

    let key_style = Style::default().fg(COLOR_TEXT_DIMMED);
    let desc_style = Style::default().fg(COLOR_TEXT_MUTED);
    let sep_style = Style::default().fg(COLOR_TEXT_MUTED);

    let help_style = if state.show_keymap {
        Style::default()
    } else {
        Style::default().fg(COLOR_TEXT_MUTED)
    };
    let mut spans: Vec<Span> = vec![Span::styled("?", help_style)];

    if state.show_keymap {
        for group in groups.iter().filter(|g| !g.0.is_empty()) {
            spans.push(Span::styled(" │ ", sep_style));
            for (key_idx, keybinding) in group.0.iter().enumerate() {
                if key_idx > 0 {
                    spans.push(Span::styled(" • ", sep_style));
                }
                spans.push(Span::styled(keybinding.0, key_style));
                spans.push(Span::styled(format!(" {}", keybinding.1), desc_style));
            }
        }
    }

    Line::from(spans)
}

/// Render input prompt for the bottom line (replaces keymap when in input mode).
fn render_input_line(state: &RenderState, kind: InputKind) -> Line<'static> {
    let hint_style = Style::default().fg(COLOR_TEXT_MUTED);
    let label_style = Style::default().fg(Color::Reset);
    let input_style = Style::default().fg(Color::White);
    let cursor_style = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::SLOW_BLINK);

    let mut spans = vec![Span::styled("Enter • ", hint_style)];
    if kind.next().is_some() {
        spans.push(Span::styled("Tab • ", hint_style));
    }
    spans.push(Span::styled("Esc  ", hint_style));
    spans.push(Span::styled(format!("{}: ", kind.label()), label_style));
    spans.push(Span::styled(state.input_buffer.clone(), input_style));
    spans.push(Span::styled("_", cursor_style));

    Line::from(spans)
}

fn render_confirm_line(kind: ConfirmKind) -> Line<'static> {
    Line::from(vec![
        Span::styled("y • n  ", Style::default().fg(COLOR_TEXT_MUTED)),
        Span::styled(
            kind.label(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    ])
}

/// Render notification message on the bottom line of the screen.
///
/// Displays a single-line notification with appropriate styling based on the notification level:
/// - Error: Red text with "Error:" prefix and bold styling
/// - Info: Green text without prefix
fn render_notification(frame: &mut Frame, notification: &Notification, area: Rect) {
    let notification_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    frame.render_widget(Clear, notification_area);

    let line = match notification.level {
        NotificationLevel::Error => Line::from(vec![
            Span::styled(
                "Error: ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                notification.message.clone(),
                Style::default().fg(Color::Red),
            ),
        ]),
        NotificationLevel::Info => Line::from(Span::styled(
            notification.message.clone(),
            Style::default().fg(Color::Green),
        )),
    };

    frame.render_widget(Paragraph::new(line), notification_area);
}

// Helper functions

fn truncate(s: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 1).collect();
        format!("{}~", truncated)
    }
}
