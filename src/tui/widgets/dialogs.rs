//! Modal dialog rendering
//!
//! Each dialog is a stateless function of its own modal state.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::layout::{centered_fixed, centered_rect};
use crate::git::DeleteScope;
use crate::tui::modal::{EditorField, Modal};
use crate::tui::theme::Theme;

const HELP_TEXT: &str = r#"
Panels:
  1-5             Files, Content, Branches, Commits, Stash
  j/k, Up/Down    Move selection or cursor
  Enter           View the selected item
  Esc             Back to the list (quit from Files)
  Tab             Files <-> Commits
  Ctrl+u/d        Half page up/down
  PgUp/PgDn       Page up/down

Files:
  Space  mark     a  mark all     c  commit marked     s  stash

Commits:
  P  push     p  pull     r  soft reset     R  hard reset     a  amend

Branches:
  c  checkout     n  new     r  rename     d  delete     p  pull

Stash:
  Space  apply     g  pop     d  drop

Other:
  ?  help     q  quit     Ctrl+c  quit from anywhere

Press any key to close this help.
"#;

/// Draw the open modal, if any
pub fn render_modal(frame: &mut Frame, modal: &Modal, theme: &Theme) {
    let area = frame.area();
    match modal {
        Modal::None => {}
        Modal::Input { title, value, .. } => input_dialog(frame, area, theme, title, value),
        Modal::CommitEditor {
            title,
            message,
            focus,
            amend,
        } => commit_editor(frame, area, theme, title, message, *focus, *amend),
        Modal::HardReset { typed } => hard_reset_dialog(frame, area, theme, typed),
        Modal::Upstream {
            input,
            suggestions,
            selected,
        } => upstream_dialog(frame, area, theme, input, suggestions, *selected),
        Modal::Confirm { title, message, .. } => confirm_dialog(frame, area, theme, title, message),
        Modal::DeleteBranch { branch, selected } => {
            delete_branch_dialog(frame, area, theme, branch, *selected)
        }
        Modal::Help => help_dialog(frame, area, theme),
        Modal::Error { message } => error_dialog(frame, area, theme, message),
    }
}

fn dialog_block(title: &str, color: Color) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

/// Clear `area` and draw the dialog frame, returning the inner region
fn open_dialog(frame: &mut Frame, area: Rect, title: &str, color: Color) -> Rect {
    frame.render_widget(Clear, area);
    let block = dialog_block(title, color);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

pub fn input_dialog(frame: &mut Frame, area: Rect, theme: &Theme, title: &str, value: &str) {
    let modal_area = centered_fixed(60, 5, area);
    let inner = open_dialog(frame, modal_area, title, theme.modal_info);

    let text = vec![
        Line::from(format!("> {}_", value)),
        Line::from(Span::styled(
            "Enter: confirm | Esc: cancel",
            Style::default().fg(theme.text_secondary),
        )),
    ];
    frame.render_widget(Paragraph::new(text), inner);
}

pub fn commit_editor(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    title: &str,
    message: &str,
    focus: EditorField,
    amend: bool,
) {
    let modal_area = centered_rect(70, 60, area);
    let heading = if amend { "Amend Commit" } else { "Commit" };
    let inner = open_dialog(frame, modal_area, heading, theme.modal_info);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(inner);

    let field_style = |field: EditorField| {
        if field == focus {
            Style::default().fg(theme.border_focused)
        } else {
            Style::default().fg(theme.border_unfocused)
        }
    };
    let cursor = |field: EditorField| if field == focus { "_" } else { "" };

    let title_field = Paragraph::new(format!("{}{}", title, cursor(EditorField::Title))).block(
        Block::default()
            .title(" Title ")
            .borders(Borders::ALL)
            .border_style(field_style(EditorField::Title)),
    );
    frame.render_widget(title_field, rows[0]);

    let message_field = Paragraph::new(format!("{}{}", message, cursor(EditorField::Message)))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Message ")
                .borders(Borders::ALL)
                .border_style(field_style(EditorField::Message)),
        );
    frame.render_widget(message_field, rows[1]);

    let hint = Paragraph::new(Span::styled(
        "Tab: switch field | Enter: commit (newline in message) | Esc: cancel",
        Style::default().fg(theme.text_secondary),
    ));
    frame.render_widget(hint, rows[2]);
}

pub fn hard_reset_dialog(frame: &mut Frame, area: Rect, theme: &Theme, typed: &str) {
    let modal_area = centered_fixed(60, 7, area);
    let inner = open_dialog(frame, modal_area, "Hard Reset", theme.modal_error);

    let text = vec![
        Line::from("This discards the latest commit and all its changes."),
        Line::from("Type 'yes' to confirm:"),
        Line::from(format!("> {}_", typed)),
        Line::from(Span::styled(
            "Enter: confirm | Esc: cancel",
            Style::default().fg(theme.text_secondary),
        )),
    ];
    frame.render_widget(Paragraph::new(text), inner);
}

pub fn upstream_dialog(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    input: &str,
    suggestions: &[String],
    selected: usize,
) {
    let height = 6 + suggestions.len() as u16;
    let modal_area = centered_fixed(60, height, area);
    let inner = open_dialog(frame, modal_area, "Set Upstream", theme.modal_warning);

    let mut text = vec![
        Line::from("No upstream configured. Push to (remote branch):"),
        Line::from(format!("> {}_", input)),
        Line::from(""),
    ];
    for (i, suggestion) in suggestions.iter().enumerate() {
        if i == selected {
            text.push(Line::from(Span::styled(
                format!("> {}", suggestion),
                theme.selection(),
            )));
        } else {
            text.push(Line::from(format!("  {}", suggestion)));
        }
    }
    text.push(Line::from(Span::styled(
        "Tab/Up/Down: choose | Enter: push | Esc: cancel",
        Style::default().fg(theme.text_secondary),
    )));
    frame.render_widget(Paragraph::new(text), inner);
}

pub fn confirm_dialog(frame: &mut Frame, area: Rect, theme: &Theme, title: &str, message: &str) {
    let modal_area = centered_rect(50, 25, area);
    let inner = open_dialog(frame, modal_area, title, theme.modal_warning);
    frame.render_widget(Paragraph::new(message).wrap(Wrap { trim: false }), inner);
}

pub fn delete_branch_dialog(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    branch: &str,
    selected: usize,
) {
    let modal_area = centered_fixed(50, 8, area);
    let inner = open_dialog(frame, modal_area, "Delete Branch", theme.modal_error);

    let mut text = vec![Line::from(format!("Branch: {}", branch))];
    for (i, scope) in DeleteScope::ALL.iter().enumerate() {
        let label = format!(
            "Delete {} ({})",
            scope.label().to_lowercase(),
            scope.label().chars().next().unwrap_or(' ').to_ascii_lowercase()
        );
        if i == selected {
            text.push(Line::from(Span::styled(
                format!("> {}", label),
                theme.selection().add_modifier(Modifier::BOLD),
            )));
        } else {
            text.push(Line::from(format!("  {}", label)));
        }
    }
    text.push(Line::from(Span::styled(
        "Enter: select | Esc: cancel",
        Style::default().fg(theme.text_secondary),
    )));
    frame.render_widget(Paragraph::new(text), inner);
}

pub fn help_dialog(frame: &mut Frame, area: Rect, theme: &Theme) {
    let modal_area = centered_rect(70, 80, area);
    let inner = open_dialog(frame, modal_area, "Help", theme.modal_info);
    frame.render_widget(Paragraph::new(HELP_TEXT), inner);
}

pub fn error_dialog(frame: &mut Frame, area: Rect, theme: &Theme, message: &str) {
    let modal_area = centered_rect(60, 20, area);
    let inner = open_dialog(frame, modal_area, "Error", theme.modal_error);

    let text = format!("{}\n\nPress any key to close.", message);
    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
}
