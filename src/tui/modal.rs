//! Modal dialogs
//!
//! A modal owns its own small editing state and turns keys into a
//! [`ModalOutcome`]. Acting on a submitted dialog is left to the input
//! dispatcher; drawing is done by stateless functions in `widgets::dialogs`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::git::DeleteScope;

/// Most upstream suggestions offered at once
pub const MAX_UPSTREAM_SUGGESTIONS: usize = 3;

/// Action to perform when a text input modal is submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    CreateStash,
    CreateBranch,
    RenameBranch { old: String },
}

/// Action to perform when a yes/no modal is confirmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    ForcePush,
}

/// Which commit editor field has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorField {
    #[default]
    Title,
    Message,
}

/// Modal dialog state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Modal {
    /// No modal open
    #[default]
    None,
    /// Single-line text input
    Input {
        title: String,
        value: String,
        on_submit: InputAction,
    },
    /// Title and message editor for commit and amend
    CommitEditor {
        title: String,
        message: String,
        focus: EditorField,
        amend: bool,
    },
    /// Hard reset guard, requires typing "yes"
    HardReset { typed: String },
    /// Remote and branch for a first push
    Upstream {
        input: String,
        suggestions: Vec<String>,
        selected: usize,
    },
    /// y/N confirmation
    Confirm {
        title: String,
        message: String,
        on_confirm: ConfirmAction,
    },
    /// Local / remote / both chooser
    DeleteBranch { branch: String, selected: usize },
    /// Key reference
    Help,
    /// Blocking error, closed by any key
    Error { message: String },
}

/// What a modal produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalSubmit {
    Input { action: InputAction, value: String },
    Commit { title: String, message: String, amend: bool },
    HardReset,
    Upstream { remote: String, branch: String },
    Confirm(ConfirmAction),
    DeleteBranch { branch: String, scope: DeleteScope },
}

/// Result of feeding a key to a modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalOutcome {
    /// Still open
    Pending,
    /// Closed without action
    Closed,
    /// Closed with a result for the dispatcher
    Submit(ModalSubmit),
}

impl Modal {
    pub fn is_open(&self) -> bool {
        !matches!(self, Modal::None)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Modal::Error {
            message: message.into(),
        }
    }

    pub fn input(title: impl Into<String>, value: impl Into<String>, on_submit: InputAction) -> Self {
        Modal::Input {
            title: title.into(),
            value: value.into(),
            on_submit,
        }
    }

    pub fn commit_editor(title: impl Into<String>, message: impl Into<String>, amend: bool) -> Self {
        Modal::CommitEditor {
            title: title.into(),
            message: message.into(),
            focus: EditorField::Title,
            amend,
        }
    }

    /// Upstream picker prefilled from the remote list
    pub fn upstream(branch: &str, remotes: &[String]) -> Self {
        let suggestions: Vec<String> = remotes
            .iter()
            .take(MAX_UPSTREAM_SUGGESTIONS)
            .map(|remote| format!("{} {}", remote, branch))
            .collect();
        let input = suggestions
            .first()
            .cloned()
            .unwrap_or_else(|| format!("origin {}", branch));
        Modal::Upstream {
            input,
            suggestions,
            selected: 0,
        }
    }

    pub fn delete_branch(branch: impl Into<String>) -> Self {
        Modal::DeleteBranch {
            branch: branch.into(),
            selected: 0,
        }
    }

    /// Feed one key to the open modal.
    ///
    /// The caller replaces the modal with [`Modal::None`] on anything but
    /// [`ModalOutcome::Pending`].
    pub fn handle_key(&mut self, key: KeyEvent) -> ModalOutcome {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return ModalOutcome::Closed;
        }

        match self {
            Modal::None => ModalOutcome::Closed,

            Modal::Help | Modal::Error { .. } => ModalOutcome::Closed,

            Modal::Input {
                value, on_submit, ..
            } => match key.code {
                KeyCode::Esc => ModalOutcome::Closed,
                KeyCode::Enter => {
                    if value.trim().is_empty() {
                        ModalOutcome::Closed
                    } else {
                        ModalOutcome::Submit(ModalSubmit::Input {
                            action: on_submit.clone(),
                            value: value.trim().to_string(),
                        })
                    }
                }
                KeyCode::Backspace => {
                    value.pop();
                    ModalOutcome::Pending
                }
                KeyCode::Char(c) => {
                    value.push(c);
                    ModalOutcome::Pending
                }
                _ => ModalOutcome::Pending,
            },

            Modal::CommitEditor {
                title,
                message,
                focus,
                amend,
            } => {
                let field = match *focus {
                    EditorField::Title => &mut *title,
                    EditorField::Message => &mut *message,
                };
                match key.code {
                    KeyCode::Esc => ModalOutcome::Closed,
                    KeyCode::Tab | KeyCode::BackTab => {
                        *focus = match *focus {
                            EditorField::Title => EditorField::Message,
                            EditorField::Message => EditorField::Title,
                        };
                        ModalOutcome::Pending
                    }
                    KeyCode::Enter => match *focus {
                        EditorField::Message => {
                            message.push('\n');
                            ModalOutcome::Pending
                        }
                        EditorField::Title if title.trim().is_empty() => ModalOutcome::Pending,
                        EditorField::Title => ModalOutcome::Submit(ModalSubmit::Commit {
                            title: title.trim().to_string(),
                            message: message.trim_end().to_string(),
                            amend: *amend,
                        }),
                    },
                    KeyCode::Backspace => {
                        field.pop();
                        ModalOutcome::Pending
                    }
                    KeyCode::Char(c) => {
                        field.push(c);
                        ModalOutcome::Pending
                    }
                    _ => ModalOutcome::Pending,
                }
            }

            Modal::HardReset { typed } => match key.code {
                KeyCode::Esc => ModalOutcome::Closed,
                KeyCode::Enter => {
                    if typed.trim().eq_ignore_ascii_case("yes") {
                        ModalOutcome::Submit(ModalSubmit::HardReset)
                    } else {
                        typed.clear();
                        ModalOutcome::Pending
                    }
                }
                KeyCode::Backspace => {
                    typed.pop();
                    ModalOutcome::Pending
                }
                KeyCode::Char(c) => {
                    typed.push(c);
                    ModalOutcome::Pending
                }
                _ => ModalOutcome::Pending,
            },

            Modal::Upstream {
                input,
                suggestions,
                selected,
            } => match key.code {
                KeyCode::Esc => ModalOutcome::Closed,
                KeyCode::Tab | KeyCode::Down if !suggestions.is_empty() => {
                    *selected = (*selected + 1) % suggestions.len();
                    input.clone_from(&suggestions[*selected]);
                    ModalOutcome::Pending
                }
                KeyCode::BackTab | KeyCode::Up if !suggestions.is_empty() => {
                    *selected = (*selected + suggestions.len() - 1) % suggestions.len();
                    input.clone_from(&suggestions[*selected]);
                    ModalOutcome::Pending
                }
                KeyCode::Enter => match parse_upstream(input) {
                    Some((remote, branch)) => {
                        ModalOutcome::Submit(ModalSubmit::Upstream { remote, branch })
                    }
                    None => ModalOutcome::Pending,
                },
                KeyCode::Backspace => {
                    input.pop();
                    ModalOutcome::Pending
                }
                KeyCode::Char(c) => {
                    input.push(c);
                    ModalOutcome::Pending
                }
                _ => ModalOutcome::Pending,
            },

            Modal::Confirm { on_confirm, .. } => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    ModalOutcome::Submit(ModalSubmit::Confirm(on_confirm.clone()))
                }
                _ => ModalOutcome::Closed,
            },

            Modal::DeleteBranch { branch, selected } => {
                let submit = |scope| {
                    ModalOutcome::Submit(ModalSubmit::DeleteBranch {
                        branch: branch.clone(),
                        scope,
                    })
                };
                match key.code {
                    KeyCode::Esc => ModalOutcome::Closed,
                    KeyCode::Char('l') => submit(DeleteScope::Local),
                    KeyCode::Char('r') => submit(DeleteScope::Remote),
                    KeyCode::Char('b') => submit(DeleteScope::Both),
                    KeyCode::Enter => submit(DeleteScope::ALL[*selected]),
                    KeyCode::Up | KeyCode::Char('k') => {
                        *selected = selected.saturating_sub(1);
                        ModalOutcome::Pending
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        *selected = (*selected + 1).min(DeleteScope::ALL.len() - 1);
                        ModalOutcome::Pending
                    }
                    _ => ModalOutcome::Pending,
                }
            }
        }
    }
}

/// Split "remote branch" as typed in the upstream dialog
pub fn parse_upstream(input: &str) -> Option<(String, String)> {
    let mut parts = input.split_whitespace();
    let remote = parts.next()?;
    let branch = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((remote.to_string(), branch.to_string()))
}
