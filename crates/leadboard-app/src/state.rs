// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Notice, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKind {
    Status,
    Owner,
}

impl PickerKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Owner => "owner",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Nav,
    Search,
    Pick(PickerKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub help_visible: bool,
    pub status_line: Option<StatusLine>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Nav,
            help_visible: false,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    EnterSearch,
    ExitToNav,
    OpenPicker(PickerKind),
    ToggleHelp,
    Notify(Notice),
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    HelpChanged(bool),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::EnterSearch => {
                self.mode = AppMode::Search;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ExitToNav => {
                self.mode = AppMode::Nav;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::OpenPicker(kind) => {
                self.mode = AppMode::Pick(kind);
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ToggleHelp => {
                self.help_visible = !self.help_visible;
                vec![AppEvent::HelpChanged(self.help_visible)]
            }
            AppCommand::Notify(notice) => {
                let text = if notice.message.is_empty() {
                    notice.title
                } else {
                    format!("{}: {}", notice.title, notice.message)
                };
                vec![self.set_status(text, Some(notice.severity))]
            }
            AppCommand::SetStatus(text) => vec![self.set_status(text, None)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn set_status(&mut self, text: String, severity: Option<Severity>) -> AppEvent {
        self.status_line = Some(StatusLine {
            text: text.clone(),
            severity,
        });
        AppEvent::StatusUpdated(text)
    }
}
