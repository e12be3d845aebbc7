//! Mapping of key events to dashboard actions.
//!
//! Configurable actions come from `[keybindings]`. A binding that does not
//! parse falls back to that action's default; when two actions share a key
//! the one declared first keeps it.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::{Key, KeyBinding, KeybindingsConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    Help,
    Refresh,
    AddTask,
    EditTask,
    ToggleTask,
    DeleteTask,
    SetPriority,
    ToggleCompleted,
    CycleSort,
    ExportTasks,
    TimerFocus,
    TimerBreak,
    TimerStop,
    ReloadConfig,
    EditConfig,
}

impl Action {
    /// Action for a `[keybindings]` field name.
    pub fn from_name(name: &str) -> Option<Self> {
        let action = match name {
            "quit" => Action::Quit,
            "help" => Action::Help,
            "refresh" => Action::Refresh,
            "add_task" => Action::AddTask,
            "edit_task" => Action::EditTask,
            "toggle_task" => Action::ToggleTask,
            "delete_task" => Action::DeleteTask,
            "set_priority" => Action::SetPriority,
            "toggle_completed" => Action::ToggleCompleted,
            "cycle_sort" => Action::CycleSort,
            "export_tasks" => Action::ExportTasks,
            "timer_focus" => Action::TimerFocus,
            "timer_break" => Action::TimerBreak,
            "timer_stop" => Action::TimerStop,
            "reload_config" => Action::ReloadConfig,
            "edit_config" => Action::EditConfig,
            _ => return None,
        };
        Some(action)
    }

    /// Short description for help and footer.
    pub fn description(&self) -> &'static str {
        match self {
            Action::Quit => "Quit",
            Action::Help => "Show help",
            Action::Refresh => "Refresh all panels",
            Action::AddTask => "Add task",
            Action::EditTask => "Edit task",
            Action::ToggleTask => "Toggle done",
            Action::DeleteTask => "Delete task",
            Action::SetPriority => "Set priority",
            Action::ToggleCompleted => "Show/hide completed",
            Action::CycleSort => "Cycle sort order",
            Action::ExportTasks => "Export to Markdown",
            Action::TimerFocus => "Start focus session",
            Action::TimerBreak => "Start break",
            Action::TimerStop => "Stop timer",
            Action::ReloadConfig => "Reload configuration",
            Action::EditConfig => "Edit configuration",
        }
    }
}

/// Resolved bindings for every configurable action.
#[derive(Debug, Clone)]
pub struct Keymap {
    by_key: HashMap<KeyBinding, Action>,
    by_action: Vec<(Action, KeyBinding)>,
}

impl Keymap {
    pub fn from_config(config: &KeybindingsConfig) -> Self {
        let defaults = KeybindingsConfig::default();
        let default_entries: HashMap<&str, &str> = defaults.entries().into_iter().collect();

        let mut by_key = HashMap::new();
        let mut by_action = Vec::new();

        for (name, raw) in config.entries() {
            let Some(action) = Action::from_name(name) else {
                continue;
            };
            let binding = KeyBinding::parse(raw).or_else(|| {
                default_entries
                    .get(name)
                    .and_then(|default| KeyBinding::parse(default))
            });
            let Some(binding) = binding else {
                continue;
            };

            if let Some(existing) = by_key.get(&binding) {
                tracing::warn!(?action, ?existing, key = %binding, "Key already bound, ignoring");
                continue;
            }
            by_key.insert(binding, action);
            by_action.push((action, binding));
        }

        Self { by_key, by_action }
    }

    pub fn action_for(&self, event: &KeyEvent) -> Option<Action> {
        let binding = binding_from_event(event)?;
        self.by_key.get(&binding).copied()
    }

    pub fn binding_for(&self, action: Action) -> Option<KeyBinding> {
        self.by_action
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, b)| *b)
    }

    /// Display label for an action's key, `-` when unbound.
    pub fn label(&self, action: Action) -> String {
        self.binding_for(action)
            .map(|b| b.to_string())
            .unwrap_or_else(|| "-".to_string())
    }

    /// Bound actions in declaration order.
    pub fn bindings(&self) -> &[(Action, KeyBinding)] {
        &self.by_action
    }
}

/// Translate a crossterm key event. Shift is folded into the character.
pub fn binding_from_event(event: &KeyEvent) -> Option<KeyBinding> {
    let key = match event.code {
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::F(n) => Key::F(n),
        _ => return None,
    };
    Some(KeyBinding {
        key,
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
        alt: event.modifiers.contains(KeyModifiers::ALT),
    })
}
