//
// Copyright (c) The Yangsh Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::borrow::Cow;
use std::sync::{Arc, Mutex};

use reedline::{
    ColumnarMenu, Completer, KeyCode, KeyModifiers, Prompt, PromptEditMode,
    PromptHistorySearch, PromptHistorySearchStatus, Reedline, ReedlineEvent,
    ReedlineMenu, Span, Suggestion, Vi,
};

use crate::session::Session;

static DEFAULT_PROMPT_INDICATOR: &str = "> ";
static DEFAULT_MULTILINE_INDICATOR: &str = "::: ";

#[derive(Clone)]
pub struct CliPrompt(String);

#[derive(Clone)]
pub struct CliCompleter(Arc<Mutex<Session>>);

// ===== impl CliPrompt =====

impl CliPrompt {
    pub(crate) fn new(string: String) -> Self {
        Self(string)
    }

    pub(crate) fn update(&mut self, string: String) {
        self.0 = string;
    }
}

impl Prompt for CliPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Owned(self.0.clone())
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(
        &self,
        _edit_mode: PromptEditMode,
    ) -> Cow<'_, str> {
        DEFAULT_PROMPT_INDICATOR.into()
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        DEFAULT_MULTILINE_INDICATOR.into()
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse-search: {}) ",
            prefix, history_search.term
        ))
    }
}

// ===== impl CliCompleter =====

impl CliCompleter {
    pub(crate) fn new(session: Arc<Mutex<Session>>) -> CliCompleter {
        CliCompleter(session)
    }
}

impl Completer for CliCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let session = self.0.lock().unwrap();
        let completions = session.completions(&line[..pos]);

        completions
            .completions
            .into_iter()
            .map(|value| Suggestion {
                value,
                description: None,
                extra: None,
                span: Span {
                    start: pos - completions.context_length,
                    end: pos,
                },
                append_whitespace: false,
            })
            .collect()
    }
}

// ===== global functions =====

pub(crate) fn reedline_init(
    session: Arc<Mutex<Session>>,
    use_ansi_coloring: bool,
) -> Reedline {
    let completer = Box::new(CliCompleter::new(session));
    let completion_menu =
        Box::new(ColumnarMenu::default().with_name("completion_menu"));

    let mut insert_keybindings = reedline::default_vi_insert_keybindings();
    let normal_keybindings = reedline::default_vi_normal_keybindings();
    insert_keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu("completion_menu".to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );

    let edit_mode = Box::new(Vi::new(insert_keybindings, normal_keybindings));
    Reedline::create()
        .with_ansi_colors(use_ansi_coloring)
        .with_completer(completer)
        .with_quick_completions(true)
        .with_partial_completions(true)
        .with_edit_mode(edit_mode)
        .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
}
