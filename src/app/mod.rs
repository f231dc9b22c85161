// Application state management
//
// This module is organized into submodules:
// - config: Configuration types, constants and command-line arguments
// - event: Keyboard event handling
//
// AppState owns the refresh pipeline and the view state the terminal UI
// draws from. ViewState is the Presenter the pipeline renders into.

pub mod config;
pub mod event;

use crate::pipeline::actions::ActionOutcome;
use crate::pipeline::fetcher::FetchOutcome;
use crate::pipeline::{InputField, Notice, Pipeline, Presenter};
use crate::render::{Scene, Surface};
use crate::ui::metrics::MetricsView;
use config::RefreshConfig;
use std::future::Future;

/// Longest text accepted in an input field (u64::MAX has 20 digits)
pub const MAX_INPUT_LEN: usize = 20;

/// The three action input fields and which one has focus
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputFields {
    pub fail_node: String,
    pub source: String,
    pub target: String,
    pub focus: InputField,
}

impl InputFields {
    pub fn get(&self, field: InputField) -> &str {
        match field {
            InputField::FailNode => &self.fail_node,
            InputField::Source => &self.source,
            InputField::Target => &self.target,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            InputField::FailNode => &mut self.fail_node,
            InputField::Source => &mut self.source,
            InputField::Target => &mut self.target,
        }
    }

    /// Append a character to the focused field
    pub fn push(&mut self, c: char) {
        let field = self.focused_mut();
        if field.chars().count() < MAX_INPUT_LEN {
            field.push(c);
        }
    }

    /// Delete the last character of the focused field
    pub fn backspace(&mut self) {
        self.focused_mut().pop();
    }

    /// Move focus forward: fail node -> source -> target -> fail node
    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            InputField::FailNode => InputField::Source,
            InputField::Source => InputField::Target,
            InputField::Target => InputField::FailNode,
        };
    }

    /// Move focus backward
    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            InputField::FailNode => InputField::Target,
            InputField::Source => InputField::FailNode,
            InputField::Target => InputField::Source,
        };
    }
}

/// Everything the pipeline writes for the terminal to show
#[derive(Debug, Default)]
pub struct ViewState {
    /// Display list of the last rendered frame
    pub scene: Scene,
    /// Metrics of the last applied snapshot
    pub metrics: Option<MetricsView>,
    /// Action input fields
    pub inputs: InputFields,
    /// Message popup, shown until dismissed
    pub notice: Option<Notice>,
}

impl Presenter for ViewState {
    fn set_metrics(&mut self, metrics: MetricsView) {
        self.metrics = Some(metrics);
    }

    fn canvas(&mut self) -> &mut dyn Surface {
        &mut self.scene
    }

    fn read_input(&self, field: InputField) -> String {
        self.inputs.get(field).to_string()
    }

    fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }
}

/// Results of background work, delivered back to the event loop
#[derive(Debug)]
pub enum AppEvent {
    Fetched(FetchOutcome),
    ActionDone(ActionOutcome),
}

/// Main application state
pub struct AppState {
    /// Whether the application is running
    pub running: bool,

    /// Backend URL, shown in the status bar
    pub backend_url: String,

    /// Snapshot store and refresh cycle
    pub pipeline: Pipeline,

    /// What the terminal draws
    pub view: ViewState,

    /// Refresh interval configuration
    pub refresh_config: RefreshConfig,
}

impl AppState {
    pub fn new(backend_url: String, pipeline: Pipeline, refresh_config: RefreshConfig) -> Self {
        Self {
            running: true,
            backend_url,
            pipeline,
            view: ViewState::default(),
            refresh_config,
        }
    }

    /// Validate the fail-node field and prepare the request
    ///
    /// Invalid input is reported to the user right away and nothing is
    /// returned, so no request is sent.
    pub fn prepare_fail_node(&mut self) -> Option<impl Future<Output = ActionOutcome> + Send + 'static> {
        let input = self.view.read_input(InputField::FailNode);
        match self.pipeline.actions().fail_node(&input) {
            Ok(request) => Some(request),
            Err(e) => {
                tracing::info!(error = %e, "Rejected fail node input");
                self.view.notify(Notice::failure(e.to_string()));
                None
            }
        }
    }

    /// Validate the source and target fields and prepare the route query
    pub fn prepare_find_path(&mut self) -> Option<impl Future<Output = ActionOutcome> + Send + 'static> {
        let source = self.view.read_input(InputField::Source);
        let target = self.view.read_input(InputField::Target);
        match self.pipeline.actions().find_path(&source, &target) {
            Ok(request) => Some(request),
            Err(e) => {
                tracing::info!(error = %e, "Rejected route input");
                self.view.notify(Notice::failure(e.to_string()));
                None
            }
        }
    }

    /// Show the result of a finished action
    ///
    /// Returns `true` when a refresh should follow.
    pub fn on_action_done(&mut self, outcome: ActionOutcome) -> bool {
        self.view.notify(outcome.notice);
        outcome.refresh
    }

    /// Apply a finished background task
    ///
    /// Returns `true` when a new fetch should be issued.
    pub fn handle_app_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Fetched(outcome) => {
                self.pipeline.apply(outcome, &mut self.view);
                false
            }
            AppEvent::ActionDone(outcome) => self.on_action_done(outcome),
        }
    }

    /// Close the message popup
    pub fn dismiss_notice(&mut self) {
        self.view.notice = None;
    }
}
