//! Poketable - a paginated Pokemon catalog TUI

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_components::centered_rect;
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use poketable::action::Action;
use poketable::api;
use poketable::components::{
    CatalogTable, CatalogTableProps, Component, DetailOverlay, DetailOverlayProps, FilterHeader,
    FilterHeaderProps, StatusFooter, StatusFooterProps,
};
use poketable::effect::Effect;
use poketable::reducer::reducer;
use poketable::state::AppState;

const TICK_MS: u64 = 120;

/// Poketable - browse the Pokemon catalog in the terminal
#[derive(Parser, Debug)]
#[command(name = "poketable")]
#[command(about = "A paginated, searchable Pokemon catalog TUI")]
struct Args {
    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum CatalogComponentId {
    Header,
    Table,
    Detail,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum CatalogContext {
    Main,
    Search,
    Detail,
}

impl EventRoutingState<CatalogComponentId, CatalogContext> for AppState {
    fn focused(&self) -> Option<CatalogComponentId> {
        if self.detail_open {
            Some(CatalogComponentId::Detail)
        } else if self.search_active {
            Some(CatalogComponentId::Header)
        } else {
            Some(CatalogComponentId::Table)
        }
    }

    fn modal(&self) -> Option<CatalogComponentId> {
        if self.detail_open {
            Some(CatalogComponentId::Detail)
        } else if self.search_active {
            Some(CatalogComponentId::Header)
        } else {
            None
        }
    }

    fn binding_context(&self, id: CatalogComponentId) -> CatalogContext {
        match id {
            CatalogComponentId::Header => CatalogContext::Search,
            CatalogComponentId::Table => CatalogContext::Main,
            CatalogComponentId::Detail => CatalogContext::Detail,
        }
    }

    fn default_context(&self) -> CatalogContext {
        CatalogContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args { debug: debug_args } = Args::parse();

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(|| async { Ok::<AppState, io::Error>(AppState::default()) })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

struct CatalogUi {
    header: FilterHeader,
    table: CatalogTable,
    overlay: DetailOverlay,
    footer: StatusFooter,
}

impl CatalogUi {
    fn new() -> Self {
        Self {
            header: FilterHeader,
            table: CatalogTable::new(),
            overlay: DetailOverlay::new(),
            footer: StatusFooter,
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<CatalogComponentId>,
    ) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .split(area);

        event_ctx.set_component_area(CatalogComponentId::Header, layout[0]);
        event_ctx.set_component_area(CatalogComponentId::Table, layout[1]);

        self.header.render(
            frame,
            layout[0],
            FilterHeaderProps {
                state,
                is_focused: render_ctx.is_focused() && state.search_active,
            },
        );
        self.table.render(
            frame,
            layout[1],
            CatalogTableProps {
                state,
                is_focused: !state.search_active && !state.detail_open,
            },
        );
        self.footer
            .render(frame, layout[2], StatusFooterProps { state });

        if state.detail_open {
            let modal_area = centered_rect(56, 22, area);
            event_ctx.set_component_area(CatalogComponentId::Detail, modal_area);
            self.overlay.render(
                frame,
                area,
                DetailOverlayProps {
                    state,
                    is_focused: true,
                },
            );
        } else {
            event_ctx
                .component_areas
                .remove(&CatalogComponentId::Detail);
        }
    }

    fn handle_header_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = FilterHeaderProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.header.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }

    fn handle_table_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = CatalogTableProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.table.handle_event(event, props).into_iter().collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }

    fn handle_detail_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = DetailOverlayProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.overlay.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(CatalogUi::new()));
    let mut bus: EventBus<AppState, Action, CatalogComponentId, CatalogContext> = EventBus::new();
    let keybindings: Keybindings<CatalogContext> = Keybindings::new();

    let ui_header = Rc::clone(&ui);
    bus.register(CatalogComponentId::Header, move |event, state| {
        ui_header
            .borrow_mut()
            .handle_header_event(&event.kind, state)
    });

    let ui_table = Rc::clone(&ui);
    bus.register(CatalogComponentId::Table, move |event, state| {
        ui_table.borrow_mut().handle_table_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(CatalogComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    bus.register_global(|event, state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        EventKind::Key(key) => match key.code {
            crossterm::event::KeyCode::Char('q') if !state.search_active => {
                HandlerResponse::action(Action::Quit)
            }
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::CatalogFetch),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(TICK_MS), || Action::Tick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::LoadCatalog { limit } => {
            ctx.tasks().spawn(TaskKey::new("catalog"), async move {
                match api::fetch_catalog(limit).await {
                    Ok(entries) => Action::CatalogDidLoad(entries),
                    Err(error) => Action::CatalogDidError(error),
                }
            });
        }
        Effect::LoadGenerationMembers { id } => {
            let key = format!("generation_{id}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match api::fetch_generation_members(id).await {
                    Ok(species) => Action::GenerationDidLoad { id, species },
                    Err(error) => Action::GenerationDidError { id, error },
                }
            });
        }
        Effect::LoadDetail { id, name } => {
            let key = format!("detail_{id}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match api::fetch_detail(id).await {
                    Ok(record) => Action::DetailDidLoad(record),
                    Err(error) => Action::DetailDidError { name, error },
                }
            });
        }
    }
}
