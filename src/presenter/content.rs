//! Content presenter - builds the board and reveals waypoints in batches.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::{Rc, Weak};

use spark_signals::{signal, Signal};
use tracing::{debug, error, info, warn};

use crate::config::{BoardConfig, EditorPolicy};
use crate::dom;
use crate::error::{BoardError, Result};
use crate::events::{self, InteractionKind};
use crate::model::{PointsModel, Waypoint};
use crate::render::{self, RenderPosition};
use crate::types::NodeId;
use crate::view::{
    BoardMounts, Component, FiltersView, MenuNavView, NoPointsView, RouteCostView, RouteInfoView,
    RouteWrapperView, SortingView, TripEventsListView,
};

use super::point::{BeforeEdit, PointMode, PointPresenter};
use super::session::{session_map, SessionMap};

/// Orchestrates the whole board.
///
/// Cheap to clone; clones share the same board.
#[derive(Clone)]
pub struct ContentPresenter {
    board: Rc<Board>,
}

struct Board {
    mounts: BoardMounts,
    model: Rc<PointsModel>,
    config: BoardConfig,

    points: RefCell<Vec<Waypoint>>,
    revealed: Signal<usize>,
    presenters: RefCell<Vec<Rc<RefCell<PointPresenter>>>>,
    sessions: SessionMap,

    route_wrapper: RouteWrapperView,
    events_list: TripEventsListView,
    chrome: RefCell<Vec<Box<dyn Component>>>,
    button_cleanup: RefCell<Option<Box<dyn FnOnce()>>>,
    initialized: Cell<bool>,
}

impl ContentPresenter {
    pub fn new(mounts: BoardMounts, model: Rc<PointsModel>, config: BoardConfig) -> Self {
        Self {
            board: Rc::new(Board {
                mounts,
                model,
                config,
                points: RefCell::new(Vec::new()),
                revealed: signal(0),
                presenters: RefCell::new(Vec::new()),
                sessions: session_map(),
                route_wrapper: RouteWrapperView::new(),
                events_list: TripEventsListView::new(),
                chrome: RefCell::new(Vec::new()),
                button_cleanup: RefCell::new(None),
                initialized: Cell::new(false),
            }),
        }
    }

    /// Copy the model's points and render the board.
    ///
    /// Calling it again is a no-op. On error nothing stays mounted, so `init`
    /// can be retried.
    ///
    /// # Errors
    ///
    /// - `DuplicatePointId` if two points share an id
    /// - any render error from a mount point
    pub fn init(&self) -> Result<()> {
        let board = &self.board;
        if board.initialized.get() {
            warn!("board already initialized");
            return Ok(());
        }

        let points = board.model.points();
        if let Some(id) = duplicate_id(points) {
            return Err(BoardError::DuplicatePointId(id.to_string()));
        }
        *board.points.borrow_mut() = points.to_vec();

        if let Err(err) = board.render_chrome().and_then(|()| board.render_events()) {
            self.destroy();
            return Err(err);
        }
        self.attach_reveal_listener();
        board.initialized.set(true);

        info!(
            total = board.total(),
            revealed = board.revealed.get(),
            "board initialized"
        );
        Ok(())
    }

    pub fn mounts(&self) -> BoardMounts {
        self.board.mounts
    }

    /// Reveal the next batch of points. Returns how many were rendered.
    pub fn reveal_more(&self) -> Result<usize> {
        self.board.reveal_more()
    }

    pub fn revealed_count(&self) -> usize {
        self.board.revealed.get()
    }

    /// Reactive view of the revealed count.
    pub fn revealed_signal(&self) -> Signal<usize> {
        self.board.revealed.clone()
    }

    pub fn total(&self) -> usize {
        self.board.total()
    }

    /// Number of live cancel-key sessions.
    pub fn open_editors(&self) -> usize {
        self.board.sessions.borrow().len()
    }

    pub fn point_mode(&self, id: &str) -> Option<PointMode> {
        self.board
            .presenters
            .borrow()
            .iter()
            .map(|presenter| presenter.borrow())
            .find(|presenter| presenter.id() == id)
            .map(|presenter| presenter.mode())
    }

    /// Ids of the revealed points, in render order.
    pub fn revealed_ids(&self) -> Vec<String> {
        self.board
            .presenters
            .borrow()
            .iter()
            .map(|presenter| presenter.borrow().id().to_string())
            .collect()
    }

    /// Node shown for a revealed point (card or edit form).
    pub fn point_node(&self, id: &str) -> Option<NodeId> {
        self.board
            .presenters
            .borrow()
            .iter()
            .map(|presenter| presenter.borrow())
            .find(|presenter| presenter.id() == id)
            .and_then(|presenter| presenter.mounted_node())
    }

    /// The `<ul>` holding the points, if the board has points.
    pub fn events_list_node(&self) -> Option<NodeId> {
        self.board.events_list.cache().get()
    }

    /// Tear the board down: every point, the chrome and the reveal listener.
    pub fn destroy(&self) {
        let board = &self.board;
        if let Some(cleanup) = board.button_cleanup.borrow_mut().take() {
            cleanup();
        }

        let presenters = std::mem::take(&mut *board.presenters.borrow_mut());
        for presenter in &presenters {
            presenter.borrow_mut().destroy();
        }

        for component in board.chrome.borrow_mut().drain(..) {
            render::remove(component.as_ref());
        }
        render::remove(&board.events_list);
        render::remove(&board.route_wrapper);

        dom::remove_attribute(board.mounts.new_event_button, "disabled");
        board.revealed.set(0);
        board.initialized.set(false);
        debug!("board destroyed");
    }

    fn attach_reveal_listener(&self) {
        let weak: Weak<Board> = Rc::downgrade(&self.board);
        let cleanup = events::on(
            self.board.mounts.new_event_button,
            InteractionKind::Click,
            move |_| {
                let Some(board) = weak.upgrade() else {
                    return;
                };
                if let Err(err) = board.reveal_more() {
                    error!(%err, "reveal failed");
                }
            },
        );
        *self.board.button_cleanup.borrow_mut() = Some(Box::new(cleanup));
    }
}

/// First id that appears more than once.
fn duplicate_id(points: &[Waypoint]) -> Option<&str> {
    let mut seen = HashSet::new();
    points
        .iter()
        .map(|point| point.id.as_str())
        .find(|id| !seen.insert(*id))
}

impl Board {
    fn total(&self) -> usize {
        self.points.borrow().len()
    }

    /// Render a chrome component and keep it for teardown, even if the
    /// render failed after materializing it.
    fn mount_chrome(
        &self,
        component: Box<dyn Component>,
        container: NodeId,
        position: RenderPosition,
    ) -> Result<()> {
        let result = render::render(component.as_ref(), container, position);
        self.chrome.borrow_mut().push(component);
        result
    }

    fn render_chrome(&self) -> Result<()> {
        let (route_info, route_cost) = {
            let points = self.points.borrow();
            (RouteInfoView::new(&points), RouteCostView::new(&points))
        };

        render::render(&self.route_wrapper, self.mounts.route_container, RenderPosition::Prepend)?;
        let wrapper = self.route_wrapper.element()?;
        self.mount_chrome(Box::new(route_info), wrapper, RenderPosition::Append)?;
        self.mount_chrome(Box::new(route_cost), wrapper, RenderPosition::Append)?;

        let menu = MenuNavView::new();
        self.mount_chrome(Box::new(menu), self.mounts.menu_container, RenderPosition::Append)?;
        let filters = FiltersView::new(self.config.filters.clone());
        self.mount_chrome(Box::new(filters), self.mounts.filters_container, RenderPosition::Append)
    }

    fn render_events(self: &Rc<Self>) -> Result<()> {
        let container = self.mounts.events_container;

        if self.total() == 0 {
            self.mount_chrome(Box::new(NoPointsView::new()), container, RenderPosition::Append)?;
            self.update_button();
            debug!("no points, placeholder rendered");
            return Ok(());
        }

        self.mount_chrome(Box::new(SortingView::new()), container, RenderPosition::Append)?;
        render::render(&self.events_list, container, RenderPosition::Append)?;

        let count = self.config.initial_batch.min(self.total());
        self.render_points(0, count)?;
        Ok(())
    }

    fn reveal_more(self: &Rc<Self>) -> Result<usize> {
        let start = self.revealed.get();
        let count = self.config.step.min(self.total().saturating_sub(start));
        if count == 0 {
            warn!(revealed = start, "nothing left to reveal");
            return Ok(0);
        }
        self.render_points(start, count)?;
        debug!(from = start, count, "revealed more points");
        Ok(count)
    }

    /// Render `count` points starting at `start`, then advance the count.
    fn render_points(self: &Rc<Self>, start: usize, count: usize) -> Result<()> {
        let list = self.events_list.element()?;
        let batch: Vec<Waypoint> = self.points.borrow()[start..start + count].to_vec();

        for point in batch {
            let presenter = PointPresenter::new(
                point,
                list,
                self.sessions.clone(),
                self.config.cancel_keys.clone(),
                self.before_edit(),
            );
            let rendered = presenter.borrow().init();
            if let Err(err) = rendered {
                presenter.borrow_mut().destroy();
                return Err(err);
            }
            self.presenters.borrow_mut().push(presenter);
            self.revealed.set(self.revealed.get() + 1);
        }

        self.update_button();
        Ok(())
    }

    fn before_edit(self: &Rc<Self>) -> Option<BeforeEdit> {
        match self.config.editor_policy {
            EditorPolicy::Concurrent => None,
            EditorPolicy::Single => {
                let weak = Rc::downgrade(self);
                Some(Rc::new(move |id: &str| {
                    if let Some(board) = weak.upgrade() {
                        board.close_editors_except(id);
                    }
                }))
            }
        }
    }

    fn close_editors_except(&self, id: &str) {
        let others: Vec<_> = self
            .presenters
            .borrow()
            .iter()
            .filter(|presenter| presenter.borrow().id() != id)
            .cloned()
            .collect();

        for presenter in others {
            if let Err(err) = PointPresenter::reset_view(&presenter) {
                error!(%err, "failed to close editor");
            }
        }
    }

    /// Disable the new-event button once every point is shown.
    fn update_button(&self) {
        if self.revealed.get() >= self.total() {
            dom::set_attribute(self.mounts.new_event_button, "disabled", "");
        }
    }
}
