//! Chat tab view machine and poll timer.
//!
//! [`ChatView`] is a pure state machine over scroll positions: the
//! platform layer reports scroll geometry and message arrivals, and the
//! view answers with [`ChatAction`]s (scroll to bottom, load an older
//! page, adjust the scroll offset after a prepend). Keeping it pure
//! means the near-bottom and near-top rules are unit testable without a
//! renderer.
//!
//! [`ChatPoller`] drives the periodic ask for newer messages. It only
//! exists while the chat tab is mounted; dropping it cancels the timer.

use std::{future::Future, time::Duration};

use tokio::{task::JoinHandle, time::MissedTickBehavior};

/// Viewport distance from the bottom under which new messages
/// auto-scroll instead of raising the affordance.
pub const NEAR_BOTTOM_PX: f64 = 100.0;

/// Viewport distance from the top under which an older page loads.
pub const NEAR_TOP_PX: f64 = 20.0;

/// Interval between asks for newer messages.
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Lifecycle phase of the chat tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatPhase {
    /// Not mounted.
    Idle,
    /// First page in flight; the viewport has nothing to anchor to.
    InitialLoad,
    /// Rendering messages; polling and older-page loads are live.
    Ready,
}

/// What the platform layer should do in response to a view event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChatAction {
    /// Snap the viewport to the newest message.
    ScrollToBottom,
    /// Fetch the next older page.
    LoadOlderPage,
    /// Move the viewport down by this many pixels so the previously
    /// topmost message keeps its on-screen position after a prepend.
    AdjustScroll(f64),
}

/// Scroll and arrival logic for the chat tab.
#[derive(Debug, Clone)]
pub struct ChatView {
    phase: ChatPhase,
    loading_older: bool,
    new_messages: bool,
}

impl Default for ChatView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatView {
    /// A fresh, unmounted view.
    pub const fn new() -> Self {
        Self { phase: ChatPhase::Idle, loading_older: false, new_messages: false }
    }

    /// Current phase.
    pub const fn phase(&self) -> ChatPhase {
        self.phase
    }

    /// Whether the unseen-messages affordance should be shown.
    pub const fn has_new_messages(&self) -> bool {
        self.new_messages
    }

    /// Whether the poll loop may append right now. Older-page loads and
    /// poll appends are mutually exclusive so a prepend and an append
    /// never fight over the scroll anchor.
    pub const fn can_poll(&self) -> bool {
        matches!(self.phase, ChatPhase::Ready) && !self.loading_older
    }

    /// Mount the tab and start the initial load.
    pub fn mount(&mut self) {
        self.phase = ChatPhase::InitialLoad;
        self.loading_older = false;
        self.new_messages = false;
    }

    /// The initial page arrived; the viewport starts at the newest
    /// message.
    pub fn initial_loaded(&mut self) -> ChatAction {
        self.phase = ChatPhase::Ready;
        ChatAction::ScrollToBottom
    }

    /// The viewport scrolled. `offset_from_top` is the distance to the
    /// oldest loaded message; crossing the near-top threshold loads an
    /// older page, unless one is already in flight or the listing is
    /// exhausted.
    pub fn scrolled(&mut self, offset_from_top: f64, reached_end: bool) -> Option<ChatAction> {
        if self.phase != ChatPhase::Ready
            || self.loading_older
            || reached_end
            || offset_from_top > NEAR_TOP_PX
        {
            return None;
        }
        self.loading_older = true;
        Some(ChatAction::LoadOlderPage)
    }

    /// An older page was prepended, growing the content by
    /// `inserted_height` pixels above the previous top.
    pub fn older_loaded(&mut self, inserted_height: f64) -> ChatAction {
        self.loading_older = false;
        ChatAction::AdjustScroll(inserted_height)
    }

    /// An older-page load failed; release the guard so scrolling can
    /// retry.
    pub fn older_failed(&mut self) {
        self.loading_older = false;
    }

    /// The poll loop appended messages. Near the bottom the viewport
    /// follows them; further up the affordance is raised instead.
    pub fn new_messages_arrived(&mut self, offset_from_bottom: f64) -> Option<ChatAction> {
        if self.phase != ChatPhase::Ready {
            return None;
        }
        if offset_from_bottom <= NEAR_BOTTOM_PX {
            Some(ChatAction::ScrollToBottom)
        } else {
            self.new_messages = true;
            None
        }
    }

    /// The user tapped the affordance.
    pub fn jump_to_latest(&mut self) -> ChatAction {
        self.new_messages = false;
        ChatAction::ScrollToBottom
    }

    /// The viewport reached the bottom by scrolling; the affordance is
    /// spent.
    pub fn reached_bottom(&mut self) {
        self.new_messages = false;
    }

    /// Unmount the tab.
    pub fn unmount(&mut self) {
        self.phase = ChatPhase::Idle;
        self.loading_older = false;
        self.new_messages = false;
    }
}

/// Handle for the periodic newer-messages poll. Runs only while held;
/// dropping it aborts the timer task.
#[derive(Debug)]
pub struct ChatPoller {
    handle: JoinHandle<()>,
}

impl ChatPoller {
    /// Spawn a poll loop that invokes `poll` every [`POLL_INTERVAL`],
    /// starting one interval from now.
    pub fn spawn<F, Fut>(mut poll: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(POLL_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick fires immediately; the initial page load
            // already covers it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                poll().await;
            }
        });
        Self { handle }
    }
}

impl Drop for ChatPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
