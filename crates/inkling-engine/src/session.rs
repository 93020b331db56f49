//! Elaboration session state and the shared session store.
//!
//! A session accumulates two things across rounds: the append-only
//! interaction history replayed to the model as conversational context,
//! and the set of highlight phrases already suggested, which must never
//! be proposed again. Highlights are the exclusion key (not paragraph
//! numbers) so an exclusion survives the author editing the entry and
//! the paragraphs renumbering.
//!
//! The store hands out each session behind its own `Mutex`; callers hold
//! that lock across the provider round-trip, which serializes concurrent
//! requests against one session without blocking other sessions.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use inkling_core::defaults::SESSION_CAPACITY;
use inkling_core::{ChatTurn, Interaction};

/// One user's elaboration session.
#[derive(Debug)]
pub struct Session {
    id: String,
    excluded_highlights: BTreeSet<String>,
    history: Vec<Interaction>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            excluded_highlights: BTreeSet::new(),
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Completed interactions, oldest first.
    pub fn history(&self) -> &[Interaction] {
        &self.history
    }

    /// Highlight phrases already suggested in this session.
    pub fn excluded_highlights(&self) -> &BTreeSet<String> {
        &self.excluded_highlights
    }

    /// Add a highlight to the exclusion set. The set only ever grows;
    /// returns false when the highlight was already excluded.
    pub fn exclude(&mut self, highlight: impl Into<String>) -> bool {
        self.excluded_highlights.insert(highlight.into())
    }

    /// Append a completed interaction to the history.
    pub fn record(&mut self, interaction: Interaction) {
        self.history.push(interaction);
    }

    /// Render the full history as alternating user/assistant turns for
    /// a generation backend.
    pub fn render_history(&self) -> Vec<ChatTurn> {
        self.history
            .iter()
            .flat_map(|interaction| interaction.to_chat_turns())
            .collect()
    }
}

struct SessionSlot {
    session: Arc<Mutex<Session>>,
    last_active: u64,
}

struct StoreInner {
    sessions: HashMap<String, SessionSlot>,
    /// Monotonic activity tick; bumped on every checkout.
    clock: u64,
}

impl StoreInner {
    /// Evict the least-recently-active session no caller currently holds.
    /// A slot whose `Arc` has extra references is checked out mid-round
    /// and is never evicted.
    fn evict_idle(&mut self) -> bool {
        let victim = self
            .sessions
            .iter()
            .filter(|(_, slot)| Arc::strong_count(&slot.session) == 1)
            .min_by_key(|(_, slot)| slot.last_active)
            .map(|(id, _)| id.clone());

        match victim {
            Some(id) => {
                self.sessions.remove(&id);
                debug!(session_id = %id, "session store: evicted idle session");
                true
            }
            None => false,
        }
    }
}

/// In-memory store of live elaboration sessions, bounded by capacity.
pub struct SessionStore {
    inner: RwLock<StoreInner>,
    capacity: usize,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_capacity(SESSION_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                sessions: HashMap::new(),
                clock: 0,
            }),
            capacity: capacity.max(1),
        }
    }

    /// Fetch the session for `id`, creating it on first use.
    ///
    /// Checkout is idempotent: the same id always maps to the same live
    /// session. When creating would exceed capacity, the least-recently-
    /// active idle session is evicted first; if every session is checked
    /// out the store grows past capacity rather than failing the caller.
    pub async fn checkout(&self, id: &str) -> Arc<Mutex<Session>> {
        let mut inner = self.inner.write().await;
        inner.clock += 1;
        let tick = inner.clock;

        if let Some(slot) = inner.sessions.get_mut(id) {
            slot.last_active = tick;
            return slot.session.clone();
        }

        if inner.sessions.len() >= self.capacity && !inner.evict_idle() {
            warn!(
                capacity = self.capacity,
                "session store: every session is checked out, growing past capacity"
            );
        }

        let session = Arc::new(Mutex::new(Session::new(id)));
        inner.sessions.insert(
            id.to_string(),
            SessionSlot {
                session: session.clone(),
                last_active: tick,
            },
        );
        debug!(
            session_id = %id,
            sessions = inner.sessions.len(),
            "session store: created session"
        );
        session
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.inner.read().await.sessions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.inner.read().await.sessions.contains_key(id)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
