// Chart board - the state one screen owns: active dataset, chart kind, refresh state
use crate::domain::dataset::{ChartDataset, ChartKind};
use crate::domain::refresh::{Notice, RefreshState};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use tokio::sync::{RwLock, broadcast};

const EVENT_CAPACITY: usize = 64;
const MAX_RECENT_NOTICES: usize = 10;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardEvent {
    Loading,
    Published {
        file_name: String,
        at: DateTime<Utc>,
        dataset: ChartDataset,
    },
    Cleared,
    KindChanged {
        kind: ChartKind,
    },
    AutoRefresh {
        enabled: bool,
    },
    Notice(Notice),
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot {
    pub dataset: Option<ChartDataset>,
    pub kind: ChartKind,
    pub refresh: RefreshState,
    pub notices: Vec<Notice>,
}

#[derive(Debug)]
struct BoardState {
    dataset: Option<ChartDataset>,
    kind: ChartKind,
    refresh: RefreshState,
    notices: VecDeque<Notice>,
}

pub struct ChartBoard {
    name: &'static str,
    state: RwLock<BoardState>,
    events: broadcast::Sender<BoardEvent>,
}

impl ChartBoard {
    pub fn new(name: &'static str, auto_refresh_enabled: bool) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            name,
            state: RwLock::new(BoardState {
                dataset: None,
                kind: ChartKind::default(),
                refresh: RefreshState::new(auto_refresh_enabled),
                notices: VecDeque::new(),
            }),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> BoardSnapshot {
        let state = self.state.read().await;
        BoardSnapshot {
            dataset: state.dataset.clone(),
            kind: state.kind,
            refresh: state.refresh.clone(),
            notices: state.notices.iter().cloned().collect(),
        }
    }

    /// Enter the loading state. Returns `false` when a refresh is already in flight.
    pub async fn try_begin_loading(&self) -> bool {
        {
            let mut state = self.state.write().await;
            if state.refresh.is_loading {
                return false;
            }
            state.refresh.is_loading = true;
        }
        self.emit(BoardEvent::Loading);
        true
    }

    pub async fn finish_loading(&self) {
        self.state.write().await.refresh.is_loading = false;
    }

    /// Replace the active dataset wholesale and leave the loading state.
    pub async fn publish(&self, file_name: &str, dataset: ChartDataset) -> DateTime<Utc> {
        let at = Utc::now();
        {
            let mut state = self.state.write().await;
            state.dataset = Some(dataset.clone());
            state.refresh.active_file_name = Some(file_name.to_string());
            state.refresh.last_update = Some(at);
            state.refresh.is_loading = false;
        }

        tracing::info!(
            board = self.name,
            "Published {} points from {}",
            dataset.len(),
            file_name
        );
        self.emit(BoardEvent::Published {
            file_name: file_name.to_string(),
            at,
            dataset,
        });
        at
    }

    pub async fn clear(&self) {
        {
            let mut state = self.state.write().await;
            state.dataset = None;
            state.refresh.active_file_name = None;
            state.refresh.last_update = None;
        }
        self.emit(BoardEvent::Cleared);
    }

    pub async fn set_kind(&self, kind: ChartKind) {
        self.state.write().await.kind = kind;
        tracing::debug!(board = self.name, "Chart kind set to {}", kind);
        self.emit(BoardEvent::KindChanged { kind });
    }

    pub async fn auto_refresh_enabled(&self) -> bool {
        self.state.read().await.refresh.auto_refresh_enabled
    }

    pub async fn set_auto_refresh(&self, enabled: bool) {
        self.state.write().await.refresh.auto_refresh_enabled = enabled;
        self.emit(BoardEvent::AutoRefresh { enabled });
    }

    /// Claim the one-time first-load alert. Only the first caller gets `true`.
    pub async fn take_first_alert(&self) -> bool {
        let mut state = self.state.write().await;
        if state.refresh.has_shown_first_alert {
            false
        } else {
            state.refresh.has_shown_first_alert = true;
            true
        }
    }

    pub async fn notify(&self, notice: Notice) {
        {
            let mut state = self.state.write().await;
            if state.notices.len() == MAX_RECENT_NOTICES {
                state.notices.pop_front();
            }
            state.notices.push_back(notice.clone());
        }
        self.emit(BoardEvent::Notice(notice));
    }

    fn emit(&self, event: BoardEvent) {
        // No subscribers is fine, nobody is watching the stream
        let _ = self.events.send(event);
    }
}
