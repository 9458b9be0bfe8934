//! Caller-owned feed state: the latest load plus view settings

use async_trait::async_trait;
use tracing::{info, warn};

use crate::{apply_view, group_activities, Activity, Connection, FeedEntry, Result, SortOrder, TypeFilter};

/// Something that can produce the activity list for a repository
///
/// Implementations never fail: a failed load resolves to an empty list.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    /// Load every activity for the connected repository
    async fn load(&self, connection: &Connection) -> Vec<Activity>;
}

/// The feed for one viewer
///
/// A load replaces the entries wholesale; `refresh` takes `&mut self`, so
/// overlapping loads on one session are serialized by the borrow checker.
#[derive(Debug, Clone, Default)]
pub struct FeedSession {
    entries: Vec<FeedEntry>,
    filter: TypeFilter,
    order: SortOrder,
}

impl FeedSession {
    /// Create an empty session with the given view settings
    pub fn new(filter: TypeFilter, order: SortOrder) -> Self {
        Self {
            entries: Vec::new(),
            filter,
            order,
        }
    }

    /// Load fresh activity and replace the current entries
    ///
    /// Missing connection parameters are rejected before the source is
    /// touched, leaving the previous entries in place. Returns the number
    /// of entries now held.
    pub async fn refresh(
        &mut self,
        source: &dyn ActivitySource,
        connection: &Connection,
    ) -> Result<usize> {
        if let Err(e) = connection.validate() {
            warn!(error = %e, "Refusing to load activity");
            return Err(e);
        }

        let activities = source.load(connection).await;
        self.entries = group_activities(activities);

        info!(
            repo = %connection.full_name(),
            entries = self.entries.len(),
            "Feed refreshed"
        );

        Ok(self.entries.len())
    }

    /// Entries to display under the current filter and order
    pub fn view(&self) -> Vec<&FeedEntry> {
        apply_view(&self.entries, self.filter, self.order)
    }

    /// All entries from the latest load, unfiltered
    pub fn entries(&self) -> &[FeedEntry] {
        &self.entries
    }

    pub fn filter(&self) -> TypeFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: TypeFilter) {
        self.filter = filter;
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn set_order(&mut self, order: SortOrder) {
        self.order = order;
    }
}
