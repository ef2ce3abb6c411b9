//! In-memory gallery state: the ordered image collection, the focused record,
//! and the statistics derived from them.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use shared::domain::{ImageId, ImageRecord};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::{stats::GalleryStats, ImageService};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Membership and focus changes, published so a presentation layer can key
/// enter/exit transitions on collection membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryEvent {
    Hydrated { total: usize },
    RecordsAdded(Vec<ImageId>),
    RecordRemoved(ImageId),
    FocusChanged(Option<ImageId>),
}

pub struct GalleryController {
    service: Arc<dyn ImageService>,
    records: HashMap<ImageId, ImageRecord>,
    order: Vec<ImageId>,
    focused: Option<ImageId>,
    stats: GalleryStats,
    initialized: bool,
    events: broadcast::Sender<GalleryEvent>,
}

impl GalleryController {
    pub fn new(service: Arc<dyn ImageService>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            service,
            records: HashMap::new(),
            order: Vec::new(),
            focused: None,
            stats: GalleryStats::default(),
            initialized: false,
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<GalleryEvent> {
        self.events.subscribe()
    }

    /// Hydrates the collection from the list-all endpoint. Runs once per
    /// controller; failures are logged and leave the collection untouched.
    pub async fn initialize(&mut self) {
        if self.initialized {
            debug!("gallery: already initialized, skipping hydration");
            return;
        }
        self.initialized = true;

        match self.service.fetch_all_images().await {
            Ok(response) => self.apply_hydration(response.into_records()),
            Err(err) => error!(error = %err, "gallery: error fetching images"),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Merges a server listing into the collection. Entries already present
    /// keep their position and take the server's copy; new entries follow in
    /// server order.
    fn apply_hydration(&mut self, server_records: Vec<ImageRecord>) {
        let mut appended = 0usize;
        for record in server_records {
            if let Some(existing) = self.records.get_mut(&record.id) {
                *existing = record;
                continue;
            }
            self.order.push(record.id.clone());
            self.records.insert(record.id.clone(), record);
            appended += 1;
        }
        info!(appended, total = self.order.len(), "gallery: hydrated");
        self.refresh_stats();
        self.publish(GalleryEvent::Hydrated {
            total: self.order.len(),
        });
    }

    /// Prepends a freshly uploaded batch, keeping the batch's own order.
    pub fn upload_completed(&mut self, new_records: Vec<ImageRecord>) {
        let mut seen = HashSet::new();
        let mut batch = Vec::with_capacity(new_records.len());
        for record in new_records {
            if !seen.insert(record.id.clone()) {
                warn!(id = %record.id, "gallery: duplicate id inside upload batch, keeping first");
                continue;
            }
            if self.records.contains_key(&record.id) {
                warn!(id = %record.id, "gallery: uploaded id already present, replacing");
                self.order.retain(|id| id != &record.id);
            }
            batch.push(record);
        }

        if batch.is_empty() {
            return;
        }

        let added: Vec<ImageId> = batch.iter().map(|record| record.id.clone()).collect();
        let mut order = added.clone();
        order.append(&mut self.order);
        self.order = order;
        for record in batch {
            self.records.insert(record.id.clone(), record);
        }

        self.refresh_stats();
        self.publish(GalleryEvent::RecordsAdded(added));
    }

    /// Focuses a record that is currently in the collection. Returns `false`
    /// and leaves focus unchanged for unknown ids.
    pub fn select(&mut self, id: &ImageId) -> bool {
        if !self.records.contains_key(id) {
            debug!(id = %id, "gallery: ignoring selection of unknown record");
            return false;
        }
        if self.focused.as_ref() != Some(id) {
            self.focused = Some(id.clone());
            self.publish(GalleryEvent::FocusChanged(self.focused.clone()));
        }
        true
    }

    /// Removes a record from the local view. Deletion never reaches the
    /// service.
    pub fn delete(&mut self, id: &ImageId) -> Option<ImageRecord> {
        let removed = self.records.remove(id)?;
        if let Some(position) = self.order.iter().position(|entry| entry == id) {
            self.order.remove(position);
        }

        self.refresh_stats();
        self.publish(GalleryEvent::RecordRemoved(id.clone()));
        if self.focused.as_ref() == Some(id) {
            self.close_focus();
        }
        Some(removed)
    }

    pub fn close_focus(&mut self) {
        if self.focused.take().is_some() {
            self.publish(GalleryEvent::FocusChanged(None));
        }
    }

    pub fn focused(&self) -> Option<&ImageRecord> {
        self.focused.as_ref().and_then(|id| self.records.get(id))
    }

    pub fn get(&self, id: &ImageId) -> Option<&ImageRecord> {
        self.records.get(id)
    }

    pub fn records(&self) -> impl Iterator<Item = &ImageRecord> + '_ {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn stats(&self) -> GalleryStats {
        self.stats
    }

    fn refresh_stats(&mut self) {
        self.stats = GalleryStats::compute(self.records());
    }

    fn publish(&self, event: GalleryEvent) {
        // No subscribers is a normal state for headless use.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/gallery_tests.rs"]
mod tests;
