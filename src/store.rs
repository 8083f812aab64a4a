// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Local mirror of remote state.
//!
//! The remote service owns every entity. The client keeps a read-through copy
//! in a [`Container`]: a single value with `get` (snapshot) and `replace`
//! (atomic whole-value swap). Writers never patch fields in place; they read a
//! snapshot, build the next value and replace.
//!
//! How much of the remote state is kept is decided by the injected
//! [`MirrorStrategy`].

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use crate::models::{
    Alert, EmailTarget, Filter, SmsTarget, Source, SourceGroup, TargetGroup, TelegramTarget,
};

/// Read/replace holder for one value.
#[derive(Debug, Default)]
pub struct Container<T> {
    value: RwLock<T>,
}

impl<T: Clone> Container<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Snapshot of the current value.
    pub fn get(&self) -> T {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap in a new value; visible to the next `get`.
    pub fn replace(&self, value: T) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = value;
    }
}

/// Named collections held by the mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Alerts,
    Filters,
    Sources,
    SourceGroups,
    TargetGroups,
    EmailTargets,
    SmsTargets,
    TelegramTargets,
}

/// Everything the client mirrors for the logged-in user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MirrorData {
    pub alerts: Vec<Alert>,
    pub filters: Vec<Filter>,
    pub sources: Vec<Source>,
    pub source_groups: Vec<SourceGroup>,
    pub target_groups: Vec<TargetGroup>,
    pub email_targets: Vec<EmailTarget>,
    pub sms_targets: Vec<SmsTarget>,
    pub telegram_targets: Vec<TelegramTarget>,
}

impl MirrorData {
    fn clear(&mut self, collection: Collection) {
        match collection {
            Collection::Alerts => self.alerts.clear(),
            Collection::Filters => self.filters.clear(),
            Collection::Sources => self.sources.clear(),
            Collection::SourceGroups => self.source_groups.clear(),
            Collection::TargetGroups => self.target_groups.clear(),
            Collection::EmailTargets => self.email_targets.clear(),
            Collection::SmsTargets => self.sms_targets.clear(),
            Collection::TelegramTargets => self.telegram_targets.clear(),
        }
    }
}

const ALL_COLLECTIONS: [Collection; 8] = [
    Collection::Alerts,
    Collection::Filters,
    Collection::Sources,
    Collection::SourceGroups,
    Collection::TargetGroups,
    Collection::EmailTargets,
    Collection::SmsTargets,
    Collection::TelegramTargets,
];

/// How much remote state the mirror retains.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MirrorStrategy {
    /// Keep nothing; every write is dropped.
    Disabled,
    /// Keep every collection.
    #[default]
    Full,
    /// Keep only the listed collections; the rest stay empty.
    Partial(HashSet<Collection>),
}

impl MirrorStrategy {
    pub fn partial(collections: impl IntoIterator<Item = Collection>) -> Self {
        MirrorStrategy::Partial(collections.into_iter().collect())
    }

    fn retains(&self, collection: Collection) -> bool {
        match self {
            MirrorStrategy::Disabled => false,
            MirrorStrategy::Full => true,
            MirrorStrategy::Partial(kept) => kept.contains(&collection),
        }
    }
}

/// The mirror: an optional [`MirrorData`] plus the strategy applied on write.
///
/// `None` means "absent": never refreshed, or discarded by logout. An absent
/// mirror is not valid until the next full refresh.
#[derive(Debug, Default)]
pub struct Mirror {
    strategy: MirrorStrategy,
    data: Container<Option<MirrorData>>,
}

impl Mirror {
    pub fn new(strategy: MirrorStrategy) -> Self {
        Self {
            strategy,
            data: Container::new(None),
        }
    }

    pub fn strategy(&self) -> &MirrorStrategy {
        &self.strategy
    }

    /// Current snapshot, `None` when absent.
    pub fn snapshot(&self) -> Option<MirrorData> {
        self.data.get()
    }

    /// Replace the whole mirror, dropping what the strategy does not retain.
    pub fn replace(&self, data: Option<MirrorData>) {
        let data = match (&self.strategy, data) {
            (MirrorStrategy::Disabled, _) | (_, None) => None,
            (MirrorStrategy::Full, Some(data)) => Some(data),
            (MirrorStrategy::Partial(_), Some(mut data)) => {
                for collection in ALL_COLLECTIONS {
                    if !self.strategy.retains(collection) {
                        data.clear(collection);
                    }
                }
                Some(data)
            }
        };
        self.data.replace(data);
    }

    /// Discard everything.
    pub fn clear(&self) {
        self.data.replace(None);
    }

    /// Read the current snapshot, let `update` rewrite collections, replace.
    ///
    /// Skipped when the mirror is absent.
    pub fn write_back(&self, update: impl FnOnce(&mut MirrorData)) {
        if let Some(mut data) = self.snapshot() {
            update(&mut data);
            self.replace(Some(data));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MirrorData {
        MirrorData {
            alerts: vec![Alert {
                id: Some("a-1".into()),
                name: Some("watch".into()),
                group_name: None,
                filter_options: None,
                filter: Filter::default(),
                source_group: SourceGroup::default(),
                target_group: TargetGroup::default(),
            }],
            email_targets: vec![EmailTarget {
                id: Some("e-1".into()),
                ..EmailTarget::default()
            }],
            ..MirrorData::default()
        }
    }

    #[test]
    fn container_replace_is_visible_to_next_get() {
        let container = Container::new(1);
        container.replace(2);
        assert_eq!(container.get(), 2);
    }

    #[test]
    fn full_mirror_keeps_everything() {
        let mirror = Mirror::new(MirrorStrategy::Full);
        mirror.replace(Some(sample()));
        assert_eq!(mirror.snapshot(), Some(sample()));
    }

    #[test]
    fn disabled_mirror_stays_absent() {
        let mirror = Mirror::new(MirrorStrategy::Disabled);
        mirror.replace(Some(sample()));
        assert_eq!(mirror.snapshot(), None);
    }

    #[test]
    fn partial_mirror_drops_unlisted_collections() {
        let mirror = Mirror::new(MirrorStrategy::partial([Collection::Alerts]));
        mirror.replace(Some(sample()));

        let data = mirror.snapshot().unwrap();
        assert_eq!(data.alerts.len(), 1);
        assert!(data.email_targets.is_empty());
    }

    #[test]
    fn write_back_skips_absent_mirror() {
        let mirror = Mirror::new(MirrorStrategy::Full);
        mirror.write_back(|data| data.alerts.clear());
        assert_eq!(mirror.snapshot(), None);
    }

    #[test]
    fn write_back_replaces_collections() {
        let mirror = Mirror::new(MirrorStrategy::Full);
        mirror.replace(Some(sample()));
        mirror.write_back(|data| data.alerts.clear());

        let data = mirror.snapshot().unwrap();
        assert!(data.alerts.is_empty());
        assert_eq!(data.email_targets.len(), 1);
    }

    #[test]
    fn clear_discards_mirror() {
        let mirror = Mirror::new(MirrorStrategy::Full);
        mirror.replace(Some(sample()));
        mirror.clear();
        assert!(mirror.snapshot().is_none());
    }
}
