// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::{LeadId, LeadRecord, Notice, OwnerId, PickOption};

/// Supplies the lead collection and the option lists. `fetch_leads` must be
/// safe to repeat.
pub trait RecordSource {
    fn fetch_leads(&mut self) -> Result<Vec<LeadRecord>>;
    fn fetch_status_options(&mut self) -> Result<Vec<PickOption>>;
    fn fetch_owner_options(&mut self) -> Result<Vec<PickOption>>;
}

/// Applies a batch update remotely. Each call succeeds or fails for the
/// whole batch.
pub trait BulkMutator {
    fn mutate_status(&mut self, ids: &[LeadId], status: &str) -> Result<()>;
    fn mutate_owner(&mut self, ids: &[LeadId], owner_id: &OwnerId) -> Result<()>;
}

pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

impl Notifier for Vec<Notice> {
    fn notify(&mut self, notice: Notice) {
        self.push(notice);
    }
}
