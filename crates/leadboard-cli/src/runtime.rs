// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use leadboard_app::{BulkMutator, LeadId, LeadRecord, OwnerId, PickOption, RecordSource};
use leadboard_remote::Client;
use leadboard_testkit::MemoryBackend;

const DEMO_SEED: u64 = 2026;
const DEMO_LEADS: usize = 60;

/// Where the board gets its records: the managed backend or seeded demo data.
pub enum BoardRuntime {
    Remote(Client),
    Demo(MemoryBackend),
}

impl BoardRuntime {
    pub fn demo() -> Self {
        Self::Demo(MemoryBackend::seeded(DEMO_SEED, DEMO_LEADS))
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Remote(client) => format!("remote {}", client.base_url()),
            Self::Demo(_) => format!("demo ({DEMO_LEADS} seeded leads)"),
        }
    }
}

impl RecordSource for BoardRuntime {
    fn fetch_leads(&mut self) -> Result<Vec<LeadRecord>> {
        match self {
            Self::Remote(client) => client.fetch_leads(),
            Self::Demo(backend) => backend.fetch_leads(),
        }
    }

    fn fetch_status_options(&mut self) -> Result<Vec<PickOption>> {
        match self {
            Self::Remote(client) => client.fetch_status_options(),
            Self::Demo(backend) => backend.fetch_status_options(),
        }
    }

    fn fetch_owner_options(&mut self) -> Result<Vec<PickOption>> {
        match self {
            Self::Remote(client) => client.fetch_owner_options(),
            Self::Demo(backend) => backend.fetch_owner_options(),
        }
    }
}

impl BulkMutator for BoardRuntime {
    fn mutate_status(&mut self, ids: &[LeadId], status: &str) -> Result<()> {
        match self {
            Self::Remote(client) => client.mutate_status(ids, status),
            Self::Demo(backend) => backend.mutate_status(ids, status),
        }
    }

    fn mutate_owner(&mut self, ids: &[LeadId], owner_id: &OwnerId) -> Result<()> {
        match self {
            Self::Remote(client) => client.mutate_owner(ids, owner_id),
            Self::Demo(backend) => backend.mutate_owner(ids, owner_id),
        }
    }
}
