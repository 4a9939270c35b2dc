// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow, bail};
use leadboard_app::{
    BulkMutator, LeadId, LeadRecord, Notice, Notifier, OwnerId, OwnerRef, PickOption,
    RecordSource, STATUS_CLOSED_NOT_CONVERTED, STATUS_OPEN_NOT_CONTACTED,
    STATUS_WORKING_CONTACTED, Severity,
};

pub const STATUS_CLOSED_CONVERTED: &str = "Closed - Converted";

const LEAD_STATUSES: [&str; 4] = [
    STATUS_OPEN_NOT_CONTACTED,
    STATUS_WORKING_CONTACTED,
    STATUS_CLOSED_CONVERTED,
    STATUS_CLOSED_NOT_CONVERTED,
];

const LEAD_SOURCES: [&str; 6] = [
    "Web",
    "Phone Inquiry",
    "Partner Referral",
    "Purchased List",
    "Trade Show",
    "Other",
];

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];

const COMPANY_ROOTS: [&str; 14] = [
    "Summit", "Harbor", "Granite", "Northwind", "Bluebird", "Ironwood", "Keystone", "Lakeside",
    "Pioneer", "Redline", "Silverleaf", "Trailhead", "Vantage", "Westbrook",
];
const COMPANY_SUFFIXES: [&str; 7] = [
    "Logistics",
    "Analytics",
    "Foods",
    "Health",
    "Systems",
    "Manufacturing",
    "Partners",
];

const OWNER_NAMES: [&str; 5] = [
    "Sam Ortiz",
    "Priya Natarajan",
    "Lena Fischer",
    "Marcus Bell",
    "Noor Haddad",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator for realistic-looking leads. The same seed always
/// produces the same records.
#[derive(Debug, Clone)]
pub struct LeadFaker {
    rng: DeterministicRng,
    next_serial: u32,
}

impl LeadFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_serial: 1,
        }
    }

    pub fn owner_options(&self) -> Vec<PickOption> {
        OWNER_NAMES
            .iter()
            .enumerate()
            .map(|(index, name)| PickOption::new(owner_id(index).as_str(), *name))
            .collect()
    }

    pub fn lead(&mut self) -> LeadRecord {
        let serial = self.next_serial;
        self.next_serial += 1;

        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        let company = format!(
            "{} {}",
            self.pick(&COMPANY_ROOTS),
            self.pick(&COMPANY_SUFFIXES)
        );

        // Roughly one lead in eight sits in a queue with no owner.
        let owner = if self.rng.int_n(8) == 0 {
            None
        } else {
            let index = self.rng.int_n(OWNER_NAMES.len());
            Some(OwnerRef {
                id: Some(owner_id(index)),
                name: Some(OWNER_NAMES[index].to_owned()),
            })
        };

        LeadRecord {
            id: LeadId::new(format!("00Q5g00000{serial:05}")),
            name: Some(format!("{first} {last}")),
            company: Some(company),
            status: Some(self.pick(&LEAD_STATUSES).to_owned()),
            owner,
            lead_source: Some(self.pick(&LEAD_SOURCES).to_owned()),
        }
    }

    pub fn leads(&mut self, count: usize) -> Vec<LeadRecord> {
        (0..count).map(|_| self.lead()).collect()
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}

pub fn status_options() -> Vec<PickOption> {
    LEAD_STATUSES
        .iter()
        .map(|status| PickOption::new(*status, *status))
        .collect()
}

fn owner_id(index: usize) -> OwnerId {
    OwnerId::new(format!("0055g00000{:05}", index + 1))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub fetch_leads: usize,
    pub fetch_status_options: usize,
    pub fetch_owner_options: usize,
    pub mutate_status: usize,
    pub mutate_owner: usize,
}

impl CallCounts {
    pub fn mutations(&self) -> usize {
        self.mutate_status + self.mutate_owner
    }
}

/// In-memory stand-in for the managed backend. Batches are applied
/// all-or-nothing, and single failures can be queued for the next call.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    leads: Vec<LeadRecord>,
    statuses: Vec<PickOption>,
    owners: Vec<PickOption>,
    fetch_failure: Option<String>,
    options_failure: Option<String>,
    mutation_failure: Option<String>,
    calls: CallCounts,
    last_batch: Vec<LeadId>,
}

impl MemoryBackend {
    pub fn new(leads: Vec<LeadRecord>, statuses: Vec<PickOption>, owners: Vec<PickOption>) -> Self {
        Self {
            leads,
            statuses,
            owners,
            ..Self::default()
        }
    }

    pub fn seeded(seed: u64, count: usize) -> Self {
        let mut faker = LeadFaker::new(seed);
        let leads = faker.leads(count);
        Self::new(leads, status_options(), faker.owner_options())
    }

    pub fn leads(&self) -> &[LeadRecord] {
        &self.leads
    }

    pub fn lead(&self, id: &LeadId) -> Option<&LeadRecord> {
        self.leads.iter().find(|lead| &lead.id == id)
    }

    pub fn calls(&self) -> CallCounts {
        self.calls
    }

    pub fn last_batch(&self) -> &[LeadId] {
        &self.last_batch
    }

    pub fn fail_next_fetch(&mut self, message: impl Into<String>) {
        self.fetch_failure = Some(message.into());
    }

    pub fn fail_next_options(&mut self, message: impl Into<String>) {
        self.options_failure = Some(message.into());
    }

    pub fn fail_next_mutation(&mut self, message: impl Into<String>) {
        self.mutation_failure = Some(message.into());
    }

    fn check_batch(&mut self, ids: &[LeadId]) -> Result<()> {
        self.last_batch = ids.to_vec();
        if let Some(message) = self.mutation_failure.take() {
            bail!(message);
        }
        if ids.is_empty() {
            bail!("no records in batch");
        }
        if let Some(missing) = ids.iter().find(|id| self.lead(id).is_none()) {
            bail!("record not found: {missing}");
        }
        Ok(())
    }

    fn update_each(&mut self, ids: &[LeadId], mut apply: impl FnMut(&mut LeadRecord)) {
        for lead in self.leads.iter_mut().filter(|lead| ids.contains(&lead.id)) {
            apply(lead);
        }
    }
}

impl RecordSource for MemoryBackend {
    fn fetch_leads(&mut self) -> Result<Vec<LeadRecord>> {
        self.calls.fetch_leads += 1;
        if let Some(message) = self.fetch_failure.take() {
            bail!(message);
        }
        Ok(self.leads.clone())
    }

    fn fetch_status_options(&mut self) -> Result<Vec<PickOption>> {
        self.calls.fetch_status_options += 1;
        if let Some(message) = self.options_failure.take() {
            bail!(message);
        }
        Ok(self.statuses.clone())
    }

    fn fetch_owner_options(&mut self) -> Result<Vec<PickOption>> {
        self.calls.fetch_owner_options += 1;
        Ok(self.owners.clone())
    }
}

impl BulkMutator for MemoryBackend {
    fn mutate_status(&mut self, ids: &[LeadId], status: &str) -> Result<()> {
        self.calls.mutate_status += 1;
        self.check_batch(ids)?;
        if !self.statuses.is_empty() && !self.statuses.iter().any(|option| option.value == status)
        {
            bail!("bad value for restricted picklist field: {status}");
        }
        self.update_each(ids, |lead| lead.status = Some(status.to_owned()));
        Ok(())
    }

    fn mutate_owner(&mut self, ids: &[LeadId], owner_id: &OwnerId) -> Result<()> {
        self.calls.mutate_owner += 1;
        self.check_batch(ids)?;
        let owner = self
            .owners
            .iter()
            .find(|option| option.value == owner_id.as_str())
            .map(|option| OwnerRef {
                id: Some(owner_id.clone()),
                name: Some(option.label.clone()),
            })
            .ok_or_else(|| anyhow!("owner not found: {owner_id}"))?;
        self.update_each(ids, |lead| lead.owner = Some(owner.clone()));
        Ok(())
    }
}

/// Notifier that keeps everything it was handed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingNotifier {
    pub notices: Vec<Notice>,
}

impl RecordingNotifier {
    pub fn last(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.notices
            .iter()
            .filter(|notice| notice.severity == severity)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}
