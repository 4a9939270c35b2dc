// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    BulkMutator, LeadId, LeadRecord, Notice, Notifier, OptionLists, OwnerId, RecordSource,
    ViewLead,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    Busy,
    NoSelection,
    NoStatusChosen,
    NoOwnerChosen,
}

impl ValidationReason {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Busy => "Update in progress",
            Self::NoSelection => "No leads selected",
            Self::NoStatusChosen => "No status chosen",
            Self::NoOwnerChosen => "No owner chosen",
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::Busy => "wait for the current update to finish",
            Self::NoSelection => "select at least one lead to update",
            Self::NoStatusChosen => "choose a status before updating",
            Self::NoOwnerChosen => "choose an owner before updating",
        }
    }
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("{reason}")]
    ValidationFailed { reason: ValidationReason },
    #[error("update failed: {message}")]
    RemoteFailure { message: String },
    #[error("load failed: {message}")]
    FetchFailure { message: String },
}

impl BoardError {
    fn fetch(error: &anyhow::Error) -> Self {
        Self::FetchFailure {
            message: format!("{error:#}"),
        }
    }

    fn remote(error: &anyhow::Error) -> Self {
        Self::RemoteFailure {
            message: format!("{error:#}"),
        }
    }

    /// The notification a host shows for this failure.
    pub fn notice(&self) -> Notice {
        match self {
            Self::ValidationFailed { reason } => Notice::warning(reason.title(), reason.message()),
            Self::RemoteFailure { message } => Notice::error("Error updating leads", message),
            Self::FetchFailure { message } => Notice::error("Error loading leads", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    LeadsChanged { total: usize, visible: usize },
    SelectionChanged { selected: usize },
    LoadingChanged(bool),
    OptionsChanged,
    Failed(BoardError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSummary {
    pub total: usize,
    pub visible: usize,
    pub selected: usize,
    pub filter: String,
    pub loading: bool,
}

#[derive(Debug, Clone, Copy)]
enum BulkChange<'a> {
    Status(&'a str),
    Owner(&'a OwnerId),
}

impl fmt::Display for BulkChange<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "status={status}"),
            Self::Owner(owner) => write!(f, "owner={owner}"),
        }
    }
}

/// View state for the lead table: the last fetched collection, the filtered
/// subsequence, and the rows picked for a bulk edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadBoard {
    all_leads: Vec<ViewLead>,
    visible_leads: Vec<ViewLead>,
    filter: String,
    selection: Vec<LeadId>,
    options: OptionLists,
    is_loading: bool,
    events: Vec<BoardEvent>,
}

impl LeadBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all_leads(&self) -> &[ViewLead] {
        &self.all_leads
    }

    pub fn visible_leads(&self) -> &[ViewLead] {
        &self.visible_leads
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn selection(&self) -> &[LeadId] {
        &self.selection
    }

    pub fn is_selected(&self, id: &LeadId) -> bool {
        self.selection.contains(id)
    }

    pub fn options(&self) -> &OptionLists {
        &self.options
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn can_bulk_update(&self) -> bool {
        !self.selection.is_empty() && !self.is_loading
    }

    pub fn summary(&self) -> BoardSummary {
        BoardSummary {
            total: self.all_leads.len(),
            visible: self.visible_leads.len(),
            selected: self.selection.len(),
            filter: self.filter.clone(),
            loading: self.is_loading,
        }
    }

    pub fn take_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    /// Replaces the collection wholesale and re-applies the current filter.
    pub fn ingest(&mut self, raw: &[LeadRecord]) -> &[ViewLead] {
        self.all_leads = raw.iter().map(ViewLead::from_record).collect();
        debug!(count = self.all_leads.len(), "ingested leads");
        self.reapply_filter();
        &self.visible_leads
    }

    pub fn apply_filter(&mut self, term: &str) {
        self.filter = term.to_lowercase();
        self.reapply_filter();
    }

    /// No membership check: the host only offers rows it currently shows.
    pub fn select<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = LeadId>,
    {
        let mut seen = HashSet::new();
        self.selection = ids
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();
        self.events.push(BoardEvent::SelectionChanged {
            selected: self.selection.len(),
        });
    }

    /// Initial fetch of leads and both option lists. Only failures notify.
    pub fn load<S, N>(&mut self, source: &mut S, notifier: &mut N) -> Result<(), BoardError>
    where
        S: RecordSource + ?Sized,
        N: Notifier + ?Sized,
    {
        self.set_loading(true);
        let leads = self.fetch_leads(source);
        let options = self.fetch_options(source);
        self.set_loading(false);

        let mut outcome = Ok(());
        for result in [leads, options] {
            if let Err(error) = result {
                let error = self.report(notifier, error);
                if outcome.is_ok() {
                    outcome = Err(error);
                }
            }
        }
        outcome
    }

    /// On failure the previous lists stay in place.
    pub fn load_options<S, N>(&mut self, source: &mut S, notifier: &mut N) -> Result<(), BoardError>
    where
        S: RecordSource + ?Sized,
        N: Notifier + ?Sized,
    {
        self.set_loading(true);
        let outcome = self.fetch_options(source);
        self.set_loading(false);
        outcome.map_err(|error| self.report(notifier, error))
    }

    pub fn refresh<S, N>(&mut self, source: &mut S, notifier: &mut N) -> Result<(), BoardError>
    where
        S: RecordSource + ?Sized,
        N: Notifier + ?Sized,
    {
        self.clear_selection();
        self.set_loading(true);
        let outcome = self.fetch_leads(source);
        self.set_loading(false);

        match outcome {
            Ok(()) => {
                info!(total = self.all_leads.len(), "leads refreshed");
                notifier.notify(Notice::success("Success", "leads refreshed"));
                Ok(())
            }
            Err(error) => Err(self.report(notifier, error)),
        }
    }

    /// Returns how many leads the backend updated.
    pub fn bulk_update_status<B, N>(
        &mut self,
        backend: &mut B,
        notifier: &mut N,
        new_status: &str,
    ) -> Result<usize, BoardError>
    where
        B: RecordSource + BulkMutator + ?Sized,
        N: Notifier + ?Sized,
    {
        self.run_bulk(backend, notifier, BulkChange::Status(new_status))
    }

    pub fn bulk_update_owner<B, N>(
        &mut self,
        backend: &mut B,
        notifier: &mut N,
        new_owner: &OwnerId,
    ) -> Result<usize, BoardError>
    where
        B: RecordSource + BulkMutator + ?Sized,
        N: Notifier + ?Sized,
    {
        self.run_bulk(backend, notifier, BulkChange::Owner(new_owner))
    }

    fn run_bulk<B, N>(
        &mut self,
        backend: &mut B,
        notifier: &mut N,
        change: BulkChange<'_>,
    ) -> Result<usize, BoardError>
    where
        B: RecordSource + BulkMutator + ?Sized,
        N: Notifier + ?Sized,
    {
        if let Err(error) = self.validate(change) {
            return Err(self.report(notifier, error));
        }

        let ids = self.selection.clone();
        let count = ids.len();
        info!(count, %change, "applying bulk update");
        self.set_loading(true);

        let mutated = match change {
            BulkChange::Status(status) => backend.mutate_status(&ids, status),
            BulkChange::Owner(owner) => backend.mutate_owner(&ids, owner),
        };

        // The follow-up fetch lands before loading is cleared.
        let outcome = match mutated {
            Ok(()) => {
                notifier.notify(self.success_notice(change, count));
                let fetched = self.fetch_leads(backend);
                self.clear_selection();
                fetched.map(|()| count)
            }
            Err(error) => {
                self.clear_selection();
                Err(BoardError::remote(&error))
            }
        };
        self.set_loading(false);
        outcome.map_err(|error| self.report(notifier, error))
    }

    fn validate(&self, change: BulkChange<'_>) -> Result<(), BoardError> {
        let reason = if self.is_loading {
            Some(ValidationReason::Busy)
        } else if self.selection.is_empty() {
            Some(ValidationReason::NoSelection)
        } else {
            match change {
                BulkChange::Status(status) if status.is_empty() => {
                    Some(ValidationReason::NoStatusChosen)
                }
                BulkChange::Owner(owner) if owner.is_empty() => {
                    Some(ValidationReason::NoOwnerChosen)
                }
                _ => None,
            }
        };

        match reason {
            Some(reason) => Err(BoardError::ValidationFailed { reason }),
            None => Ok(()),
        }
    }

    fn success_notice(&self, change: BulkChange<'_>, count: usize) -> Notice {
        let leads = leads_label(count);
        match change {
            BulkChange::Status(status) => {
                Notice::success("Success", format!("{leads} set to {status}"))
            }
            BulkChange::Owner(owner) => {
                let label = self
                    .options
                    .owners
                    .iter()
                    .find(|option| option.value == owner.as_str())
                    .map_or(owner.as_str(), |option| option.label.as_str());
                Notice::success("Success", format!("{leads} assigned to {label}"))
            }
        }
    }

    fn fetch_leads<S>(&mut self, source: &mut S) -> Result<(), BoardError>
    where
        S: RecordSource + ?Sized,
    {
        match source.fetch_leads() {
            Ok(records) => {
                self.ingest(&records);
                Ok(())
            }
            Err(error) => {
                let error = BoardError::fetch(&error);
                warn!(%error, "lead fetch failed");
                self.all_leads.clear();
                self.visible_leads.clear();
                self.clear_selection();
                self.events.push(BoardEvent::LeadsChanged {
                    total: 0,
                    visible: 0,
                });
                Err(error)
            }
        }
    }

    fn fetch_options<S>(&mut self, source: &mut S) -> Result<(), BoardError>
    where
        S: RecordSource + ?Sized,
    {
        let statuses = source
            .fetch_status_options()
            .map_err(|error| BoardError::fetch(&error))?;
        let owners = source
            .fetch_owner_options()
            .map_err(|error| BoardError::fetch(&error))?;
        debug!(
            statuses = statuses.len(),
            owners = owners.len(),
            "loaded option lists"
        );
        self.options = OptionLists { statuses, owners };
        self.events.push(BoardEvent::OptionsChanged);
        Ok(())
    }

    fn reapply_filter(&mut self) {
        self.visible_leads = if self.filter.is_empty() {
            self.all_leads.clone()
        } else {
            self.all_leads
                .iter()
                .filter(|lead| lead.matches(&self.filter))
                .cloned()
                .collect()
        };
        debug!(
            filter = %self.filter,
            visible = self.visible_leads.len(),
            "applied filter"
        );
        self.prune_selection();
        self.events.push(BoardEvent::LeadsChanged {
            total: self.all_leads.len(),
            visible: self.visible_leads.len(),
        });
    }

    fn prune_selection(&mut self) {
        let before = self.selection.len();
        let visible: HashSet<&LeadId> = self.visible_leads.iter().map(|lead| &lead.id).collect();
        self.selection.retain(|id| visible.contains(id));
        if self.selection.len() != before {
            self.events.push(BoardEvent::SelectionChanged {
                selected: self.selection.len(),
            });
        }
    }

    fn clear_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.selection.clear();
        self.events
            .push(BoardEvent::SelectionChanged { selected: 0 });
    }

    fn set_loading(&mut self, loading: bool) {
        if self.is_loading == loading {
            return;
        }
        self.is_loading = loading;
        self.events.push(BoardEvent::LoadingChanged(loading));
    }

    fn report<N>(&mut self, notifier: &mut N, error: BoardError) -> BoardError
    where
        N: Notifier + ?Sized,
    {
        notifier.notify(error.notice());
        self.events.push(BoardEvent::Failed(error.clone()));
        error
    }
}

fn leads_label(count: usize) -> String {
    if count == 1 {
        "1 lead".to_owned()
    } else {
        format!("{count} leads")
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardError, BoardEvent, LeadBoard, ValidationReason, leads_label};
    use crate::{
        BulkMutator, LeadId, LeadRecord, Notice, OwnerId, OwnerRef, PickOption, RecordSource,
        Severity, StatusClass,
    };
    use anyhow::{Result, anyhow};

    #[derive(Debug, Default)]
    struct StubBackend {
        leads: Vec<LeadRecord>,
        fail_fetch: bool,
        fetch_calls: usize,
        mutate_calls: usize,
    }

    impl RecordSource for StubBackend {
        fn fetch_leads(&mut self) -> Result<Vec<LeadRecord>> {
            self.fetch_calls += 1;
            if self.fail_fetch {
                return Err(anyhow!("session expired"));
            }
            Ok(self.leads.clone())
        }

        fn fetch_status_options(&mut self) -> Result<Vec<PickOption>> {
            Ok(vec![PickOption::new("Open - Not Contacted", "Open")])
        }

        fn fetch_owner_options(&mut self) -> Result<Vec<PickOption>> {
            Ok(vec![PickOption::new("005A", "Sam Ortiz")])
        }
    }

    impl BulkMutator for StubBackend {
        fn mutate_status(&mut self, _ids: &[LeadId], _status: &str) -> Result<()> {
            self.mutate_calls += 1;
            Ok(())
        }

        fn mutate_owner(&mut self, _ids: &[LeadId], _owner_id: &OwnerId) -> Result<()> {
            self.mutate_calls += 1;
            Ok(())
        }
    }

    fn lead(id: &str, name: &str, company: &str, status: &str, owner: Option<&str>) -> LeadRecord {
        LeadRecord {
            id: LeadId::from(id),
            name: Some(name.to_owned()),
            company: Some(company.to_owned()),
            status: Some(status.to_owned()),
            owner: owner.map(|name| OwnerRef {
                id: Some(OwnerId::from("005A")),
                name: Some(name.to_owned()),
            }),
            lead_source: Some("Web".to_owned()),
        }
    }

    fn sample() -> Vec<LeadRecord> {
        vec![
            lead("1", "Ada Byron", "Acme", "Working - Contacted", Some("Sam Ortiz")),
            lead("2", "Bob Stone", "Globex", "Closed - Not Converted", None),
            lead("3", "Cy Young", "Initech", "Open - Not Contacted", Some("Ana Ruiz")),
        ]
    }

    fn visible_ids(board: &LeadBoard) -> Vec<&str> {
        board
            .visible_leads()
            .iter()
            .map(|lead| lead.id.as_str())
            .collect()
    }

    #[test]
    fn ingest_derives_view_fields() {
        let mut board = LeadBoard::new();
        let visible = board.ingest(&sample());
        assert_eq!(visible.len(), 3);
        assert_eq!(visible[0].owner_name, "Sam Ortiz");
        assert_eq!(visible[0].status_class, StatusClass::Success);
        assert_eq!(visible[1].owner_name, "");
        assert_eq!(visible[1].status_class, StatusClass::Error);
        assert_eq!(visible[2].status_class, StatusClass::Weak);
    }

    #[test]
    fn filter_matches_any_field_case_insensitively() {
        let mut board = LeadBoard::new();
        board.ingest(&sample());

        board.apply_filter("GLOBEX");
        assert_eq!(board.filter(), "globex");
        assert_eq!(visible_ids(&board), vec!["2"]);

        board.apply_filter("ruiz");
        assert_eq!(visible_ids(&board), vec!["3"]);

        board.apply_filter("contacted");
        assert_eq!(visible_ids(&board), vec!["1", "3"]);

        board.apply_filter("web");
        assert_eq!(visible_ids(&board), vec!["1", "2", "3"]);

        board.apply_filter("");
        assert_eq!(visible_ids(&board), vec!["1", "2", "3"]);
    }

    #[test]
    fn ingest_reapplies_stored_filter() {
        let mut board = LeadBoard::new();
        board.apply_filter("acme");
        board.ingest(&sample());
        assert_eq!(visible_ids(&board), vec!["1"]);
    }

    #[test]
    fn select_collapses_duplicates_in_order() {
        let mut board = LeadBoard::new();
        board.ingest(&sample());
        board.select(["3", "1", "3"].map(LeadId::from));
        assert_eq!(board.selection(), &[LeadId::from("3"), LeadId::from("1")]);
        assert!(board.can_bulk_update());
    }

    #[test]
    fn narrowing_filter_drops_hidden_rows_from_selection() {
        let mut board = LeadBoard::new();
        board.ingest(&sample());
        board.select(["1", "2"].map(LeadId::from));
        board.take_events();

        board.apply_filter("acme");
        assert_eq!(board.selection(), &[LeadId::from("1")]);
        assert!(
            board
                .take_events()
                .contains(&BoardEvent::SelectionChanged { selected: 1 })
        );
    }

    #[test]
    fn owner_validation_and_busy_guard() {
        let mut board = LeadBoard::new();
        let mut backend = StubBackend {
            leads: sample(),
            ..StubBackend::default()
        };
        let mut notices: Vec<Notice> = Vec::new();
        board.ingest(&sample());
        board.select([LeadId::from("1")]);

        let error = board
            .bulk_update_owner(&mut backend, &mut notices, &OwnerId::default())
            .expect_err("empty owner should fail");
        assert_eq!(
            error,
            BoardError::ValidationFailed {
                reason: ValidationReason::NoOwnerChosen
            }
        );

        board.is_loading = true;
        let error = board
            .bulk_update_status(&mut backend, &mut notices, "Working - Contacted")
            .expect_err("busy board should refuse");
        assert_eq!(
            error,
            BoardError::ValidationFailed {
                reason: ValidationReason::Busy
            }
        );
        assert_eq!(backend.mutate_calls, 0);
        assert!(
            notices
                .iter()
                .all(|notice| notice.severity == Severity::Warning)
        );
    }

    #[test]
    fn owner_success_notice_uses_option_label() -> Result<()> {
        let mut board = LeadBoard::new();
        let mut backend = StubBackend {
            leads: sample(),
            ..StubBackend::default()
        };
        let mut notices: Vec<Notice> = Vec::new();
        board.load(&mut backend, &mut notices)?;
        board.select([LeadId::from("2")]);

        let updated = board.bulk_update_owner(&mut backend, &mut notices, &OwnerId::from("005A"))?;
        assert_eq!(updated, 1);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "1 lead assigned to Sam Ortiz");
        Ok(())
    }

    #[test]
    fn refresh_failure_notifies_and_empties_view() {
        let mut board = LeadBoard::new();
        board.ingest(&sample());
        let mut backend = StubBackend {
            fail_fetch: true,
            ..StubBackend::default()
        };
        let mut notices: Vec<Notice> = Vec::new();

        let error = board
            .refresh(&mut backend, &mut notices)
            .expect_err("fetch should fail");
        assert_eq!(
            error,
            BoardError::FetchFailure {
                message: "session expired".to_owned()
            }
        );
        assert!(board.all_leads().is_empty());
        assert!(board.visible_leads().is_empty());
        assert!(!board.is_loading());
        assert_eq!(notices, vec![error.notice()]);
        assert_eq!(notices[0].title, "Error loading leads");
    }

    #[test]
    fn loading_events_bracket_refresh() -> Result<()> {
        let mut board = LeadBoard::new();
        let mut backend = StubBackend {
            leads: sample(),
            ..StubBackend::default()
        };
        let mut notices: Vec<Notice> = Vec::new();
        board.refresh(&mut backend, &mut notices)?;

        let events = board.take_events();
        assert_eq!(events.first(), Some(&BoardEvent::LoadingChanged(true)));
        assert_eq!(events.last(), Some(&BoardEvent::LoadingChanged(false)));
        assert!(events.contains(&BoardEvent::LeadsChanged {
            total: 3,
            visible: 3
        }));
        assert!(board.take_events().is_empty());
        Ok(())
    }

    #[test]
    fn summary_reports_counts() {
        let mut board = LeadBoard::new();
        board.ingest(&sample());
        board.apply_filter("o");
        board.select([LeadId::from("1")]);
        let summary = board.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.visible, 3);
        assert_eq!(summary.selected, 1);
        assert_eq!(summary.filter, "o");
        assert!(!summary.loading);
    }

    #[test]
    fn leads_label_pluralizes() {
        assert_eq!(leads_label(1), "1 lead");
        assert_eq!(leads_label(0), "0 leads");
        assert_eq!(leads_label(4), "4 leads");
    }
}
