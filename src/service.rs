use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::balance::{self, BalanceSnapshot};
use crate::calendar::{self, CalendarEvent};
use crate::dashboard::{self, HistoryFilter, ManagerDashboard, RequestHistory, StatusCounts, TeamRequest};
use crate::error::LeaveError;
use crate::model::leave_request::{DecisionAction, LeaveDraft, LeaveRequest};
use crate::model::role::Role;
use crate::model::user::{Actor, User};
use crate::policy::{self, Action, PermissionSet, Resource};
use crate::store::{LeaveStore, RequestScope, WriterKey};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// The calendar date requests are checked against.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock. "Today" follows the host's local calendar.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Entry point used by the HTTP layer: gates every call through the access
/// policy, loads fresh data from the store and hands it to the pure core.
#[derive(Clone)]
pub struct LeaveService {
    store: Arc<dyn LeaveStore>,
    clock: Arc<dyn Clock>,
}

impl LeaveService {
    pub fn new(store: Arc<dyn LeaveStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn with_system_clock(store: Arc<dyn LeaveStore>) -> Self {
        Self::new(store, Arc::new(SystemClock))
    }

    #[instrument(skip(self, draft), fields(actor_id = actor.id))]
    pub fn submit(&self, actor: &Actor, draft: LeaveDraft) -> Result<LeaveRequest, LeaveError> {
        policy::authorize(actor, Action::CreateRequest, Resource::Employee(actor.id))?;

        let candidate = LeaveRequest::create(actor.id, draft, self.clock.today(), self.clock.now())?;

        let stored = self.store.serialize_writer(WriterKey::of(&candidate), &mut || {
            let entitlements = self.store.load_entitlements(actor.id)?;
            let existing = self.store.load_requests(RequestScope::Employee(actor.id))?;
            balance::ensure_can_request(&entitlements, &existing, &candidate)?;
            self.store.save_request(&candidate)?;
            Ok(candidate.clone())
        })?;

        info!(
            request_id = %stored.id,
            leave_type = %stored.leave_type,
            days = stored.duration_days(),
            "leave request submitted"
        );
        Ok(stored)
    }

    #[instrument(skip(self, comment), fields(actor_id = actor.id))]
    pub fn decide(
        &self,
        actor: &Actor,
        request_id: Uuid,
        action: DecisionAction,
        comment: &str,
    ) -> Result<LeaveRequest, LeaveError> {
        // Non-approvers learn nothing about which ids exist.
        policy::authorize(actor, Action::DecideRequest, Resource::Team)?;

        let current = self
            .store
            .load_request(request_id)?
            .ok_or(LeaveError::NotFound { request_id })?;

        let decided = self.store.serialize_writer(WriterKey::of(&current), &mut || {
            // Re-read under the writer slot: another approver may have got here first.
            let fresh = self
                .store
                .load_request(request_id)?
                .ok_or(LeaveError::NotFound { request_id })?;
            let decided = fresh.decide(action, comment, actor, self.clock.now())?;
            self.store.save_request(&decided)?;
            Ok(decided)
        })?;

        info!(request_id = %decided.id, status = %decided.status, "leave request decided");
        Ok(decided)
    }

    pub fn history(&self, actor: &Actor, filter: &HistoryFilter) -> Result<RequestHistory, LeaveError> {
        policy::authorize(actor, Action::ReadRequests, Resource::Employee(actor.id))?;
        let requests = self.store.load_requests(RequestScope::Employee(actor.id))?;
        Ok(RequestHistory {
            counts: StatusCounts::tally(&requests),
            requests: filter.apply(&requests),
        })
    }

    pub fn balance(&self, actor: &Actor) -> Result<BalanceSnapshot, LeaveError> {
        policy::authorize(actor, Action::ReadBalance, Resource::Employee(actor.id))?;
        let entitlements = self.store.load_entitlements(actor.id)?;
        let requests = self.store.load_requests(RequestScope::Employee(actor.id))?;

        let snapshot = BalanceSnapshot::compute(&entitlements, &requests);
        for leave_type in snapshot.inconsistencies() {
            warn!(
                employee_id = actor.id,
                %leave_type,
                balance = ?snapshot.per_type.get(&leave_type),
                "leave balance inconsistent with entitlement"
            );
        }
        Ok(snapshot)
    }

    pub fn personal_calendar(&self, actor: &Actor) -> Result<Vec<CalendarEvent>, LeaveError> {
        policy::authorize(actor, Action::ReadCalendar, Resource::Employee(actor.id))?;
        let requests = self.store.load_requests(RequestScope::Employee(actor.id))?;
        Ok(calendar::project_personal(&requests))
    }

    pub fn team_requests(&self, actor: &Actor) -> Result<Vec<TeamRequest>, LeaveError> {
        policy::authorize(actor, Action::ReadAllRequests, Resource::Team)?;
        let requests = self.store.load_requests(RequestScope::All)?;
        let users = self.store.load_users()?;
        Ok(dashboard::with_employees(&requests, &users))
    }

    pub fn team_calendar(&self, actor: &Actor) -> Result<Vec<CalendarEvent>, LeaveError> {
        policy::authorize(actor, Action::ReadTeamCalendar, Resource::Team)?;
        let requests = self.store.load_requests(RequestScope::All)?;
        let users = self.store.load_users()?;
        Ok(calendar::project_team(&requests, &users))
    }

    pub fn employees(&self, actor: &Actor) -> Result<Vec<User>, LeaveError> {
        policy::authorize(actor, Action::ReadEmployees, Resource::Team)?;
        Ok(self
            .store
            .load_users()?
            .into_iter()
            .filter(|user| user.role == Role::Employee)
            .collect())
    }

    /// Badge number for the approvals link, recomputed on every call.
    pub fn pending_count(&self, actor: &Actor) -> Result<usize, LeaveError> {
        policy::authorize(actor, Action::ReadAllRequests, Resource::Team)?;
        let requests = self.store.load_requests(RequestScope::All)?;
        Ok(dashboard::pending_count(&requests))
    }

    pub fn manager_dashboard(&self, actor: &Actor) -> Result<ManagerDashboard, LeaveError> {
        policy::authorize(actor, Action::ReadAllRequests, Resource::Team)?;
        let requests = self.store.load_requests(RequestScope::All)?;
        let users = self.store.load_users()?;
        Ok(ManagerDashboard::build(&requests, &users))
    }

    pub fn permissions(&self, actor: &Actor) -> PermissionSet {
        PermissionSet::for_role(actor.role)
    }
}
