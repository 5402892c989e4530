use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{predict_headcount, EventTag, WeatherTag};
use crate::scoring::{ActionProposal, Money};

/// Staff roster entry supplied by the directory collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    pub staff_id: String,
    pub name: String,
    pub role: String,
    pub hourly_rate: Money,
}

/// Parameters of a permitted shift assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftAssignment {
    pub shortfall: u32,
    pub staff: Vec<StaffMember>,
}

/// Chooses which staff cover a shortfall. The engine ships first-N-available
/// but callers can plug in seniority or cost-aware strategies.
pub trait SelectionStrategy: Send + Sync {
    fn select(&self, pool: &[StaffMember], needed: usize) -> Vec<StaffMember>;
}

/// Default strategy: take the first N staff in directory order.
pub struct FirstAvailable;

impl SelectionStrategy for FirstAvailable {
    fn select(&self, pool: &[StaffMember], needed: usize) -> Vec<StaffMember> {
        pool.iter().take(needed).cloned().collect()
    }
}

/// Assignment policy: cover the gap between predicted and assigned headcount.
pub fn propose_assignment(
    predicted: u32,
    assigned: u32,
    pool: &[StaffMember],
    strategy: &dyn SelectionStrategy,
) -> ActionProposal<ShiftAssignment> {
    let shortfall = predicted.saturating_sub(assigned);
    if shortfall == 0 {
        return ActionProposal::declined("roster already covered");
    }

    let staff = strategy.select(pool, shortfall as usize);
    if staff.len() < shortfall as usize {
        return ActionProposal::declined("insufficient staff");
    }

    ActionProposal::Permitted {
        parameters: ShiftAssignment { shortfall, staff },
    }
}

/// Record source for the available staff pool.
pub trait StaffDirectory: Send + Sync {
    fn available_staff(&self) -> Result<Vec<StaffMember>, StaffDirectoryError>;
}

/// Mutation sink creating the actual shifts after operator confirmation.
pub trait ShiftScheduler: Send + Sync {
    fn schedule(
        &self,
        date: NaiveDate,
        slot: &str,
        staff: &[StaffMember],
    ) -> Result<(), ScheduleError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StaffDirectoryError {
    #[error("staff directory unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("shift creation rejected: {0}")]
    Rejected(String),
    #[error("scheduling backend unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error(transparent)]
    Directory(#[from] StaffDirectoryError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error("proposal is not permitted: {0}")]
    NotPermitted(String),
}

/// Prediction plus the assignment proposal for one roster slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterPlan {
    pub predicted: u32,
    pub assigned: u32,
    pub proposal: ActionProposal<ShiftAssignment>,
}

/// Service composing the staff directory, the headcount heuristic, and the
/// shift scheduler.
pub struct ShiftPlanner<D, S> {
    directory: Arc<D>,
    scheduler: Arc<S>,
    strategy: Box<dyn SelectionStrategy>,
}

impl<D, S> ShiftPlanner<D, S>
where
    D: StaffDirectory + 'static,
    S: ShiftScheduler + 'static,
{
    pub fn new(directory: Arc<D>, scheduler: Arc<S>) -> Self {
        Self::with_strategy(directory, scheduler, Box::new(FirstAvailable))
    }

    pub fn with_strategy(
        directory: Arc<D>,
        scheduler: Arc<S>,
        strategy: Box<dyn SelectionStrategy>,
    ) -> Self {
        Self {
            directory,
            scheduler,
            strategy,
        }
    }

    /// Predict the slot headcount and propose covering any shortfall from the
    /// currently available pool.
    pub fn plan(
        &self,
        weather: WeatherTag,
        event: EventTag,
        assigned: u32,
    ) -> Result<RosterPlan, RosterError> {
        let predicted = predict_headcount(weather, event);
        let pool = self.directory.available_staff()?;
        let proposal = propose_assignment(predicted, assigned, &pool, self.strategy.as_ref());

        Ok(RosterPlan {
            predicted,
            assigned,
            proposal,
        })
    }

    /// Create the shifts for a confirmed assignment proposal.
    pub fn commit(
        &self,
        date: NaiveDate,
        slot: &str,
        proposal: &ActionProposal<ShiftAssignment>,
    ) -> Result<(), RosterError> {
        match proposal {
            ActionProposal::Permitted { parameters } => {
                self.scheduler.schedule(date, slot, &parameters.staff)?;
                info!(
                    %date,
                    slot,
                    shortfall = parameters.shortfall,
                    "shift assignment committed"
                );
                Ok(())
            }
            ActionProposal::Declined { reason } => Err(RosterError::NotPermitted(reason.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn member(id: &str) -> StaffMember {
        StaffMember {
            staff_id: id.to_string(),
            name: format!("Staff {id}"),
            role: "Cashier".to_string(),
            hourly_rate: Money::from_major(100),
        }
    }

    fn pool(size: usize) -> Vec<StaffMember> {
        (0..size).map(|i| member(&format!("s{i}"))).collect()
    }

    #[test]
    fn shortfall_is_covered_first_available_first() {
        let proposal = propose_assignment(6, 2, &pool(5), &FirstAvailable);

        let parameters = proposal.parameters().expect("assignment permitted");
        assert_eq!(parameters.shortfall, 4);
        assert_eq!(
            parameters
                .staff
                .iter()
                .map(|m| m.staff_id.as_str())
                .collect::<Vec<_>>(),
            vec!["s0", "s1", "s2", "s3"]
        );
    }

    #[test]
    fn covered_rosters_are_declined() {
        let proposal = propose_assignment(3, 3, &pool(5), &FirstAvailable);
        assert_eq!(proposal.reason(), Some("roster already covered"));

        let overstaffed = propose_assignment(2, 4, &pool(5), &FirstAvailable);
        assert!(!overstaffed.allowed());
    }

    #[test]
    fn small_pools_are_declined_as_insufficient() {
        let proposal = propose_assignment(6, 0, &pool(3), &FirstAvailable);
        assert_eq!(proposal.reason(), Some("insufficient staff"));
    }

    struct FixedDirectory(Vec<StaffMember>);

    impl StaffDirectory for FixedDirectory {
        fn available_staff(&self) -> Result<Vec<StaffMember>, StaffDirectoryError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct MemoryScheduler {
        shifts: Mutex<Vec<(NaiveDate, String, usize)>>,
    }

    impl ShiftScheduler for MemoryScheduler {
        fn schedule(
            &self,
            date: NaiveDate,
            slot: &str,
            staff: &[StaffMember],
        ) -> Result<(), ScheduleError> {
            self.shifts
                .lock()
                .expect("shift mutex poisoned")
                .push((date, slot.to_string(), staff.len()));
            Ok(())
        }
    }

    #[test]
    fn planner_plans_and_commits_permitted_assignments() {
        let scheduler = Arc::new(MemoryScheduler::default());
        let planner = ShiftPlanner::new(Arc::new(FixedDirectory(pool(6))), scheduler.clone());

        let plan = planner
            .plan(WeatherTag::Sunny, EventTag::Festival, 2)
            .expect("plan builds");
        assert_eq!(plan.predicted, 6);
        assert!(plan.proposal.allowed());

        let date = NaiveDate::from_ymd_opt(2026, 3, 7).expect("valid date");
        planner
            .commit(date, "Morning (9AM-2PM)", &plan.proposal)
            .expect("commit succeeds");

        let shifts = scheduler.shifts.lock().expect("shift mutex poisoned");
        assert_eq!(shifts.len(), 1);
        assert_eq!(shifts[0].2, 4);
    }

    #[test]
    fn planner_refuses_to_commit_declined_proposals() {
        let planner = ShiftPlanner::new(
            Arc::new(FixedDirectory(Vec::new())),
            Arc::new(MemoryScheduler::default()),
        );

        let plan = planner
            .plan(WeatherTag::Rainy, EventTag::None, 1)
            .expect("plan builds");
        assert!(!plan.proposal.allowed());

        let date = NaiveDate::from_ymd_opt(2026, 3, 7).expect("valid date");
        let result = planner.commit(date, "Morning (9AM-2PM)", &plan.proposal);
        assert!(matches!(result, Err(RosterError::NotPermitted(_))));
    }
}
