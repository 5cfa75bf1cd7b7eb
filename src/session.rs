//! Fetch-normalize-aggregate orchestration for presentation code.
//!
//! A [`FinanceSession`] owns the current [`SessionState`]. Every transition
//! replaces the whole state and is broadcast to subscribers; consumers never
//! see a half-updated snapshot.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use chrono::{Local, NaiveDateTime};
use rust_decimal::Decimal;

use crate::aggregate::budget_remaining;
use crate::budget::BudgetStore;
use crate::client::{ApiClient, DataSource};
use crate::errors::{FinanceError, FinanceResult};
use crate::parsers::prelude::*;
use crate::types::{Account, Summary, Transaction};

/// Source of the evaluation instant used for aggregation.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time, matching the timestamps the service reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Everything produced by one successful fetch cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub accounts: Vec<Account>,
    /// Most recent first
    pub transactions: Vec<Transaction>,
    pub summary: Summary,
    pub fetched_at: NaiveDateTime,
}

impl Snapshot {
    pub fn build(
        raw_accounts: &[RawAccount],
        raw_transactions: &[RawTransaction],
        now: NaiveDateTime,
    ) -> Self {
        let accounts = parse_accounts(raw_accounts);
        let transactions = parse_transactions(raw_transactions);
        let summary = Summary::compute(&accounts, &transactions, now);
        Snapshot {
            accounts,
            transactions,
            summary,
            fetched_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub loading: bool,
    /// User-visible message of the last failed refresh
    pub error: Option<String>,
    /// Last successful snapshot; kept when a later refresh fails
    pub snapshot: Option<Arc<Snapshot>>,
    pub weekly_budget: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&SessionState) + Send + Sync>;

pub struct SessionBuilder {
    source: Option<Box<dyn DataSource>>,
    clock: Box<dyn Clock>,
    budget_store: Option<BudgetStore>,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self {
            source: None,
            clock: Box::new(SystemClock),
            budget_store: None,
        }
    }
}

impl SessionBuilder {
    /// Data source to fetch from. Defaults to an [`ApiClient`] built from
    /// the environment.
    pub fn source<S: DataSource + 'static>(mut self, source: S) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Persist the weekly budget with this store. Without one the budget
    /// only lives as long as the session.
    pub fn budget_store(mut self, store: BudgetStore) -> Self {
        self.budget_store = Some(store);
        self
    }

    pub fn build(self) -> FinanceResult<FinanceSession> {
        let source = match self.source {
            Some(source) => source,
            None => Box::new(ApiClient::builder().build()?),
        };

        let weekly_budget = match &self.budget_store {
            Some(store) => store.load().unwrap_or_else(|err| {
                tracing::warn!(error = %err, path = %store.path().display(), "ignoring stored budget");
                None
            }),
            None => None,
        };

        Ok(FinanceSession {
            source,
            clock: self.clock,
            budget_store: self.budget_store,
            state: RwLock::new(SessionState {
                weekly_budget,
                ..SessionState::default()
            }),
            ordering: Mutex::new(()),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(0),
            generation: AtomicU64::new(0),
        })
    }
}

pub struct FinanceSession {
    source: Box<dyn DataSource>,
    clock: Box<dyn Clock>,
    budget_store: Option<BudgetStore>,
    state: RwLock<SessionState>,
    /// Held across write and notify so listeners see states in write order
    ordering: Mutex<()>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_listener: AtomicU64,
    generation: AtomicU64,
}

impl FinanceSession {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    /// Copy of the current state.
    pub fn state(&self) -> SessionState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.state().snapshot
    }

    /// Register a listener called with the new state after every transition.
    ///
    /// Listeners are called one transition at a time, in the order the
    /// states were written. They may read the session but must not change
    /// it from inside the callback.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&SessionState) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    /// Returns `false` if the id was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    fn notify(&self, state: &SessionState) {
        // Listeners run outside the lock so they may subscribe or unsubscribe.
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(state);
        }
    }

    fn ordering(&self) -> MutexGuard<'_, ()> {
        self.ordering.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the state with `f(current)`. When `generation` is given and a
    /// newer refresh has started since, the state is left alone.
    fn transition<F>(&self, generation: Option<u64>, f: F) -> bool
    where
        F: FnOnce(&SessionState) -> SessionState,
    {
        let _ordering = self.ordering();
        self.apply(generation, f)
    }

    /// Caller must hold the ordering lock.
    fn apply<F>(&self, generation: Option<u64>, f: F) -> bool
    where
        F: FnOnce(&SessionState) -> SessionState,
    {
        let next = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            if let Some(generation) = generation {
                if generation != self.generation.load(Ordering::SeqCst) {
                    return false;
                }
            }
            let next = f(&state);
            *state = next.clone();
            next
        };
        self.notify(&next);
        true
    }

    /// Fetch balances and transactions, then rebuild the snapshot.
    ///
    /// Both requests run concurrently and both must finish before anything
    /// is normalized. On failure the previous snapshot stays in place and
    /// the error's user message is recorded in the state.
    pub fn refresh(&self) -> FinanceResult<Arc<Snapshot>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.transition(None, |state| SessionState {
            loading: true,
            ..state.clone()
        });

        let (accounts, transactions) = std::thread::scope(|scope| {
            let accounts = scope.spawn(|| self.source.fetch_accounts());
            let transactions = self.source.fetch_transactions();
            let accounts = accounts
                .join()
                .unwrap_or_else(|payload| std::panic::resume_unwind(payload));
            (accounts, transactions)
        });

        match accounts.and_then(|accounts| transactions.map(|txns| (accounts, txns))) {
            Ok((raw_accounts, raw_transactions)) => {
                let snapshot = Arc::new(Snapshot::build(
                    &raw_accounts,
                    &raw_transactions,
                    self.clock.now(),
                ));
                tracing::debug!(
                    accounts = snapshot.accounts.len(),
                    transactions = snapshot.transactions.len(),
                    total_balance = %snapshot.summary.total_balance,
                    weekly_spending = %snapshot.summary.weekly_spending,
                    "snapshot refreshed"
                );

                let applied = self.transition(Some(generation), |state| SessionState {
                    loading: false,
                    error: None,
                    snapshot: Some(Arc::clone(&snapshot)),
                    weekly_budget: state.weekly_budget,
                });
                if !applied {
                    tracing::debug!(generation, "refresh superseded; snapshot not applied");
                }
                Ok(snapshot)
            }
            Err(err) => {
                tracing::warn!(error = %err, "refresh failed");
                let message = err.user_message();
                self.transition(Some(generation), |state| SessionState {
                    loading: false,
                    error: Some(message),
                    ..state.clone()
                });
                Err(err)
            }
        }
    }

    pub fn weekly_budget(&self) -> Option<Decimal> {
        self.state().weekly_budget
    }

    /// Set and persist the weekly budget.
    pub fn set_weekly_budget(&self, budget: Decimal) -> FinanceResult<()> {
        if budget < Decimal::ZERO {
            return Err(FinanceError::InvalidBudget(budget.to_string()));
        }
        // Store and state change together so they never disagree.
        let _ordering = self.ordering();
        if let Some(store) = &self.budget_store {
            store.save(budget)?;
        }
        self.apply(None, |state| SessionState {
            weekly_budget: Some(budget),
            ..state.clone()
        });
        Ok(())
    }

    pub fn clear_weekly_budget(&self) -> FinanceResult<()> {
        let _ordering = self.ordering();
        if let Some(store) = &self.budget_store {
            store.clear()?;
        }
        self.apply(None, |state| SessionState {
            weekly_budget: None,
            ..state.clone()
        });
        Ok(())
    }

    /// Budget minus this week's spending, when both are known.
    pub fn budget_remaining(&self) -> Option<Decimal> {
        let state = self.state();
        let budget = state.weekly_budget?;
        let snapshot = state.snapshot?;
        Some(budget_remaining(budget, snapshot.summary.weekly_spending))
    }
}

impl fmt::Debug for FinanceSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("FinanceSession")
            .field("loading", &state.loading)
            .field("error", &state.error)
            .field("has_snapshot", &state.snapshot.is_some())
            .field("weekly_budget", &state.weekly_budget)
            .finish()
    }
}
