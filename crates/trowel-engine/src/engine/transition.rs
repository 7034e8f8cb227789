use std::collections::VecDeque;

/// Show/hide animations the UI shell plays on request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum UiTransition {
    ShowTitle,
    HideTitle,
    ShowStart,
    HideStart,
    ShowHud,
    HideHud,
    ShowFinish,
    HideFinish,
    ShowTutorial,
    HideTutorial,
    ShowDataReset,
    HideDataReset,
}

/// Handle for one in-flight UI transition.
///
/// The shell hands the ticket back through
/// [`GardenGame::complete_transition`](crate::GardenGame::complete_transition)
/// exactly once, when the animation has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionTicket {
    id: u64,
    transition: UiTransition,
}

impl TransitionTicket {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn transition(&self) -> UiTransition {
        self.transition
    }
}

/// One entry of a [`TransitionQueue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<A> {
    /// Wait for the shell to play a transition.
    Ui(UiTransition),
    /// Run an action once every earlier step is done.
    Action(A),
}

/// What the queue wants done next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ready<A> {
    Begin(TransitionTicket),
    Run(A),
}

/// Ordered list of UI barriers and actions.
///
/// At most one transition is in flight; nothing behind it is released until
/// its ticket is completed. Cancelling drops every pending step and
/// invalidates the in-flight ticket, so a late completion is ignored.
///
/// # Example
///
/// ```
/// use trowel_engine::{Ready, Step, TransitionQueue, UiTransition};
///
/// let mut queue = TransitionQueue::new();
/// queue.extend([Step::Ui(UiTransition::HideHud), Step::Action("score")]);
///
/// let Some(Ready::Begin(ticket)) = queue.next_ready() else { panic!() };
/// assert_eq!(queue.next_ready(), None);
/// assert!(queue.complete(ticket));
/// assert_eq!(queue.next_ready(), Some(Ready::Run("score")));
/// assert!(queue.is_idle());
/// ```
#[derive(Debug, Clone)]
pub struct TransitionQueue<A> {
    steps: VecDeque<Step<A>>,
    in_flight: Option<TransitionTicket>,
    next_id: u64,
}

impl<A> Default for TransitionQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> TransitionQueue<A> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            steps: VecDeque::new(),
            in_flight: None,
            next_id: 0,
        }
    }

    pub fn push(&mut self, step: Step<A>) {
        self.steps.push_back(step);
    }

    pub fn extend<I>(&mut self, steps: I)
    where
        I: IntoIterator<Item = Step<A>>,
    {
        self.steps.extend(steps);
    }

    /// Drops every pending step and forgets the in-flight transition.
    ///
    /// Returns the number of steps discarded, the in-flight one included.
    pub fn cancel(&mut self) -> usize {
        let dropped = self.steps.len() + usize::from(self.in_flight.is_some());
        self.steps.clear();
        self.in_flight = None;
        dropped
    }

    /// Pops the next step unless a transition is still playing.
    pub fn next_ready(&mut self) -> Option<Ready<A>> {
        if self.in_flight.is_some() {
            return None;
        }
        match self.steps.pop_front()? {
            Step::Ui(transition) => {
                let ticket = TransitionTicket {
                    id: self.next_id,
                    transition,
                };
                self.next_id += 1;
                self.in_flight = Some(ticket);
                Some(Ready::Begin(ticket))
            }
            Step::Action(action) => Some(Ready::Run(action)),
        }
    }

    /// Marks `ticket` done. Stale or unknown tickets return `false`.
    pub fn complete(&mut self, ticket: TransitionTicket) -> bool {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn in_flight(&self) -> Option<TransitionTicket> {
        self.in_flight
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_none() && self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(queue: &mut TransitionQueue<u8>, log: &mut Vec<String>) {
        while let Some(ready) = queue.next_ready() {
            match ready {
                Ready::Begin(ticket) => {
                    log.push(ticket.transition().to_string());
                    assert!(queue.complete(ticket));
                }
                Ready::Run(action) => log.push(action.to_string()),
            }
        }
    }

    #[test]
    fn test_steps_run_in_order() {
        let mut queue = TransitionQueue::new();
        queue.extend([
            Step::Ui(UiTransition::ShowFinish),
            Step::Action(1),
            Step::Ui(UiTransition::HideHud),
            Step::Action(2),
        ]);
        let mut log = vec![];
        drain(&mut queue, &mut log);
        assert_eq!(log, ["ShowFinish", "1", "HideHud", "2"]);
        assert!(queue.is_idle());
    }

    #[test]
    fn test_barrier_holds_until_completed() {
        let mut queue = TransitionQueue::new();
        queue.extend([Step::Ui(UiTransition::HideStart), Step::Action(7)]);
        let Some(Ready::Begin(ticket)) = queue.next_ready() else {
            panic!("expected a transition first");
        };
        assert_eq!(queue.in_flight(), Some(ticket));
        assert_eq!(queue.next_ready(), None);
        assert_eq!(queue.next_ready(), None);
        assert!(queue.complete(ticket));
        assert!(!queue.complete(ticket));
        assert_eq!(queue.next_ready(), Some(Ready::Run(7)));
    }

    #[test]
    fn test_cancel_discards_pending_and_invalidates_ticket() {
        let mut queue = TransitionQueue::new();
        queue.extend([
            Step::Ui(UiTransition::HideFinish),
            Step::Ui(UiTransition::ShowStart),
            Step::Action(3),
        ]);
        let Some(Ready::Begin(stale)) = queue.next_ready() else {
            panic!("expected a transition first");
        };
        assert_eq!(queue.cancel(), 3);
        assert!(queue.is_idle());

        queue.push(Step::Ui(UiTransition::ShowTitle));
        let Some(Ready::Begin(fresh)) = queue.next_ready() else {
            panic!("expected a transition");
        };
        assert!(!queue.complete(stale));
        assert_ne!(stale.id(), fresh.id());
        assert!(queue.complete(fresh));
    }
}
