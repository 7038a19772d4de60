//! Core action and reducer traits.

/// Trait for actions dispatched to a state container.
///
/// Actions describe something that happened in the checkout. They are
/// immutable and carry every value the reducers need.
pub trait Action: Clone + Send + Sync {
    /// Returns the action type name, used for logging and filtering.
    fn action_type(&self) -> &'static str;
}

/// Trait for state held by a [`Store`](crate::store::Store).
///
/// `reduce` must be pure and deterministic:
/// - Given the same state and action, it must always produce the same new state
/// - It must not have side effects
/// - It must not fail; actions a slice does not handle leave it unchanged
pub trait Slice: Clone + Default + Send + Sync + 'static {
    /// The type of actions this slice consumes.
    type Action: Action;

    /// Produces the next state for `action`.
    fn reduce(&self, action: &Self::Action) -> Self;

    /// Applies multiple actions in sequence.
    fn reduce_all<'a>(&self, actions: impl IntoIterator<Item = &'a Self::Action>) -> Self
    where
        Self::Action: 'a,
    {
        actions
            .into_iter()
            .fold(self.clone(), |state, action| state.reduce(action))
    }
}
