//! Composable collision rules
//!
//! A rule AND-combines guard predicates and branches to a match or no-match
//! action. Guards see the context read-only; only actions may mutate it. The
//! rule itself holds no state between evaluations.

type Guard<C> = Box<dyn Fn(&C) -> bool>;
type Action<C> = Box<dyn Fn(&mut C)>;

/// A reusable guard/action bundle evaluated against a context `C`
pub struct CollisionRule<C> {
    guards: Vec<Guard<C>>,
    on_match: Option<Action<C>>,
    on_no_match: Option<Action<C>>,
}

impl<C> Default for CollisionRule<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> CollisionRule<C> {
    /// Rule with no guards and no actions (always matches, does nothing)
    pub fn new() -> Self {
        Self {
            guards: Vec::new(),
            on_match: None,
            on_no_match: None,
        }
    }

    /// Add a guard; guards run in insertion order
    pub fn guard(mut self, guard: impl Fn(&C) -> bool + 'static) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    pub fn on_match(mut self, action: impl Fn(&mut C) + 'static) -> Self {
        self.on_match = Some(Box::new(action));
        self
    }

    pub fn on_no_match(mut self, action: impl Fn(&mut C) + 'static) -> Self {
        self.on_no_match = Some(Box::new(action));
        self
    }

    /// True iff every guard holds (vacuously true with no guards).
    /// Stops at the first failing guard.
    pub fn matches(&self, ctx: &C) -> bool {
        self.guards.iter().all(|guard| guard(ctx))
    }

    /// Run the match action when every guard holds, otherwise the no-match action
    pub fn evaluate(&self, ctx: &mut C) -> bool {
        if self.matches(ctx) {
            if let Some(action) = &self.on_match {
                action(ctx);
            }
            true
        } else {
            if let Some(action) = &self.on_no_match {
                action(ctx);
            }
            false
        }
    }
}

impl<C> std::fmt::Debug for CollisionRule<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionRule")
            .field("guards", &self.guards.len())
            .field("on_match", &self.on_match.is_some())
            .field("on_no_match", &self.on_no_match.is_some())
            .finish()
    }
}
