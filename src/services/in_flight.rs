use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use crate::error::{Error, Result};

/// Board state that tracks which entities have a mutation outstanding.
pub(crate) trait Pending {
    fn pending(&mut self) -> &mut HashSet<String>;
}

/// Marks one entity busy for as long as it lives. The mark is cleared on
/// drop, so an action that is abandoned mid-request releases it too.
pub(crate) struct InFlight<'a, S: Pending> {
    state: &'a Mutex<S>,
    id: String,
}

impl<'a, S: Pending> InFlight<'a, S> {
    pub(crate) fn begin(state: &'a Mutex<S>, id: &str) -> Result<Self> {
        let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);
        if !guard.pending().insert(id.to_string()) {
            return Err(Error::Busy(id.to_string()));
        }
        Ok(Self {
            state,
            id: id.to_string(),
        })
    }
}

impl<S: Pending> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending()
            .remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Rows(HashSet<String>);

    impl Pending for Rows {
        fn pending(&mut self) -> &mut HashSet<String> {
            &mut self.0
        }
    }

    #[test]
    fn second_mark_on_the_same_id_is_busy() {
        let state = Mutex::new(Rows::default());
        let first = InFlight::begin(&state, "a1").unwrap();
        assert!(matches!(InFlight::begin(&state, "a1"), Err(Error::Busy(id)) if id == "a1"));
        assert!(InFlight::begin(&state, "a2").is_ok());

        drop(first);
        assert!(state.lock().unwrap().0.is_empty());
        assert!(InFlight::begin(&state, "a1").is_ok());
    }
}
