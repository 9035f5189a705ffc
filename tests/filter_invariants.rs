//! Property tests for the filter selection model.
//!
//! Random mutation sequences must never break the invariants the setters
//! promise: page resets on every mutation except an explicit page change,
//! source/tag/read-later are mutually exclusive, and the serialized query
//! never carries unset dimensions.

use proptest::prelude::*;
use veille::filter::{FilterState, ReadFilter};

#[derive(Debug, Clone)]
enum Mutation {
    SelectSource(String),
    ClearSource,
    SelectTag(String),
    Search(String),
    ToggleReadLater,
    CycleRead,
    SetPage(u32),
}

fn mutation_strategy() -> impl Strategy<Value = Mutation> {
    prop_oneof![
        "[A-Za-z ]{1,12}".prop_map(Mutation::SelectSource),
        Just(Mutation::ClearSource),
        "[A-Za-z/]{1,12}".prop_map(Mutation::SelectTag),
        "[A-Za-z0-9 &]{0,20}".prop_map(Mutation::Search),
        Just(Mutation::ToggleReadLater),
        Just(Mutation::CycleRead),
        (1u32..50).prop_map(Mutation::SetPage),
    ]
}

fn apply(state: &mut FilterState, mutation: &Mutation) {
    match mutation {
        Mutation::SelectSource(name) => state.select_source(name),
        Mutation::ClearSource => state.clear_source(),
        Mutation::SelectTag(tag) => state.select_tag(tag),
        Mutation::Search(query) => state.set_search(query),
        Mutation::ToggleReadLater => state.toggle_read_later(),
        Mutation::CycleRead => {
            let next = state.read().next();
            state.set_read(next);
        }
        Mutation::SetPage(page) => state.set_page(*page),
    }
}

proptest! {
    /// source, tag and read-later never coexist, whatever the history.
    #[test]
    fn radio_group_is_mutually_exclusive(
        mutations in prop::collection::vec(mutation_strategy(), 0..40)
    ) {
        let mut state = FilterState::new(20);
        for mutation in &mutations {
            apply(&mut state, mutation);
            let set = [
                state.source().is_some(),
                state.tag().is_some(),
                state.read_later_only(),
            ];
            let active = set.iter().filter(|&&s| s).count();
            prop_assert!(active <= 1, "radio group violated after {:?}: {:?}", mutation, state);
        }
    }

    /// Every mutation except SetPage lands back on page 1.
    #[test]
    fn filter_mutations_reset_page(
        mutations in prop::collection::vec(mutation_strategy(), 1..40)
    ) {
        let mut state = FilterState::new(20);
        for mutation in &mutations {
            apply(&mut state, mutation);
            match mutation {
                Mutation::SetPage(page) => prop_assert_eq!(state.page(), (*page).max(1)),
                // clear_source on an already-empty source is a no-op and may
                // keep whatever page was set
                Mutation::ClearSource => {}
                _ => prop_assert_eq!(state.page(), 1, "after {:?}", mutation),
            }
            prop_assert!(state.page() >= 1);
        }
    }

    /// The serialized query carries exactly the set dimensions.
    #[test]
    fn query_pairs_track_state(
        mutations in prop::collection::vec(mutation_strategy(), 0..40)
    ) {
        let mut state = FilterState::new(20);
        for mutation in &mutations {
            apply(&mut state, mutation);
        }

        let pairs = state.query_pairs();
        let has = |key: &str| pairs.iter().any(|(k, _)| *k == key);

        prop_assert!(has("page"));
        prop_assert!(has("page_size"));
        prop_assert_eq!(has("source"), state.source().is_some());
        prop_assert_eq!(has("tag"), state.tag().is_some());
        prop_assert_eq!(has("search"), state.search().is_some());
        prop_assert_eq!(has("read_later"), state.read_later_only());
        prop_assert_eq!(has("read"), state.read() != ReadFilter::Either);
    }

    /// Re-applying the same source or tag is always a toggle back to None.
    #[test]
    fn reselect_clears(name in "[A-Za-z ]{1,12}") {
        let mut state = FilterState::new(20);
        state.select_source(&name);
        prop_assert_eq!(state.source(), Some(name.as_str()));
        state.select_source(&name);
        prop_assert_eq!(state.source(), None);

        state.select_tag(&name);
        prop_assert_eq!(state.tag(), Some(name.as_str()));
        state.select_tag(&name);
        prop_assert_eq!(state.tag(), None);
    }
}
