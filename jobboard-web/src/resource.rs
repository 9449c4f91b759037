//! Binds each domain's entity, draft and filter types to its store slice and
//! REST path, so the generic client and hooks can serve every domain.

use std::fmt::Debug;

use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::models::{
    Application, ApplicationDraft, ApplicationFilters, Candidate, CandidateDraft,
    CandidateFilters, Company, CompanyDraft, CompanyFilters, Demand, DemandDraft, DemandFilters,
    FilterSet, Identified, Job, JobDraft, JobFilters, PartnerDraft, PartnerFilters,
    PartnerProgramme, University, UniversityDraft, UniversityFilters,
};

use crate::store::{
    Action, AppState, CandidatesAction, EntityList, FilterSnapshot, JobsAction, ListAction,
};

/// A domain served by the API and cached in one store slice.
pub trait Resource: 'static {
    /// Slice key and cache domain.
    const NAME: &'static str;
    /// REST collection path, relative to the API base URL.
    const PATH: &'static str;

    type Entity: Identified + Clone + PartialEq + Debug + Serialize + DeserializeOwned + 'static;
    type Draft: Serialize + Clone + Debug + 'static;
    type Filters: FilterSet;

    /// The domain's list inside the state tree.
    fn list(state: &AppState) -> &EntityList<Self::Entity, Self::Filters>;

    /// Wraps a list action into a root action for this domain's slice.
    fn action(action: ListAction<Self::Entity, Self::Filters>) -> Action;

    fn snapshot(filters: &Self::Filters) -> FilterSnapshot;

    /// Extracts filters from a snapshot taken in the same domain.
    fn restore(snapshot: &FilterSnapshot) -> Option<Self::Filters>;
}

macro_rules! resource {
    (
        $marker:ident, $name:literal, $path:literal,
        $entity:ty, $draft:ty, $filters:ty,
        $snapshot:ident,
        list = |$state:ident| $list:expr,
        action = |$action:ident| $wrap:expr $(,)?
    ) => {
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $marker;

        impl Resource for $marker {
            const NAME: &'static str = $name;
            const PATH: &'static str = $path;

            type Entity = $entity;
            type Draft = $draft;
            type Filters = $filters;

            fn list($state: &AppState) -> &EntityList<$entity, $filters> {
                $list
            }

            fn action($action: ListAction<$entity, $filters>) -> Action {
                $wrap
            }

            fn snapshot(filters: &$filters) -> FilterSnapshot {
                FilterSnapshot::$snapshot(filters.clone())
            }

            fn restore(snapshot: &FilterSnapshot) -> Option<$filters> {
                match snapshot {
                    FilterSnapshot::$snapshot(filters) => Some(filters.clone()),
                    _ => None,
                }
            }
        }
    };
}

resource!(
    Jobs, "jobs", "jobs",
    Job, JobDraft, JobFilters,
    Jobs,
    list = |state| state.jobs.list(),
    action = |action| Action::Jobs(JobsAction::List(action)),
);

resource!(
    Applications, "applications", "applications",
    Application, ApplicationDraft, ApplicationFilters,
    Applications,
    list = |state| &state.applications,
    action = |action| Action::Applications(action),
);

resource!(
    Candidates, "candidates", "candidates",
    Candidate, CandidateDraft, CandidateFilters,
    Candidates,
    list = |state| state.candidates.list(),
    action = |action| Action::Candidates(CandidatesAction::List(action)),
);

resource!(
    Companies, "companies", "companies",
    Company, CompanyDraft, CompanyFilters,
    Companies,
    list = |state| &state.companies,
    action = |action| Action::Companies(action),
);

resource!(
    Universities, "universities", "universities",
    University, UniversityDraft, UniversityFilters,
    Universities,
    list = |state| &state.universities,
    action = |action| Action::Universities(action),
);

resource!(
    Demands, "demands", "demands",
    Demand, DemandDraft, DemandFilters,
    Demands,
    list = |state| &state.demands,
    action = |action| Action::Demands(action),
);

resource!(
    Partners, "partner", "partners",
    PartnerProgramme, PartnerDraft, PartnerFilters,
    Partner,
    list = |state| &state.partner,
    action = |action| Action::Partner(action),
);
