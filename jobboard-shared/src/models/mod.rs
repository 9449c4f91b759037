pub mod application;
pub mod candidate;
pub mod company;
pub mod demand;
pub mod errors;
pub mod filters;
pub mod job;
pub mod partner;
pub mod university;
pub mod user;

use serde::{Deserialize, Serialize};

pub use application::{Application, ApplicationDraft, ApplicationFilterPatch, ApplicationFilters, ApplicationStatus};
pub use candidate::{Candidate, CandidateDraft, CandidateFilterPatch, CandidateFilters};
pub use company::{Company, CompanyDraft, CompanyFilterPatch, CompanyFilters};
pub use demand::{Demand, DemandDraft, DemandFilterPatch, DemandFilters, DemandStatus};
pub use errors::ErrorResponse;
pub use filters::{FilterSet, Pagination};
pub use job::{Job, JobDraft, JobFilterPatch, JobFilters, JobStatus};
pub use partner::{PartnerDraft, PartnerFilterPatch, PartnerFilters, PartnerProgramme, PartnerStatus};
pub use university::{University, UniversityDraft, UniversityFilterPatch, UniversityFilters};
pub use user::{LoginRequest, LoginResponse, RegisterRequest, Role, SessionUser, UserPatch};

/// Server-assigned identifier shared by every entity type.
pub type EntityId = u64;

/// Anything the store can address by id.
pub trait Identified {
    /// The entity's server-assigned identifier.
    fn id(&self) -> EntityId;
}

/// One page of a list endpoint: `{ "items": [...], "total": n }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items in server order.
    pub items: Vec<T>,
    /// Total matching items across all pages.
    pub total: u64,
}

impl<T> Page<T> {
    /// Creates a page from its items and the overall total.
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

macro_rules! identified {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Identified for $ty {
                fn id(&self) -> EntityId {
                    self.id
                }
            }
        )+
    };
}

identified!(
    Job,
    Application,
    Candidate,
    Company,
    University,
    Demand,
    PartnerProgramme,
);
