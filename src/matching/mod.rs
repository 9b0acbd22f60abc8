//! Worker/task matching: requirement sets, eligibility, assignment assembly
//! and pre-flight validation. Everything here is pure and synchronous.

pub mod assembler;
pub mod eligibility;
pub mod requirements;
pub mod validation;

pub use assembler::assemble_assignments;
pub use eligibility::{
    Compatibility, ExpiringCertificate, WorkerProfile, evaluate, is_eligible, valid_certificate_ids,
};
pub use requirements::RequirementSet;
pub use validation::{WorkerAssignmentValidation, validate_workers};
