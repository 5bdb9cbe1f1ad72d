//! Board services: normalization, workflow orchestration, and the state
//! they share.

pub mod normalizer;
mod operation;
mod registry;
mod snapshot;
mod workflow;

pub use normalizer::Normalizer;
pub use operation::{
    BusyFlags, OperationGuard, OperationKey, OperationKind, OperationState, OperationTracker,
};
pub use registry::{ProjectRegistry, Registry, RegistryEntry, TagRegistry};
pub use snapshot::{ReloadTicket, TaskSnapshot};
pub use workflow::{Composer, TaskWorkflowController, WorkflowError, WorkflowResult};
