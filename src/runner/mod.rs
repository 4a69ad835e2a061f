pub mod registry;
pub mod suite;

pub use registry::{CaseFn, Registry, RegistryError, TestCase};
pub use suite::{run_cases, run_suite, CaseStatus, SuiteOptions, SuiteReport};
