//! The functional scenario run against the service.
//!
//! Cases run in the order [`registry`] lists them and share one [`Context`].
//! Values one case produces for later ones (the login token, for example) go
//! through [`ScenarioState`], and each case declares the keys it reads and
//! writes so the order can be checked before anything runs.

pub mod assert;
pub mod state;
pub mod user;

use std::sync::Arc;

use crate::api::ServiceClient;
use crate::database::VerificationCodes;
use crate::runner::{Registry, TestCase};

pub use state::{ScenarioState, StateKey};

/// Shared by every case of a run
pub struct Context {
    pub db: Arc<dyn VerificationCodes>,
    pub service: ServiceClient,
    pub state: ScenarioState,
}

impl Context {
    pub fn new(db: Arc<dyn VerificationCodes>, service: ServiceClient) -> Self {
        Self {
            db,
            service,
            state: ScenarioState::default(),
        }
    }
}

pub type Case = TestCase<Context, StateKey>;

/// The user scenario, in execution order
pub fn registry() -> Registry<Context, StateKey> {
    use StateKey::*;

    Registry::new()
        .case(Case::new("register_user", user::register_user).writes(&[UserEmail, UserPassword]))
        .case(
            Case::new("login_user", user::login_user)
                .reads(&[UserEmail, UserPassword])
                .writes(&[UserToken]),
        )
        .case(Case::new("user_info", user::user_info).reads(&[UserToken]))
        .case(Case::new("update_user_setting", user::update_user_setting).reads(&[UserToken]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_order_is_fixed() {
        assert_eq!(
            registry().names(),
            vec!["register_user", "login_user", "user_info", "update_user_setting"]
        );
    }

    #[test]
    fn scenario_dependencies_are_satisfied() {
        assert!(registry().validate().is_ok());
    }
}
