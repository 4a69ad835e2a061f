use anyhow::anyhow;

/// Scenario values passed between cases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKey {
    UserEmail,
    UserPassword,
    UserToken,
}

#[derive(Debug, Default, Clone)]
pub struct ScenarioState {
    user_email: Option<String>,
    user_password: Option<String>,
    user_token: Option<String>,
}

impl ScenarioState {
    fn slot(&self, key: StateKey) -> &Option<String> {
        match key {
            StateKey::UserEmail => &self.user_email,
            StateKey::UserPassword => &self.user_password,
            StateKey::UserToken => &self.user_token,
        }
    }

    pub fn set(&mut self, key: StateKey, value: impl Into<String>) {
        let slot = match key {
            StateKey::UserEmail => &mut self.user_email,
            StateKey::UserPassword => &mut self.user_password,
            StateKey::UserToken => &mut self.user_token,
        };
        *slot = Some(value.into());
    }

    pub fn get(&self, key: StateKey) -> Option<&str> {
        self.slot(key).as_deref()
    }

    /// Value written by an earlier case, or an error naming the missing key
    pub fn require(&self, key: StateKey) -> anyhow::Result<&str> {
        self.get(key)
            .ok_or_else(|| anyhow!("scenario state {:?} is not set; an earlier case must write it", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_key_is_an_error_not_a_panic() {
        let state = ScenarioState::default();
        let err = state.require(StateKey::UserToken).unwrap_err();
        assert!(err.to_string().contains("UserToken"));
    }

    #[test]
    fn set_then_get() {
        let mut state = ScenarioState::default();
        state.set(StateKey::UserToken, "tok");
        state.set(StateKey::UserEmail, String::from("test@test.com"));

        assert_eq!(state.get(StateKey::UserToken), Some("tok"));
        assert_eq!(state.require(StateKey::UserEmail).unwrap(), "test@test.com");
        assert_eq!(state.get(StateKey::UserPassword), None);
    }
}
