use std::fmt::Debug;

use futures::future::BoxFuture;
use thiserror::Error;

/// Procedure of a test case; borrows the shared context for its whole run
pub type CaseFn<C> = for<'c> fn(&'c mut C) -> BoxFuture<'c, anyhow::Result<()>>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Test case '{case}' reads {key} but no earlier case writes it")]
    UnsatisfiedRead { case: &'static str, key: String },

    #[error("Test case '{0}' is registered twice")]
    DuplicateCase(&'static str),
}

/// A named test procedure plus the scenario-state keys it consumes and produces
pub struct TestCase<C, K: 'static> {
    pub name: &'static str,
    pub run: CaseFn<C>,
    pub reads: &'static [K],
    pub writes: &'static [K],
}

impl<C, K: 'static> TestCase<C, K> {
    pub fn new(name: &'static str, run: CaseFn<C>) -> Self {
        Self {
            name,
            run,
            reads: &[],
            writes: &[],
        }
    }

    pub fn reads(mut self, keys: &'static [K]) -> Self {
        self.reads = keys;
        self
    }

    pub fn writes(mut self, keys: &'static [K]) -> Self {
        self.writes = keys;
        self
    }
}

/// Ordered list of test cases. Registration order is execution order.
pub struct Registry<C, K: 'static> {
    cases: Vec<TestCase<C, K>>,
}

impl<C, K: PartialEq + Debug + 'static> Registry<C, K> {
    pub fn new() -> Self {
        Self { cases: Vec::new() }
    }

    /// Append a case (builder form)
    pub fn case(mut self, case: TestCase<C, K>) -> Self {
        self.register(case);
        self
    }

    pub fn register(&mut self, case: TestCase<C, K>) {
        tracing::debug!("Registered test case '{}'", case.name);
        self.cases.push(case);
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestCase<C, K>> {
        self.cases.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.cases.iter().map(|c| c.name).collect()
    }

    /// Check that names are unique and that every declared read is written by
    /// a case registered earlier
    pub fn validate(&self) -> Result<(), RegistryError> {
        for (index, case) in self.cases.iter().enumerate() {
            let earlier = &self.cases[..index];

            if earlier.iter().any(|c| c.name == case.name) {
                return Err(RegistryError::DuplicateCase(case.name));
            }

            for key in case.reads {
                let written = earlier.iter().any(|c| c.writes.contains(key));
                if !written {
                    return Err(RegistryError::UnsatisfiedRead {
                        case: case.name,
                        key: format!("{:?}", key),
                    });
                }
            }
        }
        Ok(())
    }
}

impl<C, K: PartialEq + Debug + 'static> Default for Registry<C, K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Key {
        Token,
    }

    fn noop(_: &mut ()) -> BoxFuture<'_, anyhow::Result<()>> {
        Box::pin(async { Ok(()) })
    }

    #[test]
    fn keeps_registration_order() {
        let registry: Registry<(), Key> = Registry::new()
            .case(TestCase::new("c", noop))
            .case(TestCase::new("a", noop))
            .case(TestCase::new("b", noop));

        assert_eq!(registry.names(), vec!["c", "a", "b"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn accepts_reads_satisfied_by_earlier_writes() {
        let registry: Registry<(), Key> = Registry::new()
            .case(TestCase::new("login", noop).writes(&[Key::Token]))
            .case(TestCase::new("info", noop).reads(&[Key::Token]));

        assert_eq!(registry.validate(), Ok(()));
    }

    #[test]
    fn rejects_read_before_write() {
        let registry: Registry<(), Key> = Registry::new()
            .case(TestCase::new("info", noop).reads(&[Key::Token]))
            .case(TestCase::new("login", noop).writes(&[Key::Token]));

        assert_eq!(
            registry.validate(),
            Err(RegistryError::UnsatisfiedRead {
                case: "info",
                key: "Token".to_string()
            })
        );
    }

    #[test]
    fn rejects_duplicate_names() {
        let registry: Registry<(), Key> = Registry::new()
            .case(TestCase::new("login", noop))
            .case(TestCase::new("login", noop));

        assert_eq!(registry.validate(), Err(RegistryError::DuplicateCase("login")));
    }
}
