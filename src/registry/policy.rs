use serde::Deserialize;

// RegistrationPolicy

/// What `register` does when the id is already present.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationPolicy {
    /// Replace the existing entry.
    #[default]
    Upsert,
    /// Fail with `AlreadyRegistered` and keep the existing entry. Explicit
    /// replacement is still allowed.
    Strict,
}
