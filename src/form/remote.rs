use std::collections::BTreeSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures_timer::Delay;

use super::field::FieldId;
use crate::config::ValidationConfig;

/// Which latency a lookup is charged with.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CheckScope {
    Field,
    Submission,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verdict {
    Available,
    AlreadyUsed,
}

impl Verdict {
    pub const fn is_available(self) -> bool {
        matches!(self, Verdict::Available)
    }
}

pub type BoxedCheckFuture<'a> = Pin<Box<dyn Future<Output = Verdict> + Send + 'a>>;

/// Read-only sets of values that are already registered.
///
/// Entries are stored lower-cased; lookups are case-insensitive.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MembershipRegistry {
    usernames: BTreeSet<String>,
    emails: BTreeSet<String>,
}

impl MembershipRegistry {
    pub fn new<U, E>(usernames: U, emails: E) -> Self
    where
        U: IntoIterator,
        U::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self {
            usernames: usernames
                .into_iter()
                .map(|value| value.as_ref().to_lowercase())
                .collect(),
            emails: emails
                .into_iter()
                .map(|value| value.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &ValidationConfig) -> Self {
        Self::new(&config.taken_usernames, &config.taken_emails)
    }

    /// Fields without a remote-check step are never members.
    pub fn contains(&self, field: FieldId, value: &str) -> bool {
        let set = match field {
            FieldId::Username => &self.usernames,
            FieldId::Email => &self.emails,
            FieldId::Password | FieldId::Mobile => return false,
        };
        set.contains(&value.to_lowercase())
    }
}

/// A latency-bound lookup standing in for a server round-trip.
///
/// `lookup` is the pure verdict; `check` charges the scope's latency first.
/// Implementations never fail.
pub trait RemoteCheck: Send + Sync {
    fn latency(&self, scope: CheckScope) -> Duration;

    fn lookup(&self, field: FieldId, value: &str) -> Verdict;

    fn check<'a>(
        &'a self,
        field: FieldId,
        value: &'a str,
        scope: CheckScope,
    ) -> BoxedCheckFuture<'a> {
        let latency = self.latency(scope);
        Box::pin(async move {
            if !latency.is_zero() {
                Delay::new(latency).await;
            }
            self.lookup(field, value)
        })
    }
}

impl<R: RemoteCheck + ?Sized> RemoteCheck for Arc<R> {
    fn latency(&self, scope: CheckScope) -> Duration {
        (**self).latency(scope)
    }

    fn lookup(&self, field: FieldId, value: &str) -> Verdict {
        (**self).lookup(field, value)
    }

    fn check<'a>(
        &'a self,
        field: FieldId,
        value: &'a str,
        scope: CheckScope,
    ) -> BoxedCheckFuture<'a> {
        (**self).check(field, value, scope)
    }
}

#[derive(Clone, Debug)]
pub struct SimulatedRemoteCheck {
    registry: Arc<MembershipRegistry>,
    field_latency: Duration,
    submission_latency: Duration,
}

impl SimulatedRemoteCheck {
    pub fn new(
        registry: Arc<MembershipRegistry>,
        field_latency: Duration,
        submission_latency: Duration,
    ) -> Self {
        Self {
            registry,
            field_latency,
            submission_latency,
        }
    }

    pub fn from_config(config: &ValidationConfig) -> Self {
        Self::new(
            Arc::new(MembershipRegistry::from_config(config)),
            config.field_latency(),
            config.submission_latency(),
        )
    }

    pub fn registry(&self) -> &MembershipRegistry {
        &self.registry
    }
}

impl RemoteCheck for SimulatedRemoteCheck {
    fn latency(&self, scope: CheckScope) -> Duration {
        match scope {
            CheckScope::Field => self.field_latency,
            CheckScope::Submission => self.submission_latency,
        }
    }

    fn lookup(&self, field: FieldId, value: &str) -> Verdict {
        let verdict = if self.registry.contains(field, value) {
            Verdict::AlreadyUsed
        } else {
            Verdict::Available
        };
        tracing::trace!(%field, ?verdict, "remote lookup");
        verdict
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use futures::executor::block_on;

    use super::*;

    #[test]
    fn registry_lookup_ignores_case() {
        let registry = MembershipRegistry::from_config(&ValidationConfig::default());
        assert!(registry.contains(FieldId::Username, "RAHUL123"));
        assert!(registry.contains(FieldId::Email, "Priya@Gmail.com"));
        assert!(!registry.contains(FieldId::Username, "newuser1"));
        assert!(!registry.contains(FieldId::Mobile, "rahul123"));
    }

    #[test]
    fn check_waits_for_the_scope_latency() {
        let remote = SimulatedRemoteCheck::new(
            Arc::new(MembershipRegistry::new(["taken"], Vec::<String>::new())),
            Duration::from_millis(30),
            Duration::from_millis(60),
        );

        let started = Instant::now();
        let verdict = block_on(remote.check(FieldId::Username, "Taken", CheckScope::Field));
        assert_eq!(verdict, Verdict::AlreadyUsed);
        assert!(started.elapsed() >= Duration::from_millis(30));

        let started = Instant::now();
        let verdict = block_on(remote.check(FieldId::Username, "free", CheckScope::Submission));
        assert!(verdict.is_available());
        assert!(started.elapsed() >= Duration::from_millis(60));
    }

    #[test]
    fn verdicts_are_idempotent() {
        let remote = SimulatedRemoteCheck::from_config(&ValidationConfig::default());
        let first = remote.lookup(FieldId::Email, "priya@gmail.com");
        let second = remote.lookup(FieldId::Email, "priya@gmail.com");
        assert_eq!(first, second);
        assert_eq!(first, Verdict::AlreadyUsed);
    }
}
