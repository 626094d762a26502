//! Password generation.
//!
//! Two interchangeable strategies, picked by configuration:
//!
//! - [`RemotePasswordClient`] - API Ninjas password generator (needs an API key)
//! - [`LocalPasswordGenerator`] - OS-random rejection sampling against a [`PasswordPolicy`]

pub mod local;
pub mod remote;

pub use local::{LocalPasswordGenerator, PasswordPolicy, SPECIAL_CHARACTERS};
pub use remote::{RemotePasswordClient, DEFAULT_PASSWORD_API_URL, PASSWORD_API_STATUS_URL};

use crate::error::PipelineResult;
use crate::models::Credential;

/// The configured password source.
#[derive(Clone)]
pub enum CredentialGenerator {
    Remote(RemotePasswordClient),
    Local(LocalPasswordGenerator),
}

impl CredentialGenerator {
    /// Produce a fresh password for one accepted row.
    pub async fn generate(&self) -> PipelineResult<Credential> {
        match self {
            Self::Remote(client) => Ok(client.generate().await?),
            Self::Local(generator) => Ok(generator.generate()?),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Startup availability check; the local generator has nothing to probe.
    pub async fn probe(&self) -> PipelineResult<()> {
        if let Self::Remote(client) = self {
            client.probe().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_strategy() {
        let gen = CredentialGenerator::Local(
            LocalPasswordGenerator::new(PasswordPolicy::default()).unwrap(),
        );
        assert!(!gen.is_remote());
        gen.probe().await.unwrap();

        let cred = gen.generate().await.unwrap();
        assert!(PasswordPolicy::default().is_satisfied_by(&cred.password));
    }
}
