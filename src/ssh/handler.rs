/// russh client handler enforcing the host key policy
use russh::client;
use russh::keys::{HashAlg, PublicKey};
use tracing::{info, warn};

use crate::config::HostKeyPolicy;

/// Outcome of comparing a presented host key against the policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostKeyVerdict {
    Trusted,
    Accepted,
    Unknown,
    Mismatch { expected: String },
}

impl HostKeyVerdict {
    /// Whether the handshake may continue. Under accept-any even a pin
    /// mismatch is let through, but it is still reported as a mismatch.
    pub fn is_allowed(&self, policy: HostKeyPolicy) -> bool {
        match self {
            HostKeyVerdict::Trusted | HostKeyVerdict::Accepted => true,
            HostKeyVerdict::Mismatch { .. } => policy == HostKeyPolicy::AcceptAny,
            HostKeyVerdict::Unknown => false,
        }
    }
}

/// Decide on a presented fingerprint. `pinned` is the configured fingerprint
/// for this `host:port`, if any.
pub fn judge_host_key(policy: HostKeyPolicy, pinned: Option<&str>, presented: &str) -> HostKeyVerdict {
    match (pinned, policy) {
        (Some(expected), _) if expected.trim() == presented => HostKeyVerdict::Trusted,
        (Some(expected), _) => HostKeyVerdict::Mismatch {
            expected: expected.trim().to_string(),
        },
        (None, HostKeyPolicy::Pinned) => HostKeyVerdict::Unknown,
        (None, HostKeyPolicy::AcceptAny) => HostKeyVerdict::Accepted,
    }
}

pub struct ClientHandler {
    address: String,
    policy: HostKeyPolicy,
    pinned: Option<String>,
}

impl ClientHandler {
    pub fn new(address: String, policy: HostKeyPolicy, pinned: Option<String>) -> Self {
        Self {
            address,
            policy,
            pinned,
        }
    }
}

impl client::Handler for ClientHandler {
    type Error = russh::Error;

    async fn check_server_key(&mut self, server_public_key: &PublicKey) -> Result<bool, Self::Error> {
        let fingerprint = server_public_key.fingerprint(HashAlg::Sha256).to_string();
        let algorithm = server_public_key.algorithm().to_string();
        let verdict = judge_host_key(self.policy, self.pinned.as_deref(), &fingerprint);
        let allowed = verdict.is_allowed(self.policy);

        match &verdict {
            HostKeyVerdict::Trusted => {
                info!(address = %self.address, fingerprint = %fingerprint, "Host key matches pinned fingerprint");
            }
            HostKeyVerdict::Accepted => {
                warn!(
                    address = %self.address,
                    algorithm = %algorithm,
                    fingerprint = %fingerprint,
                    "Accepting unverified host key (host_key_policy = accept-any)"
                );
            }
            HostKeyVerdict::Unknown => {
                warn!(
                    address = %self.address,
                    algorithm = %algorithm,
                    fingerprint = %fingerprint,
                    "No pinned host key; add it to ssh.trusted_host_keys to allow this host"
                );
            }
            HostKeyVerdict::Mismatch { expected } if allowed => {
                warn!(
                    address = %self.address,
                    expected = %expected,
                    presented = %fingerprint,
                    "Host key does not match pinned fingerprint; connecting anyway (host_key_policy = accept-any)"
                );
            }
            HostKeyVerdict::Mismatch { expected } => {
                warn!(
                    address = %self.address,
                    expected = %expected,
                    presented = %fingerprint,
                    "Host key does not match pinned fingerprint"
                );
            }
        }

        Ok(allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "SHA256:nThbg6kXUpJWGl7E1IGOCspRomTxdCARLviKw6E5SY8";

    #[test]
    fn pinned_policy_requires_matching_fingerprint() {
        assert_eq!(
            judge_host_key(HostKeyPolicy::Pinned, Some(KEY), KEY),
            HostKeyVerdict::Trusted
        );
        assert_eq!(
            judge_host_key(HostKeyPolicy::Pinned, None, KEY),
            HostKeyVerdict::Unknown
        );
        assert!(matches!(
            judge_host_key(HostKeyPolicy::Pinned, Some("SHA256:other"), KEY),
            HostKeyVerdict::Mismatch { .. }
        ));
    }

    #[test]
    fn pinned_policy_only_allows_trusted_keys() {
        let policy = HostKeyPolicy::Pinned;
        assert!(judge_host_key(policy, Some(KEY), KEY).is_allowed(policy));
        assert!(!judge_host_key(policy, None, KEY).is_allowed(policy));
        assert!(!judge_host_key(policy, Some("SHA256:other"), KEY).is_allowed(policy));
    }

    #[test]
    fn accept_any_still_reports_a_pinned_match() {
        assert_eq!(
            judge_host_key(HostKeyPolicy::AcceptAny, Some(KEY), KEY),
            HostKeyVerdict::Trusted
        );
        assert_eq!(
            judge_host_key(HostKeyPolicy::AcceptAny, None, KEY),
            HostKeyVerdict::Accepted
        );
    }

    #[test]
    fn accept_any_reports_a_contradicted_pin_as_mismatch() {
        let verdict = judge_host_key(HostKeyPolicy::AcceptAny, Some("SHA256:other"), KEY);
        assert_eq!(
            verdict,
            HostKeyVerdict::Mismatch {
                expected: "SHA256:other".to_string()
            }
        );
        assert!(verdict.is_allowed(HostKeyPolicy::AcceptAny));
    }

    #[test]
    fn pinned_value_is_trimmed() {
        let padded = format!("  {}\n", KEY);
        assert_eq!(
            judge_host_key(HostKeyPolicy::Pinned, Some(&padded), KEY),
            HostKeyVerdict::Trusted
        );
    }
}
