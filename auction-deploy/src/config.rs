//! Run configuration, read once from the environment at process start.

use crate::{Error, Result};

pub const ENV_FQN: &str = "FQN";
pub const ENV_WAIT_CONFIRMATIONS: &str = "WAIT_CONFIRMATIONS";
pub const ENV_CLOSE: &str = "CLOSE";
pub const ENV_FINALIZE: &str = "FINALIZE";
pub const ENV_TAGS: &str = "DEPLOY_TAGS";

pub const DEFAULT_WAIT_CONFIRMATIONS: u64 = 1;

/// Which lifecycle transitions the run may attempt after deploying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecycleFlags {
    pub close: bool,
    pub finalize: bool,
}

impl LifecycleFlags {
    pub fn any(&self) -> bool {
        self.close || self.finalize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    /// Exact artifact identifier tried before the built-in candidates.
    pub fqn_override: Option<String>,
    pub wait_confirmations: u64,
    pub flags: LifecycleFlags,
    /// Only procedures carrying one of these tags run; empty selects everything.
    pub tags: Vec<String>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            fqn_override: None,
            wait_confirmations: DEFAULT_WAIT_CONFIRMATIONS,
            flags: LifecycleFlags::default(),
            tags: Vec::new(),
        }
    }
}

impl DeployConfig {
    pub fn new(fqn_override: Option<&str>, wait_confirmations: u64, flags: LifecycleFlags) -> Self {
        let fqn_override = fqn_override
            .map(str::trim)
            .filter(|fqn| !fqn.is_empty())
            .map(str::to_string);
        Self {
            fqn_override,
            wait_confirmations,
            flags,
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = tags
            .into_iter()
            .map(|tag| tag.as_ref().trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();
        self
    }

    /// Whether a procedure tagged with `tags` is part of this run.
    pub fn selects(&self, tags: &[&str]) -> bool {
        self.tags.is_empty() || self.tags.iter().any(|t| tags.contains(&t.as_str()))
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source shaped like the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let wait_confirmations = match lookup(ENV_WAIT_CONFIRMATIONS) {
            Some(raw) => parse_confirmations(&raw).map_err(Error::Config)?,
            None => DEFAULT_WAIT_CONFIRMATIONS,
        };
        let flags = LifecycleFlags {
            close: is_truthy(lookup(ENV_CLOSE).as_deref().unwrap_or_default()),
            finalize: is_truthy(lookup(ENV_FINALIZE).as_deref().unwrap_or_default()),
        };
        let tags = lookup(ENV_TAGS).unwrap_or_default();
        Ok(Self::new(
            lookup(ENV_FQN).as_deref(),
            wait_confirmations,
            flags,
        )
        .with_tags(tags.split(',')))
    }

    /// Artifact ids to try for `contract`, highest priority first.
    pub fn candidates(&self, contract: &str) -> Vec<String> {
        let mut candidates = Vec::with_capacity(5);
        if let Some(fqn) = &self.fqn_override {
            candidates.push(fqn.clone());
        }
        candidates.push(contract.to_string());
        for dir in ["contracts", "contracts/auction", "src"] {
            candidates.push(format!("{dir}/{contract}.sol:{contract}"));
        }
        candidates
    }
}

/// `"1"` and `"true"` (any case) switch a flag on; everything else leaves it off.
pub fn is_truthy(raw: &str) -> bool {
    matches!(raw.to_lowercase().as_str(), "1" | "true")
}

pub fn parse_switch(raw: &str) -> std::result::Result<bool, String> {
    Ok(is_truthy(raw))
}

pub fn parse_confirmations(raw: &str) -> std::result::Result<u64, String> {
    raw.trim().parse::<u64>().map_err(|_| {
        format!("{ENV_WAIT_CONFIRMATIONS} must be a non-negative integer, got {raw:?}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_truthy_values() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("True"));
        assert!(!is_truthy(""));
        assert!(!is_truthy("yes"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy(" true"));
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = DeployConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, DeployConfig::default());
        assert_eq!(config.wait_confirmations, 1);
        assert!(!config.flags.any());
    }

    #[test]
    fn test_reads_all_variables() {
        let config = DeployConfig::from_lookup(lookup(&[
            ("FQN", "  contracts/X.sol:SecretMinBidAuction "),
            ("WAIT_CONFIRMATIONS", "3"),
            ("CLOSE", "true"),
            ("FINALIZE", "1"),
        ]))
        .unwrap();
        assert_eq!(
            config.fqn_override.as_deref(),
            Some("contracts/X.sol:SecretMinBidAuction")
        );
        assert_eq!(config.wait_confirmations, 3);
        assert_eq!(config.flags, LifecycleFlags { close: true, finalize: true });
    }

    #[test]
    fn test_blank_fqn_is_ignored() {
        let config = DeployConfig::from_lookup(lookup(&[("FQN", "   ")])).unwrap();
        assert!(config.fqn_override.is_none());
    }

    #[test]
    fn test_invalid_confirmations_rejected() {
        let err = DeployConfig::from_lookup(lookup(&[("WAIT_CONFIRMATIONS", "two")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(parse_confirmations("-1").is_err());
        assert_eq!(parse_confirmations(" 2 "), Ok(2));
    }

    #[test]
    fn test_tag_selection() {
        assert!(DeployConfig::default().selects(&["SecretMinBidAuction"]));

        let config = DeployConfig::from_lookup(lookup(&[("DEPLOY_TAGS", "Token, SecretMinBidAuction,")])).unwrap();
        assert_eq!(config.tags, vec!["Token", "SecretMinBidAuction"]);
        assert!(config.selects(&["SecretMinBidAuction"]));

        let other = DeployConfig::default().with_tags(["Token"]);
        assert!(!other.selects(&["SecretMinBidAuction"]));
    }

    #[test]
    fn test_candidates_order() {
        let config = DeployConfig::new(Some("custom/A.sol:A"), 1, LifecycleFlags::default());
        assert_eq!(
            config.candidates("SecretMinBidAuction"),
            vec![
                "custom/A.sol:A",
                "SecretMinBidAuction",
                "contracts/SecretMinBidAuction.sol:SecretMinBidAuction",
                "contracts/auction/SecretMinBidAuction.sol:SecretMinBidAuction",
                "src/SecretMinBidAuction.sol:SecretMinBidAuction",
            ]
        );
        assert_eq!(DeployConfig::default().candidates("SecretMinBidAuction").len(), 4);
    }
}
