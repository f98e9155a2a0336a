//! Compiled contract artifacts on disk.
//!
//! Two layouts are understood: hardhat (`artifacts/<source path>/<Name>.json`)
//! and foundry (`out/<File.sol>/<Name>.json`). An identifier is either a bare
//! contract name or a fully-qualified `path/File.sol:Name`.

use alloy::dyn_abi::{DynSolValue, JsonAbiExt};
use alloy::json_abi::JsonAbi;
use alloy::primitives::Bytes;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactId {
    Qualified { source: String, name: String },
    Bare(String),
}

impl ArtifactId {
    pub fn parse(id: &str) -> Self {
        match id.rsplit_once(':') {
            Some((source, name)) => ArtifactId::Qualified {
                source: source.to_string(),
                name: name.to_string(),
            },
            None => ArtifactId::Bare(id.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ArtifactId::Qualified { name, .. } => name,
            ArtifactId::Bare(name) => name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Artifact {
    pub contract_name: String,
    pub source_name: Option<String>,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(Bytes),
    Object { object: Bytes },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    contract_name: Option<String>,
    source_name: Option<String>,
    abi: JsonAbi,
    bytecode: RawBytecode,
}

impl Artifact {
    pub fn new(contract_name: &str, abi: JsonAbi, bytecode: Bytes) -> Self {
        Self {
            contract_name: contract_name.to_string(),
            source_name: None,
            abi,
            bytecode,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidArtifact {
            path: path.display().to_string(),
            reason,
        };
        let content = std::fs::read_to_string(path)?;
        let raw: RawArtifact =
            serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;

        let bytecode = match raw.bytecode {
            RawBytecode::Hex(bytes) => bytes,
            RawBytecode::Object { object } => object,
        };
        if bytecode.is_empty() {
            return Err(invalid("empty bytecode, contract is abstract or an interface".into()));
        }

        // foundry artifacts carry no contractName, the file stem is the name
        let contract_name = match raw.contract_name {
            Some(name) => name,
            None => path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
                .ok_or_else(|| invalid("cannot derive contract name".into()))?,
        };

        Ok(Self {
            contract_name,
            source_name: raw.source_name,
            abi: raw.abi,
            bytecode,
        })
    }

    /// Creation code with ABI-encoded constructor arguments appended.
    pub fn creation_code(&self, args: &[DynSolValue]) -> Result<Bytes> {
        let mut code = self.bytecode.to_vec();
        match self.abi.constructor() {
            Some(constructor) => {
                let encoded = constructor.abi_encode_input(args).map_err(Error::abi)?;
                code.extend_from_slice(&encoded);
            }
            None if !args.is_empty() => {
                return Err(Error::Abi(format!(
                    "{} has no constructor but {} arguments were given",
                    self.contract_name,
                    args.len()
                )));
            }
            None => {}
        }
        Ok(code.into())
    }

    pub fn bytecode_hash(code: &[u8]) -> String {
        hex::encode(Sha256::digest(code))
    }
}

/// Looks artifacts up under a list of build output directories.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    roots: Vec<PathBuf>,
}

impl ArtifactStore {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    pub fn find(&self, id: &str) -> Result<Artifact> {
        let path = match ArtifactId::parse(id) {
            ArtifactId::Qualified { source, name } => self.find_qualified(id, &source, &name)?,
            ArtifactId::Bare(name) => self.find_bare(&name)?,
        };
        tracing::debug!("artifact {} resolved to {}", id, path.display());
        Artifact::from_file(&path)
    }

    fn find_qualified(&self, id: &str, source: &str, name: &str) -> Result<PathBuf> {
        let file_name = format!("{name}.json");
        let source_file = Path::new(source).file_name();
        for root in &self.roots {
            let hardhat = root.join(source).join(&file_name);
            if hardhat.is_file() {
                return Ok(hardhat);
            }
            if let Some(source_file) = source_file {
                let foundry = root.join(source_file).join(&file_name);
                if foundry.is_file() {
                    return Ok(foundry);
                }
            }
        }
        Err(Error::UnknownArtifact(id.to_string()))
    }

    fn find_bare(&self, name: &str) -> Result<PathBuf> {
        let file_name = format!("{name}.json");
        let mut matches: Vec<PathBuf> = Vec::new();
        for root in self.roots.iter().filter(|root| root.is_dir()) {
            let entries = WalkDir::new(root)
                .into_iter()
                .filter_entry(|entry| entry.file_name() != "build-info")
                .filter_map(|entry| entry.ok());
            for entry in entries {
                if entry.file_type().is_file() && entry.file_name().to_str() == Some(file_name.as_str()) {
                    matches.push(entry.into_path());
                }
            }
        }

        match matches.len() {
            0 => Err(Error::UnknownArtifact(name.to_string())),
            1 => Ok(matches.remove(0)),
            _ => Err(Error::AmbiguousArtifact {
                name: name.to_string(),
                matches: matches.iter().map(|p| p.display().to_string()).collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_identifier() {
        assert_eq!(
            ArtifactId::parse("contracts/A.sol:A"),
            ArtifactId::Qualified {
                source: "contracts/A.sol".into(),
                name: "A".into()
            }
        );
        assert_eq!(ArtifactId::parse("A"), ArtifactId::Bare("A".into()));
        assert_eq!(ArtifactId::parse("contracts/A.sol:A").name(), "A");
    }

    #[test]
    fn test_creation_code_without_constructor() {
        let artifact = Artifact::new("A", JsonAbi::default(), Bytes::from_static(&[0x60, 0x80]));
        let code = artifact.creation_code(&[]).unwrap();
        assert_eq!(code.as_ref(), &[0x60, 0x80]);
        assert!(artifact.creation_code(&[DynSolValue::Bool(true)]).is_err());
    }

    #[test]
    fn test_bytecode_hash_is_stable() {
        let a = Artifact::bytecode_hash(&[1, 2, 3]);
        assert_eq!(a, Artifact::bytecode_hash(&[1, 2, 3]));
        assert_ne!(a, Artifact::bytecode_hash(&[1, 2, 4]));
        assert_eq!(a.len(), 64);
    }
}
