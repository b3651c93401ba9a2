//! Compiled contract artifacts.
//!
//! Accepts Hardhat artifacts (`"bytecode": "0x..."`) and Foundry artifacts
//! (`"bytecode": { "object": "0x..." }`).

use std::path::{Path, PathBuf};

use alloy::primitives::{hex, Bytes};
use serde::Deserialize;

use crate::error::{ContractError, Result};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(String),
    Object { object: String },
}

#[derive(Deserialize)]
struct RawArtifact {
    #[serde(default, rename = "contractName")]
    contract_name: Option<String>,
    bytecode: RawBytecode,
}

/// Creation bytecode of one contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub path: PathBuf,
    pub bytecode: Bytes,
}

impl Artifact {
    /// Read an artifact file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ContractError::Artifact {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json(path, &json)
    }

    /// Parse artifact JSON. `path` is used for the name fallback and errors.
    pub fn from_json(path: impl AsRef<Path>, json: &str) -> Result<Self> {
        let path = path.as_ref();
        let invalid = |reason: String| ContractError::Artifact {
            path: path.to_path_buf(),
            reason,
        };

        let raw: RawArtifact = serde_json::from_str(json).map_err(|e| invalid(e.to_string()))?;
        let code = match &raw.bytecode {
            RawBytecode::Hex(code) | RawBytecode::Object { object: code } => code,
        };
        if code.contains("__") {
            return Err(invalid("bytecode has unlinked library placeholders".to_string()));
        }
        let bytecode = hex::decode(code).map_err(|e| invalid(format!("bad bytecode hex: {e}")))?;
        if bytecode.is_empty() {
            return Err(invalid("missing bytecode (abstract contract or interface?)".to_string()));
        }

        let name = raw.contract_name.unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "contract".to_string())
        });

        Ok(Self {
            name,
            path: path.to_path_buf(),
            bytecode: bytecode.into(),
        })
    }

    /// Creation code followed by ABI-encoded constructor arguments.
    pub fn deploy_code(&self, constructor_args: &[u8]) -> Bytes {
        let mut code = Vec::with_capacity(self.bytecode.len() + constructor_args.len());
        code.extend_from_slice(&self.bytecode);
        code.extend_from_slice(constructor_args);
        code.into()
    }
}
