//! Model summary reported by `circle info`

use circle_reader::{Model, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSummary {
    pub version: u32,
    pub description: Option<String>,
    pub sha256: String,
    pub subgraphs: usize,
    pub tensors: usize,
    pub operators: usize,
    pub operator_codes: usize,
    pub buffers: usize,
}

impl ModelSummary {
    /// Summarize `model`, hashing the file bytes it was decoded from
    pub fn from_model(model: &Model<'_>, bytes: &[u8]) -> Result<Self> {
        let mut tensors = 0;
        let mut operators = 0;
        let subgraphs = model.subgraphs()?;
        for subgraph in subgraphs.iter() {
            let subgraph = subgraph?;
            tensors += subgraph.tensors()?.len();
            operators += subgraph.operators()?.len();
        }

        Ok(Self {
            version: model.version()?,
            description: model.description()?.map(str::to_string),
            sha256: sha256_hex(bytes),
            subgraphs: subgraphs.len(),
            tensors,
            operators,
            operator_codes: model.operator_codes()?.len(),
            buffers: model.buffers()?.len(),
        })
    }
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "schema version: {}", self.version)?;
        if let Some(description) = &self.description {
            writeln!(f, "description:    {}", description)?;
        }
        writeln!(f, "sha256:         {}", self.sha256)?;
        writeln!(f, "subgraphs:      {}", self.subgraphs)?;
        writeln!(f, "tensors:        {}", self.tensors)?;
        writeln!(f, "operators:      {}", self.operators)?;
        writeln!(f, "operator codes: {}", self.operator_codes)?;
        write!(f, "buffers:        {}", self.buffers)
    }
}

/// Lowercase hex SHA-256 digest
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(sha256_hex(&[]).len(), 64);
    }
}
