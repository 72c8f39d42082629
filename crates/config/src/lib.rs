// MemLab - Memory Conformance Harness
// Copyright (C) 2026 The MemLab Authors
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default schema version for YAML configs
fn default_schema_version() -> String {
    "1.0".to_string()
}

fn default_space_size() -> String {
    "32KiB".to_string()
}

/// Byte order of multi-byte accesses within an address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    #[default]
    #[serde(alias = "le")]
    Little,
    #[serde(alias = "be")]
    Big,
}

/// Describes the flat address space a conformance case runs against.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpaceDescriptor {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    pub name: String,
    #[serde(default = "default_space_size")]
    pub size: String, // e.g. "32KiB"
    #[serde(default)]
    pub endianness: Endianness,
}

impl Default for SpaceDescriptor {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            name: "flat32k".to_string(),
            size: default_space_size(),
            endianness: Endianness::Little,
        }
    }
}

impl SpaceDescriptor {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = std::fs::File::open(&path)
            .with_context(|| format!("Failed to open space descriptor at {:?}", path.as_ref()))?;
        let desc: Self =
            serde_yaml::from_reader(f).context("Failed to parse Space Descriptor YAML")?;
        desc.validate()?;
        Ok(desc)
    }

    pub fn validate(&self) -> Result<()> {
        if self.schema_version != "1.0" {
            anyhow::bail!(
                "Unsupported schema_version '{}'. Supported versions: '1.0'",
                self.schema_version
            );
        }

        let size = parse_size(&self.size)?;
        if size == 0 {
            anyhow::bail!("Space size must be greater than zero");
        }
        if size % 2 != 0 {
            anyhow::bail!(
                "Space size must be a whole number of halfwords, got {} bytes",
                size
            );
        }

        Ok(())
    }

    pub fn size_bytes(&self) -> Result<u64> {
        parse_size(&self.size)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct CaseInputs {
    /// Registered scenario name, e.g. "halfword-copy".
    pub scenario: String,
    /// Optional path to a space descriptor (relative to the script).
    #[serde(default)]
    pub space: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct CaseLimits {
    /// Upper bound on journaled transactions for one run.
    pub max_accesses: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Runner failed before the scenario started (e.g. script parse/validation error).
    ConfigError,
    /// Completion signal raised; memory is ready for inspection.
    Completion,
    /// Scenario returned without raising the completion signal.
    NoSignal,
    /// Completion signal raised more than once.
    DuplicateSignal,
    MemoryViolation,
    MisalignedAccess,
    MaxAccesses,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct MemoryValueDetails {
    pub address: u64,
    pub expected_value: u64,
    #[serde(default)]
    pub mask: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct MemoryValueAssertion {
    pub memory_value: MemoryValueDetails,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct StopReasonAssertion {
    pub expected_stop_reason: StopReason,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct SignalCodeAssertion {
    pub signal_code: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ChecksumAssertion {
    pub checksum: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum CaseAssertion {
    MemoryValue(MemoryValueAssertion),
    ExpectedStopReason(StopReasonAssertion),
    SignalCode(SignalCodeAssertion),
    Checksum(ChecksumAssertion),
}

/// A CI conformance-case script.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct CaseScript {
    pub schema_version: String,
    pub inputs: CaseInputs,
    pub limits: CaseLimits,
    #[serde(default)]
    pub assertions: Vec<CaseAssertion>,
}

impl CaseScript {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = std::fs::File::open(&path)
            .with_context(|| format!("Failed to open case script at {:?}", path.as_ref()))?;
        let script: Self =
            serde_yaml::from_reader(f).context("Failed to parse Case Script YAML")?;
        script.validate()?;
        Ok(script)
    }

    pub fn validate(&self) -> Result<()> {
        if self.schema_version != "1.0" {
            anyhow::bail!(
                "Unsupported schema_version '{}'. Supported versions: '1.0'",
                self.schema_version
            );
        }

        if self.inputs.scenario.trim().is_empty() {
            anyhow::bail!("Input 'scenario' name cannot be empty");
        }

        if self.limits.max_accesses == 0 {
            anyhow::bail!("Limit 'max_accesses' must be greater than zero");
        }

        Ok(())
    }
}

pub fn parse_size(size_str: &str) -> Result<u64> {
    use human_size::{Byte, Size, SpecificSize};
    let s: Size = size_str
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid size format: {}", e))?;
    let bytes: SpecificSize<Byte> = s.into();
    Ok(bytes.value() as u64)
}
