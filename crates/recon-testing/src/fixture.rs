// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Builders for table values used across tests.

use recon_core::{KeyInfo, RepeatedKeyInfo, ReplicationConfig, TableValue};

/// An open key with one part per entry of `parts`.
pub fn open_key(name: &str, replication: ReplicationConfig, parts: &[u64]) -> KeyInfo {
	parts.iter().fold(KeyInfo::new("vol", "bucket", name, replication), |key, length| key.with_part(*length))
}

/// An open key replicated three times.
pub fn ratis_key(name: &str, parts: &[u64]) -> TableValue {
	TableValue::Key(open_key(name, ReplicationConfig::ratis_three(), parts))
}

/// A deleted key holding one version per entry of `version_sizes`, each a single part.
pub fn deleted_key(name: &str, replication: ReplicationConfig, version_sizes: &[u64]) -> TableValue {
	TableValue::Deleted(RepeatedKeyInfo::new(
		version_sizes.iter().map(|size| open_key(name, replication, &[*size])).collect(),
	))
}

pub fn raw(bytes: &[u8]) -> TableValue {
	TableValue::Raw(bytes.to_vec())
}
