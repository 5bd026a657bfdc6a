// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};

/// How the blocks of a key are made redundant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplicationConfig {
	/// Full copies, `factor` of them.
	Ratis {
		factor: u8,
	},
	/// Reed-Solomon style striping over `data` chunks plus `parity` chunks.
	ErasureCoded {
		data: u8,
		parity: u8,
		chunk_size: u64,
	},
}

impl ReplicationConfig {
	pub const fn ratis_one() -> Self {
		ReplicationConfig::Ratis {
			factor: 1,
		}
	}

	pub const fn ratis_three() -> Self {
		ReplicationConfig::Ratis {
			factor: 3,
		}
	}

	/// Number of bytes physically written for `data_size` bytes of user data.
	pub fn replicated_size(&self, data_size: u64) -> u64 {
		match *self {
			ReplicationConfig::Ratis {
				factor,
			} => data_size.saturating_mul(factor as u64),
			ReplicationConfig::ErasureCoded {
				data,
				parity,
				chunk_size,
			} => {
				if data == 0 || chunk_size == 0 {
					return data_size;
				}
				let stripe = (data as u64).saturating_mul(chunk_size);
				let full_stripes = data_size / stripe;
				// a partial stripe still carries parity for its first chunk
				let partial_first_chunk = chunk_size.min(data_size % stripe);
				let overhead = full_stripes
					.saturating_mul(parity as u64)
					.saturating_mul(chunk_size)
					.saturating_add(partial_first_chunk.saturating_mul(parity as u64));
				data_size.saturating_add(overhead)
			}
		}
	}
}

impl Default for ReplicationConfig {
	fn default() -> Self {
		Self::ratis_three()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const MB: u64 = 1024 * 1024;

	#[test]
	fn test_ratis_multiplies_by_factor() {
		assert_eq!(ReplicationConfig::ratis_three().replicated_size(100), 300);
		assert_eq!(ReplicationConfig::ratis_one().replicated_size(100), 100);
	}

	#[test]
	fn test_ec_full_and_partial_stripes() {
		let rs_3_2 = ReplicationConfig::ErasureCoded {
			data: 3,
			parity: 2,
			chunk_size: MB,
		};
		// one full stripe (3 + 2 chunks) and a partial stripe of 2 data chunks plus 2 parity
		assert_eq!(rs_3_2.replicated_size(5 * MB), 9 * MB);
		// exactly one stripe
		assert_eq!(rs_3_2.replicated_size(3 * MB), 5 * MB);
		// less than a chunk still pays full parity for that chunk's length
		assert_eq!(rs_3_2.replicated_size(100), 300);
	}

	#[test]
	fn test_ec_empty() {
		let rs_6_3 = ReplicationConfig::ErasureCoded {
			data: 6,
			parity: 3,
			chunk_size: MB,
		};
		assert_eq!(rs_6_3.replicated_size(0), 0);
	}
}
