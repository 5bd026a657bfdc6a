// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use recon_core::{Error, KeyInfo, RepeatedKeyInfo, Result, TableValue};

/// Encoding used for the values of one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
	/// postcard encoded [`KeyInfo`]
	Key,
	/// postcard encoded [`RepeatedKeyInfo`]
	Deleted,
	/// opaque bytes
	Raw,
}

pub fn encode_value(format: ValueFormat, value: &TableValue) -> Result<Vec<u8>> {
	match (format, value) {
		(ValueFormat::Key, TableValue::Key(key)) => {
			postcard::to_stdvec(key).map_err(|e| Error::Codec(format!("failed to encode key info: {e}")))
		}
		(ValueFormat::Deleted, TableValue::Deleted(deleted)) => postcard::to_stdvec(deleted)
			.map_err(|e| Error::Codec(format!("failed to encode deleted key info: {e}"))),
		(ValueFormat::Raw, TableValue::Raw(bytes)) => Ok(bytes.clone()),
		(format, value) => {
			Err(Error::Codec(format!("cannot store a {} value in a {:?} table", value.kind_name(), format)))
		}
	}
}

pub fn decode_value(format: ValueFormat, bytes: &[u8]) -> Result<TableValue> {
	match format {
		ValueFormat::Key => postcard::from_bytes::<KeyInfo>(bytes)
			.map(TableValue::Key)
			.map_err(|e| Error::Codec(format!("failed to decode key info: {e}"))),
		ValueFormat::Deleted => postcard::from_bytes::<RepeatedKeyInfo>(bytes)
			.map(TableValue::Deleted)
			.map_err(|e| Error::Codec(format!("failed to decode deleted key info: {e}"))),
		ValueFormat::Raw => Ok(TableValue::Raw(bytes.to_vec())),
	}
}

#[cfg(test)]
mod tests {
	use recon_core::ReplicationConfig;

	use super::*;

	#[test]
	fn test_key_info_codec() {
		let value = TableValue::Key(
			KeyInfo::new("vol", "bucket", "key", ReplicationConfig::ratis_three()).with_part(7).with_part(9),
		);
		let encoded = encode_value(ValueFormat::Key, &value).unwrap();
		assert_eq!(decode_value(ValueFormat::Key, &encoded).unwrap(), value);
	}

	#[test]
	fn test_format_mismatch_is_rejected() {
		let value = TableValue::Raw(vec![1, 2, 3]);
		let err = encode_value(ValueFormat::Deleted, &value).unwrap_err();
		assert!(matches!(err, Error::Codec(_)));
	}

	#[test]
	fn test_corrupt_bytes_fail_to_decode() {
		let err = decode_value(ValueFormat::Key, &[0xFF, 0xFF, 0xFF]).unwrap_err();
		assert!(matches!(err, Error::Codec(_)));
	}
}
