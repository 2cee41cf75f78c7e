//! Parsing helpers for command line values.

use byte_unit::Byte;
use std::str::FromStr;

/// Parses a human readable size such as `"500MB"` or `"1GiB"` into bytes.
pub fn parse_string_to_bytes_size(s: &str) -> Result<u64, String> {
	Byte::from_str(s)
		.map(|byte| byte.as_u64())
		.map_err(|e| format!("Invalid size format: '{}'. Error: {}", s, e))
}
