//! EIP-712 structured-data hashing.
//!
//! Any deviation in the type string or the field encoding changes the digest and
//! every signature the registry verifies with it.

use std::collections::BTreeSet;

use ethereum_types::U256;
use serde_json::{Map, Value};

use super::{TypedData, Types};
use crate::error::SdkError;
use crate::shared::{keccak256, Address};

/// `keccak256(0x19 0x01 ‖ domainSeparator ‖ hashStruct(primaryType, message))`.
pub fn typed_data_hash(data: &TypedData) -> Result<[u8; 32], SdkError> {
    let domain_separator = data.domain_separator()?;
    let struct_hash = hash_struct(&data.types, &data.primary_type, &data.message)?;
    Ok(eip712_digest(&domain_separator, &struct_hash))
}

/// Combine a domain separator and a struct hash into the signable digest.
pub fn eip712_digest(domain_separator: &[u8; 32], struct_hash: &[u8; 32]) -> [u8; 32] {
    let mut encoded = Vec::with_capacity(2 + 32 + 32);
    encoded.extend_from_slice(b"\x19\x01");
    encoded.extend_from_slice(domain_separator);
    encoded.extend_from_slice(struct_hash);
    keccak256(encoded)
}

/// `keccak256(typeHash ‖ encodeData(values))`.
pub fn hash_struct(
    types: &Types,
    primary_type: &str,
    values: &Map<String, Value>,
) -> Result<[u8; 32], SdkError> {
    let type_hash = keccak256(encode_type(types, primary_type)?.as_bytes());
    let fields = schema(types, primary_type)?;

    let mut encoded = Vec::with_capacity(32 * (fields.len() + 1));
    encoded.extend_from_slice(&type_hash);
    for field in fields {
        let value = values.get(&field.name).ok_or_else(|| {
            SdkError::TypedData(format!(
                "missing field '{}' of {}",
                field.name, primary_type
            ))
        })?;
        encoded.extend_from_slice(&encode_value(types, &field.kind, value)?);
    }
    Ok(keccak256(encoded))
}

/// `Name(type1 name1,type2 name2)` followed by referenced struct types sorted by name.
pub fn encode_type(types: &Types, primary_type: &str) -> Result<String, SdkError> {
    let mut deps = BTreeSet::new();
    collect_dependencies(types, primary_type, &mut deps)?;
    deps.remove(primary_type);

    let mut out = format_struct(types, primary_type)?;
    for dep in &deps {
        out.push_str(&format_struct(types, dep)?);
    }
    Ok(out)
}

fn schema<'a>(types: &'a Types, name: &str) -> Result<&'a [super::TypedField], SdkError> {
    types
        .get(name)
        .map(Vec::as_slice)
        .ok_or_else(|| SdkError::TypedData(format!("unknown type '{}'", name)))
}

fn format_struct(types: &Types, name: &str) -> Result<String, SdkError> {
    let fields = schema(types, name)?
        .iter()
        .map(|f| format!("{} {}", f.kind, f.name))
        .collect::<Vec<_>>()
        .join(",");
    Ok(format!("{}({})", name, fields))
}

fn collect_dependencies(
    types: &Types,
    name: &str,
    found: &mut BTreeSet<String>,
) -> Result<(), SdkError> {
    if found.contains(name) {
        return Ok(());
    }
    let fields = schema(types, name)?;
    found.insert(name.to_string());
    for field in fields {
        let base = base_type(&field.kind);
        if types.contains_key(base) {
            collect_dependencies(types, base, found)?;
        }
    }
    Ok(())
}

/// Strip any array suffix: `Person[]` → `Person`.
fn base_type(kind: &str) -> &str {
    kind.find('[').map_or(kind, |i| &kind[..i])
}

fn encode_value(types: &Types, kind: &str, value: &Value) -> Result<[u8; 32], SdkError> {
    if kind.ends_with(']') {
        return Err(SdkError::TypedData(format!(
            "array type '{}' is not supported",
            kind
        )));
    }

    if types.contains_key(kind) {
        let object = value
            .as_object()
            .ok_or_else(|| mismatch(kind, value))?;
        return hash_struct(types, kind, object);
    }

    match kind {
        "string" => {
            let s = value.as_str().ok_or_else(|| mismatch(kind, value))?;
            Ok(keccak256(s.as_bytes()))
        }
        "bytes" => {
            let s = value.as_str().ok_or_else(|| mismatch(kind, value))?;
            Ok(keccak256(decode_hex(s)?))
        }
        "address" => {
            let s = value.as_str().ok_or_else(|| mismatch(kind, value))?;
            Ok(Address::parse(s)?.to_word())
        }
        "bool" => {
            let b = value.as_bool().ok_or_else(|| mismatch(kind, value))?;
            Ok(u256_word(U256::from(b as u8)))
        }
        _ if kind.starts_with("bytes") => {
            let size = type_size(kind, "bytes", 32)?;
            if size == 0 || size > 32 {
                return Err(SdkError::TypedData(format!("invalid type '{}'", kind)));
            }
            let s = value.as_str().ok_or_else(|| mismatch(kind, value))?;
            let raw = decode_hex(s)?;
            if raw.len() != size {
                return Err(SdkError::TypedData(format!(
                    "{} expects {} bytes, got {}",
                    kind,
                    size,
                    raw.len()
                )));
            }
            let mut word = [0u8; 32];
            word[..size].copy_from_slice(&raw);
            Ok(word)
        }
        _ if kind.starts_with("uint") => {
            let bits = int_width(kind, "uint")?;
            let n = parse_uint(kind, value)?;
            if n.bits() > bits {
                return Err(SdkError::TypedData(format!(
                    "value {} overflows {}",
                    n, kind
                )));
            }
            Ok(u256_word(n))
        }
        _ if kind.starts_with("int") => {
            let bits = int_width(kind, "int")?;
            encode_int(kind, bits, value)
        }
        _ => Err(SdkError::TypedData(format!("unknown type '{}'", kind))),
    }
}

fn type_size(kind: &str, prefix: &str, default: usize) -> Result<usize, SdkError> {
    let suffix = &kind[prefix.len()..];
    if suffix.is_empty() {
        return Ok(default);
    }
    suffix
        .parse()
        .map_err(|_| SdkError::TypedData(format!("invalid type '{}'", kind)))
}

/// Bit width of `uintN`/`intN`; N must be a multiple of 8 in 8..=256.
fn int_width(kind: &str, prefix: &str) -> Result<usize, SdkError> {
    let bits = type_size(kind, prefix, 256)?;
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(SdkError::TypedData(format!("invalid type '{}'", kind)));
    }
    Ok(bits)
}

/// Decimal string, `0x` hex string, or JSON integer.
fn parse_uint(kind: &str, value: &Value) -> Result<U256, SdkError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(U256::from)
            .ok_or_else(|| mismatch(kind, value)),
        Value::String(s) => {
            let parsed = match s.strip_prefix("0x") {
                Some(hex) => U256::from_str_radix(hex, 16).ok(),
                None => U256::from_dec_str(s).ok(),
            };
            parsed.ok_or_else(|| mismatch(kind, value))
        }
        _ => Err(mismatch(kind, value)),
    }
}

/// Two's-complement word for signed integers that fit in `i128`.
fn encode_int(kind: &str, bits: usize, value: &Value) -> Result<[u8; 32], SdkError> {
    let n: i128 = match value {
        Value::Number(n) => n.as_i64().map(i128::from),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
    .ok_or_else(|| mismatch(kind, value))?;

    if bits < 128 {
        let limit = 1i128 << (bits - 1);
        if n < -limit || n >= limit {
            return Err(SdkError::TypedData(format!("value {} overflows {}", n, kind)));
        }
    }

    let mut word = if n < 0 { [0xffu8; 32] } else { [0u8; 32] };
    word[16..].copy_from_slice(&n.to_be_bytes());
    Ok(word)
}

fn u256_word(n: U256) -> [u8; 32] {
    let mut word = [0u8; 32];
    n.to_big_endian(&mut word);
    word
}

fn decode_hex(s: &str) -> Result<Vec<u8>, SdkError> {
    hex::decode(s.strip_prefix("0x").unwrap_or(s))
        .map_err(|e| SdkError::TypedData(format!("invalid hex '{}': {}", s, e)))
}

fn mismatch(kind: &str, value: &Value) -> SdkError {
    SdkError::TypedData(format!("value {} is not a valid {}", value, kind))
}
