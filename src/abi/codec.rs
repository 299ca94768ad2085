//! Head/tail ABI encoding and decoding.
//!
//! A sequence of values is laid out as a head region followed by a tail
//! region. Static values live inline in the head; dynamic values put a byte
//! offset into the head, relative to the start of the sequence, that points at
//! their payload in the tail. Offsets in errors are relative to the sequence
//! being decoded.

use std::iter;

use alloy_primitives::{Address, I256, U256};

use super::types::{ParamType, WORD};
use super::{AbiError, AbiValue};

/// Decode consecutive values of `types` from `base`.
pub(crate) fn decode_sequence<'t, I>(types: I, base: &[u8]) -> Result<Vec<AbiValue>, AbiError>
where
    I: IntoIterator<Item = &'t ParamType>,
{
    let mut values = Vec::new();
    let mut head = 0usize;

    for ty in types {
        let value = if ty.is_dynamic() {
            let offset = read_usize(base, head)?;
            decode_value(ty, base, offset)?
        } else {
            decode_value(ty, base, head)?
        };
        values.push(value);
        head = head.checked_add(head_size(ty)?).ok_or_else(|| unsupported(ty))?;
    }

    Ok(values)
}

/// Decode one value of type `ty` whose encoding starts at `at` within `base`.
fn decode_value(ty: &ParamType, base: &[u8], at: usize) -> Result<AbiValue, AbiError> {
    match ty {
        ParamType::Uint(bits) => {
            let word = read_word(base, at)?;
            let value = U256::from_be_bytes(word);
            if value.bit_len() > *bits {
                return Err(AbiError::ValueOutOfRange { ty: ty.to_string() });
            }
            Ok(AbiValue::Uint(value))
        }
        ParamType::Int(bits) => {
            let word = read_word(base, at)?;
            if !check_sign_extension(*bits, &word) {
                return Err(AbiError::ValueOutOfRange { ty: ty.to_string() });
            }
            Ok(AbiValue::Int(I256::from_raw(U256::from_be_bytes(word))))
        }
        ParamType::Bool => {
            let word = read_word(base, at)?;
            if word[..WORD - 1].iter().any(|b| *b != 0) || word[WORD - 1] > 1 {
                return Err(AbiError::InvalidBool { at });
            }
            Ok(AbiValue::Bool(word[WORD - 1] == 1))
        }
        ParamType::Address => {
            let word = read_word(base, at)?;
            if word[..12].iter().any(|b| *b != 0) {
                return Err(AbiError::DirtyPadding { ty: ty.to_string(), at });
            }
            Ok(AbiValue::Address(Address::from_slice(&word[12..])))
        }
        ParamType::FixedBytes(len) => {
            let word = read_word(base, at)?;
            if word[*len..].iter().any(|b| *b != 0) {
                return Err(AbiError::DirtyPadding { ty: ty.to_string(), at });
            }
            Ok(AbiValue::FixedBytes(word[..*len].to_vec()))
        }
        ParamType::Bytes => Ok(AbiValue::Bytes(read_payload(base, at)?.to_vec())),
        ParamType::String => {
            let payload = read_payload(base, at)?.to_vec();
            Ok(AbiValue::String(String::from_utf8(payload)?))
        }
        ParamType::Array(inner) => {
            let len = read_usize(base, at)?;
            let items = slice_from(base, at + WORD)?;
            // every element needs at least one head word
            let needed = len.checked_mul(head_size(inner)?).ok_or(AbiError::InvalidOffset { at })?;
            if needed > items.len() {
                return Err(AbiError::OutOfBounds { offset: at + WORD, len: base.len() });
            }
            let values = decode_sequence(iter::repeat(inner.as_ref()).take(len), items)?;
            Ok(AbiValue::Array(values))
        }
        ParamType::FixedArray(inner, len) => {
            let items = slice_from(base, at)?;
            let element = head_size(inner)?;
            if element == 0 {
                return Err(unsupported(ty));
            }
            // never build more elements than the data can hold
            let needed = element.checked_mul(*len).ok_or_else(|| unsupported(ty))?;
            if needed > items.len() {
                return Err(AbiError::OutOfBounds { offset: at, len: base.len() });
            }
            let values = decode_sequence(iter::repeat(inner.as_ref()).take(*len), items)?;
            Ok(AbiValue::FixedArray(values))
        }
        ParamType::Tuple(members) => {
            let items = slice_from(base, at)?;
            Ok(AbiValue::Tuple(decode_sequence(members, items)?))
        }
    }
}

/// Encode `values` as one head/tail sequence of `types`, appending to `out`.
pub(crate) fn encode_sequence(
    types: &[&ParamType],
    values: &[AbiValue],
    out: &mut Vec<u8>,
) -> Result<(), AbiError> {
    if types.len() != values.len() {
        return Err(AbiError::ArityMismatch {
            expected: types.len(),
            found: values.len(),
        });
    }

    let head_len = types.iter().try_fold(0usize, |total, ty| {
        total.checked_add(head_size(ty)?).ok_or_else(|| unsupported(ty))
    })?;
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for (ty, value) in types.iter().zip(values) {
        if ty.is_dynamic() {
            head.extend_from_slice(&usize_word(head_len + tail.len()));
            encode_value(ty, value, &mut tail)?;
        } else {
            encode_value(ty, value, &mut head)?;
        }
    }

    out.extend_from_slice(&head);
    out.extend_from_slice(&tail);
    Ok(())
}

fn encode_value(ty: &ParamType, value: &AbiValue, out: &mut Vec<u8>) -> Result<(), AbiError> {
    match (ty, value) {
        (ParamType::Uint(bits), AbiValue::Uint(v)) => {
            if v.bit_len() > *bits {
                return Err(AbiError::ValueOutOfRange { ty: ty.to_string() });
            }
            out.extend_from_slice(&v.to_be_bytes::<WORD>());
        }
        (ParamType::Int(bits), AbiValue::Int(v)) => {
            let word = v.into_raw().to_be_bytes::<WORD>();
            if !check_sign_extension(*bits, &word) {
                return Err(AbiError::ValueOutOfRange { ty: ty.to_string() });
            }
            out.extend_from_slice(&word);
        }
        (ParamType::Bool, AbiValue::Bool(v)) => {
            let mut word = [0u8; WORD];
            word[WORD - 1] = u8::from(*v);
            out.extend_from_slice(&word);
        }
        (ParamType::Address, AbiValue::Address(addr)) => {
            out.extend_from_slice(&[0u8; 12]);
            out.extend_from_slice(addr.as_slice());
        }
        (ParamType::FixedBytes(len), AbiValue::FixedBytes(bytes)) if bytes.len() == *len => {
            out.extend_from_slice(&padded(bytes));
        }
        (ParamType::Bytes, AbiValue::Bytes(bytes)) => {
            out.extend_from_slice(&usize_word(bytes.len()));
            out.extend_from_slice(&padded(bytes));
        }
        (ParamType::String, AbiValue::String(s)) => {
            out.extend_from_slice(&usize_word(s.len()));
            out.extend_from_slice(&padded(s.as_bytes()));
        }
        (ParamType::Array(inner), AbiValue::Array(items)) => {
            out.extend_from_slice(&usize_word(items.len()));
            let types: Vec<&ParamType> = iter::repeat(inner.as_ref()).take(items.len()).collect();
            encode_sequence(&types, items, out)?;
        }
        (ParamType::FixedArray(inner, len), AbiValue::FixedArray(items)) if items.len() == *len => {
            let types: Vec<&ParamType> = iter::repeat(inner.as_ref()).take(*len).collect();
            encode_sequence(&types, items, out)?;
        }
        (ParamType::Tuple(members), AbiValue::Tuple(items)) => {
            let types: Vec<&ParamType> = members.iter().collect();
            encode_sequence(&types, items, out)?;
        }
        _ => {
            return Err(AbiError::TypeMismatch {
                expected: ty.to_string(),
                found: value.kind().to_string(),
            })
        }
    }
    Ok(())
}

/// True if the bytes above the low `bits` of `word` are the sign extension.
fn check_sign_extension(bits: usize, word: &[u8; WORD]) -> bool {
    let width = bits / 8;
    if width >= WORD {
        return true;
    }
    let sign = if word[WORD - width] & 0x80 != 0 { 0xff } else { 0x00 };
    word[..WORD - width].iter().all(|b| *b == sign)
}

/// Head size of `ty`, rejecting types whose head does not fit in memory.
fn head_size(ty: &ParamType) -> Result<usize, AbiError> {
    ty.head_size().ok_or_else(|| unsupported(ty))
}

fn unsupported(ty: &ParamType) -> AbiError {
    AbiError::UnsupportedType(ty.to_string())
}

fn read_word(base: &[u8], at: usize) -> Result<[u8; WORD], AbiError> {
    let slice = at
        .checked_add(WORD)
        .and_then(|end| base.get(at..end))
        .ok_or(AbiError::OutOfBounds { offset: at, len: base.len() })?;
    let mut word = [0u8; WORD];
    word.copy_from_slice(slice);
    Ok(word)
}

/// Read a word holding an offset or a length.
fn read_usize(base: &[u8], at: usize) -> Result<usize, AbiError> {
    let word = read_word(base, at)?;
    if word[..WORD - 8].iter().any(|b| *b != 0) {
        return Err(AbiError::InvalidOffset { at });
    }
    let mut low = [0u8; 8];
    low.copy_from_slice(&word[WORD - 8..]);
    let value = usize::try_from(u64::from_be_bytes(low)).map_err(|_| AbiError::InvalidOffset { at })?;
    if value > base.len() {
        return Err(AbiError::InvalidOffset { at });
    }
    Ok(value)
}

/// Length-prefixed payload of `bytes` / `string` starting at `at`.
fn read_payload(base: &[u8], at: usize) -> Result<&[u8], AbiError> {
    let len = read_usize(base, at)?;
    let start = at + WORD;
    start
        .checked_add(len)
        .and_then(|end| base.get(start..end))
        .ok_or(AbiError::OutOfBounds { offset: start, len: base.len() })
}

fn slice_from(base: &[u8], at: usize) -> Result<&[u8], AbiError> {
    base.get(at..).ok_or(AbiError::OutOfBounds { offset: at, len: base.len() })
}

fn usize_word(value: usize) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&(value as u64).to_be_bytes());
    word
}

/// Right-pad `bytes` with zeros to a multiple of the word size.
fn padded(bytes: &[u8]) -> Vec<u8> {
    let mut out = bytes.to_vec();
    let rem = out.len() % WORD;
    if rem != 0 {
        out.resize(out.len() + WORD - rem, 0);
    }
    out
}
