//! Selector hashing and call-data encoding/decoding against function descriptors.

mod codec;
pub mod types;
pub mod value;

pub use self::types::ParamType;
pub use self::value::AbiValue;

use alloy_primitives::keccak256;

use crate::signature::{FunctionDescriptor, FunctionParam};

/// Errors raised while encoding or decoding call data
#[derive(Debug, thiserror::Error)]
pub enum AbiError {
    /// A parameter type string is not a supported ABI type
    #[error("Unsupported parameter type: {0:?}")]
    UnsupportedType(String),

    /// Call data is empty but the descriptor expects arguments
    #[error("Call data is empty but {expected} arguments are expected")]
    EmptyData {
        /// Number of expected arguments
        expected: usize,
    },

    /// A read ran past the end of the data
    #[error("Read at offset {offset} is out of bounds (data length {len})")]
    OutOfBounds {
        /// Offset of the attempted read
        offset: usize,
        /// Length of the data being read
        len: usize,
    },

    /// An offset or length word does not point inside the data
    #[error("Invalid offset or length word at {at}")]
    InvalidOffset {
        /// Offset of the offending word
        at: usize,
    },

    /// A boolean word is neither 0 nor 1
    #[error("Invalid boolean encoding at {at}")]
    InvalidBool {
        /// Offset of the offending word
        at: usize,
    },

    /// Padding bytes of a value are not zero
    #[error("Non-zero padding for {ty} at {at}")]
    DirtyPadding {
        /// Type being decoded
        ty: String,
        /// Offset of the offending word
        at: usize,
    },

    /// An integer does not fit the declared width
    #[error("Value does not fit {ty}")]
    ValueOutOfRange {
        /// Declared type
        ty: String,
    },

    /// A string payload is not valid UTF-8
    #[error("Invalid UTF-8 in string payload: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A value does not match the type it is encoded as
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Declared type
        expected: String,
        /// Kind of the supplied value
        found: String,
    },

    /// Wrong number of values for a parameter list
    #[error("Expected {expected} values, found {found}")]
    ArityMismatch {
        /// Number of declared parameters
        expected: usize,
        /// Number of supplied values
        found: usize,
    },
}

/// Selector of a canonical signature: the first 4 bytes of its Keccak-256 hash.
pub fn selector_of(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash[..4]);
    selector
}

/// Parse the type strings of a parameter list.
pub fn param_types(params: &[FunctionParam]) -> Result<Vec<ParamType>, AbiError> {
    params.iter().map(|p| ParamType::parse(&p.ty)).collect()
}

/// Decode a head/tail encoded sequence of `types`.
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<AbiValue>, AbiError> {
    if data.is_empty() && !types.is_empty() {
        return Err(AbiError::EmptyData { expected: types.len() });
    }
    codec::decode_sequence(types, data)
}

/// Encode `values` as a head/tail sequence of `types`.
pub fn encode(types: &[ParamType], values: &[AbiValue]) -> Result<Vec<u8>, AbiError> {
    let refs: Vec<&ParamType> = types.iter().collect();
    let mut out = Vec::new();
    codec::encode_sequence(&refs, values, &mut out)?;
    Ok(out)
}

/// Decode call-data arguments of `descriptor`.
///
/// With `strip_selector` set, a leading copy of the descriptor's own selector
/// is skipped; any other prefix is decoded as part of the arguments.
pub fn decode_arguments(
    descriptor: &FunctionDescriptor,
    data: &[u8],
    strip_selector: bool,
) -> Result<Vec<AbiValue>, AbiError> {
    let types = param_types(descriptor.inputs())?;
    let body = if strip_selector && data.starts_with(&descriptor.selector()) {
        &data[4..]
    } else {
        data
    };
    decode(&types, body)
}

/// Decode the return data of `descriptor`.
pub fn decode_outputs(descriptor: &FunctionDescriptor, data: &[u8]) -> Result<Vec<AbiValue>, AbiError> {
    let types = param_types(descriptor.outputs())?;
    decode(&types, data)
}

/// Encode the arguments of `descriptor` without a selector.
pub fn encode_arguments(descriptor: &FunctionDescriptor, values: &[AbiValue]) -> Result<Vec<u8>, AbiError> {
    let types = param_types(descriptor.inputs())?;
    encode(&types, values)
}

/// Encode full call data: selector followed by the arguments.
pub fn encode_call(descriptor: &FunctionDescriptor, values: &[AbiValue]) -> Result<Vec<u8>, AbiError> {
    let mut out = descriptor.selector().to_vec();
    out.extend(encode_arguments(descriptor, values)?);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::parse_signature;
    use alloy_primitives::{address, Address, U256};

    const TRANSFER_ARGS: &str = "0000000000000000000000005a5b644fb1a3ca046317fe82bc695fff7bacf30c0000000000000000000000000000000000000000000002a568d6215ac1400000";

    fn expected_transfer() -> Vec<AbiValue> {
        vec![
            AbiValue::Address(address!("5A5b644FB1A3ca046317fE82BC695FfF7bACF30C")),
            AbiValue::Uint(U256::from(12496000000000000000000u128)),
        ]
    }

    #[test]
    fn test_selector_of() {
        assert_eq!(selector_of("totalSupply()"), [0x18, 0x16, 0x0d, 0xdd]);
        assert_eq!(selector_of("totalSupply()"), selector_of("totalSupply()"));
        assert_eq!(hex::encode(selector_of("transfer(address,uint256)")), "a9059cbb");
        assert_eq!(hex::encode(selector_of("balanceOf(address)")), "70a08231");
    }

    #[test]
    fn test_decode_transfer_with_selector() {
        let descriptor = parse_signature("transfer(address to, uint256 amount)");
        let data = hex::decode(format!("a9059cbb{}", TRANSFER_ARGS)).unwrap();

        let values = decode_arguments(&descriptor, &data, true).unwrap();
        assert_eq!(values, expected_transfer());
    }

    #[test]
    fn test_decode_transfer_without_selector() {
        let descriptor = parse_signature("transfer(address to, uint256 amount)");
        let data = hex::decode(TRANSFER_ARGS).unwrap();

        assert_eq!(decode_arguments(&descriptor, &data, false).unwrap(), expected_transfer());
        // stripping is a no-op when the prefix is not the selector
        assert_eq!(decode_arguments(&descriptor, &data, true).unwrap(), expected_transfer());
    }

    #[test]
    fn test_decode_anonymous_signature() {
        let descriptor = parse_signature("transfer(address, uint256)");
        let data = hex::decode(format!("a9059cbb{}", TRANSFER_ARGS)).unwrap();
        assert_eq!(decode_arguments(&descriptor, &data, true).unwrap(), expected_transfer());
    }

    #[test]
    fn test_selector_not_stripped_when_disabled() {
        let descriptor = parse_signature("transfer(address,uint256)");
        let data = hex::decode(format!("a9059cbb{}", TRANSFER_ARGS)).unwrap();
        // the selector shifts every word, leaving dirty address padding
        assert!(decode_arguments(&descriptor, &data, false).is_err());
    }

    #[test]
    fn test_empty_data() {
        let descriptor = parse_signature("transfer(address,uint256)");
        assert!(matches!(
            decode_arguments(&descriptor, &[], true),
            Err(AbiError::EmptyData { expected: 2 })
        ));

        let no_args = parse_signature("totalSupply()");
        assert_eq!(decode_arguments(&no_args, &[0x18, 0x16, 0x0d, 0xdd], true).unwrap(), vec![]);
    }

    #[test]
    fn test_round_trip_static_and_dynamic() {
        let descriptor = parse_signature("mixed(uint256,address,bool,string,bytes,uint256[])");
        let values = vec![
            AbiValue::Uint(U256::MAX),
            AbiValue::Address(Address::repeat_byte(0xab)),
            AbiValue::Bool(true),
            AbiValue::String("hello, world".to_string()),
            AbiValue::Bytes((0u8..40).collect()),
            AbiValue::Array(vec![AbiValue::Uint(U256::from(1u64)), AbiValue::Uint(U256::from(2u64))]),
        ];

        let call = encode_call(&descriptor, &values).unwrap();
        assert_eq!(&call[..4], &descriptor.selector());
        assert_eq!(decode_arguments(&descriptor, &call, true).unwrap(), values);

        let args = encode_arguments(&descriptor, &values).unwrap();
        let decoded = decode_arguments(&descriptor, &args, false).unwrap();
        assert_eq!(encode_arguments(&descriptor, &decoded).unwrap(), args);
    }

    #[test]
    fn test_decode_outputs() {
        let descriptor = parse_signature("balanceOf(address)");
        let mut data = vec![0u8; 32];
        data[31] = 9;
        assert_eq!(decode_outputs(&descriptor, &data).unwrap(), vec![AbiValue::Uint(U256::from(9u64))]);
    }

    #[test]
    fn test_unsupported_param_type() {
        let descriptor = parse_signature("weird(fixed128x18)");
        assert!(matches!(
            decode_arguments(&descriptor, &[0u8; 32], false),
            Err(AbiError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_oversized_signature_types_rejected() {
        let mut data = vec![0u8; 64];
        data[31] = 0x20; // offset of an empty array

        let overflowing = parse_signature("f(uint256[600000000000000000][])");
        assert!(matches!(
            decode_arguments(&overflowing, &data, false),
            Err(AbiError::UnsupportedType(ty)) if ty == "uint256[600000000000000000]"
        ));

        let empty_tuples = parse_signature("g(()[100000000])");
        assert!(matches!(
            decode_arguments(&empty_tuples, &[0u8; 32], false),
            Err(AbiError::UnsupportedType(_))
        ));
        assert!(matches!(
            encode_arguments(&empty_tuples, &[AbiValue::FixedArray(vec![])]),
            Err(AbiError::UnsupportedType(_))
        ));
    }
}
