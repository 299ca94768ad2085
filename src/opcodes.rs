//! Static EVM instruction table.
//!
//! The table is total over all 256 byte values. Opcodes that are not part of
//! the instruction set map to an explicit undefined descriptor so callers never
//! have to deal with a missing entry.

use std::fmt;

/// Mnemonic used for every opcode that is not a legal instruction.
pub const UNDEFINED_MNEMONIC: &str = "UNDEFINED";

/// First push opcode carrying an immediate (`PUSH1`).
pub const PUSH1: u8 = 0x60;
/// `PUSH4`, the width of a function selector.
pub const PUSH4: u8 = 0x63;
/// `PUSH32`, a full word immediate.
pub const PUSH32: u8 = 0x7f;

/// Descriptor of a single EVM instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    /// Opcode byte
    pub opcode: u8,
    /// Mnemonic (e.g., "PUSH4", "CALLDATALOAD")
    pub mnemonic: &'static str,
    /// Number of immediate bytes following the opcode
    pub immediate_len: u8,
    defined: bool,
}

impl Instruction {
    const fn new(opcode: u8, mnemonic: &'static str, immediate_len: u8) -> Self {
        Self {
            opcode,
            mnemonic,
            immediate_len,
            defined: true,
        }
    }

    const fn undefined(opcode: u8) -> Self {
        Self {
            opcode,
            mnemonic: UNDEFINED_MNEMONIC,
            immediate_len: 0,
            defined: false,
        }
    }

    /// Returns true if the opcode is a legal EVM instruction
    pub fn is_defined(&self) -> bool {
        self.defined
    }

    /// Returns true for `PUSH0` through `PUSH32`
    pub fn is_push(&self) -> bool {
        self.defined && (0x5f..=PUSH32).contains(&self.opcode)
    }

    /// Total encoded size (opcode plus immediate) in bytes
    pub fn size(&self) -> usize {
        1 + self.immediate_len as usize
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.defined {
            write!(f, "{}", self.mnemonic)
        } else {
            write!(f, "{}(0x{:02x})", self.mnemonic, self.opcode)
        }
    }
}

const PUSH_MNEMONICS: [&str; 32] = [
    "PUSH1", "PUSH2", "PUSH3", "PUSH4", "PUSH5", "PUSH6", "PUSH7", "PUSH8",
    "PUSH9", "PUSH10", "PUSH11", "PUSH12", "PUSH13", "PUSH14", "PUSH15", "PUSH16",
    "PUSH17", "PUSH18", "PUSH19", "PUSH20", "PUSH21", "PUSH22", "PUSH23", "PUSH24",
    "PUSH25", "PUSH26", "PUSH27", "PUSH28", "PUSH29", "PUSH30", "PUSH31", "PUSH32",
];

const DUP_MNEMONICS: [&str; 16] = [
    "DUP1", "DUP2", "DUP3", "DUP4", "DUP5", "DUP6", "DUP7", "DUP8",
    "DUP9", "DUP10", "DUP11", "DUP12", "DUP13", "DUP14", "DUP15", "DUP16",
];

const SWAP_MNEMONICS: [&str; 16] = [
    "SWAP1", "SWAP2", "SWAP3", "SWAP4", "SWAP5", "SWAP6", "SWAP7", "SWAP8",
    "SWAP9", "SWAP10", "SWAP11", "SWAP12", "SWAP13", "SWAP14", "SWAP15", "SWAP16",
];

const LOG_MNEMONICS: [&str; 5] = ["LOG0", "LOG1", "LOG2", "LOG3", "LOG4"];

/// Mnemonic and immediate length for a legal opcode (Cancun instruction set).
const fn describe(op: u8) -> Option<(&'static str, u8)> {
    let entry = match op {
        0x00 => "STOP",
        0x01 => "ADD",
        0x02 => "MUL",
        0x03 => "SUB",
        0x04 => "DIV",
        0x05 => "SDIV",
        0x06 => "MOD",
        0x07 => "SMOD",
        0x08 => "ADDMOD",
        0x09 => "MULMOD",
        0x0a => "EXP",
        0x0b => "SIGNEXTEND",

        0x10 => "LT",
        0x11 => "GT",
        0x12 => "SLT",
        0x13 => "SGT",
        0x14 => "EQ",
        0x15 => "ISZERO",
        0x16 => "AND",
        0x17 => "OR",
        0x18 => "XOR",
        0x19 => "NOT",
        0x1a => "BYTE",
        0x1b => "SHL",
        0x1c => "SHR",
        0x1d => "SAR",

        0x20 => "KECCAK256",

        0x30 => "ADDRESS",
        0x31 => "BALANCE",
        0x32 => "ORIGIN",
        0x33 => "CALLER",
        0x34 => "CALLVALUE",
        0x35 => "CALLDATALOAD",
        0x36 => "CALLDATASIZE",
        0x37 => "CALLDATACOPY",
        0x38 => "CODESIZE",
        0x39 => "CODECOPY",
        0x3a => "GASPRICE",
        0x3b => "EXTCODESIZE",
        0x3c => "EXTCODECOPY",
        0x3d => "RETURNDATASIZE",
        0x3e => "RETURNDATACOPY",
        0x3f => "EXTCODEHASH",

        0x40 => "BLOCKHASH",
        0x41 => "COINBASE",
        0x42 => "TIMESTAMP",
        0x43 => "NUMBER",
        0x44 => "PREVRANDAO",
        0x45 => "GASLIMIT",
        0x46 => "CHAINID",
        0x47 => "SELFBALANCE",
        0x48 => "BASEFEE",
        0x49 => "BLOBHASH",
        0x4a => "BLOBBASEFEE",

        0x50 => "POP",
        0x51 => "MLOAD",
        0x52 => "MSTORE",
        0x53 => "MSTORE8",
        0x54 => "SLOAD",
        0x55 => "SSTORE",
        0x56 => "JUMP",
        0x57 => "JUMPI",
        0x58 => "PC",
        0x59 => "MSIZE",
        0x5a => "GAS",
        0x5b => "JUMPDEST",
        0x5c => "TLOAD",
        0x5d => "TSTORE",
        0x5e => "MCOPY",
        0x5f => "PUSH0",

        0x60..=0x7f => {
            let n = op - 0x5f;
            return Some((PUSH_MNEMONICS[(n - 1) as usize], n));
        }
        0x80..=0x8f => DUP_MNEMONICS[(op - 0x80) as usize],
        0x90..=0x9f => SWAP_MNEMONICS[(op - 0x90) as usize],
        0xa0..=0xa4 => LOG_MNEMONICS[(op - 0xa0) as usize],

        0xf0 => "CREATE",
        0xf1 => "CALL",
        0xf2 => "CALLCODE",
        0xf3 => "RETURN",
        0xf4 => "DELEGATECALL",
        0xf5 => "CREATE2",
        0xfa => "STATICCALL",
        0xfd => "REVERT",
        0xfe => "INVALID",
        0xff => "SELFDESTRUCT",

        _ => return None,
    };
    Some((entry, 0))
}

const fn build_table() -> [Instruction; 256] {
    let mut table = [Instruction::undefined(0); 256];
    let mut i = 0;
    while i < 256 {
        let op = i as u8;
        table[i] = match describe(op) {
            Some((mnemonic, immediate_len)) => Instruction::new(op, mnemonic, immediate_len),
            None => Instruction::undefined(op),
        };
        i += 1;
    }
    table
}

/// Opcode → instruction descriptor, indexed by opcode byte.
pub static INSTRUCTION_TABLE: [Instruction; 256] = build_table();

/// Look up the descriptor for `opcode`.
pub fn instruction(opcode: u8) -> &'static Instruction {
    &INSTRUCTION_TABLE[opcode as usize]
}
