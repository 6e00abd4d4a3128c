use std::collections::HashMap;

use once_cell::sync::Lazy;
use strum::{Display, EnumIter};

#[derive(Debug, Display, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash, EnumIter)]
pub enum Operation {
    //
    // 1MMM: Flow control
    //
    Jump,

    //
    // 6XNN - 7XNN: Literals
    //
    LoadValue,
    AddValue,

    //
    // 8XYn: Register to register
    //
    Move,
    Or,
    And,
    Xor,
    Add,
    Sub,
    ShiftRight,
    SubReversed,
    ShiftLeft,

    //
    // CXNN: Random
    //
    Random,

    //
    // ANNN, FXnn: Index register and memory
    //
    LoadIndex,
    AddIndex,
    StoreBcd,
    StoreRegisters,
    LoadRegisters,
}

#[derive(Debug, Clone)]
pub struct InstructionPattern {
    pub operation: Operation,
    pub mask: u16,
    pub value: u16,
    pub mnemonic: &'static str,
}

impl InstructionPattern {
    const fn new(operation: Operation, mask: u16, value: u16, mnemonic: &'static str) -> Self {
        Self {
            operation,
            mask,
            value,
            mnemonic,
        }
    }

    pub fn matches(&self, opcode: u16) -> bool {
        opcode & self.mask == self.value
    }
}

/// Decode order. Masks are disjoint, so order only decides which pattern
/// is tried first.
pub static PATTERNS: &[InstructionPattern] = &[
    InstructionPattern::new(Operation::Jump, 0xF000, 0x1000, "jp"),
    InstructionPattern::new(Operation::LoadValue, 0xF000, 0x6000, "ld"),
    InstructionPattern::new(Operation::AddValue, 0xF000, 0x7000, "add"),
    InstructionPattern::new(Operation::Move, 0xF00F, 0x8000, "ld"),
    InstructionPattern::new(Operation::Or, 0xF00F, 0x8001, "or"),
    InstructionPattern::new(Operation::And, 0xF00F, 0x8002, "and"),
    InstructionPattern::new(Operation::Xor, 0xF00F, 0x8003, "xor"),
    InstructionPattern::new(Operation::Add, 0xF00F, 0x8004, "add"),
    InstructionPattern::new(Operation::Sub, 0xF00F, 0x8005, "sub"),
    InstructionPattern::new(Operation::SubReversed, 0xF00F, 0x8007, "subn"),
    InstructionPattern::new(Operation::ShiftRight, 0xF00F, 0x8006, "shr"),
    InstructionPattern::new(Operation::ShiftLeft, 0xF00F, 0x800E, "shl"),
    InstructionPattern::new(Operation::Random, 0xF000, 0xC000, "rnd"),
    InstructionPattern::new(Operation::LoadIndex, 0xF000, 0xA000, "ld i"),
    InstructionPattern::new(Operation::AddIndex, 0xF0FF, 0xF01E, "add i"),
    InstructionPattern::new(Operation::StoreBcd, 0xF0FF, 0xF033, "bcd"),
    InstructionPattern::new(Operation::StoreRegisters, 0xF0FF, 0xF055, "ld [i]"),
    InstructionPattern::new(Operation::LoadRegisters, 0xF0FF, 0xF065, "ld v, [i]"),
];

pub static INSTRUCTION_PATTERNS: Lazy<HashMap<Operation, &'static InstructionPattern>> =
    Lazy::new(|| {
        let mut map = HashMap::new();
        for pattern in PATTERNS {
            map.insert(pattern.operation, pattern);
        }
        map
    });

pub fn get_pattern(operation: Operation) -> Option<&'static InstructionPattern> {
    INSTRUCTION_PATTERNS.get(&operation).copied()
}

pub fn decode(opcode: u16) -> Option<&'static InstructionPattern> {
    PATTERNS.iter().find(|pattern| pattern.matches(opcode))
}

/// Operand fields of an instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fields(pub u16);

impl Fields {
    pub fn x(self) -> usize {
        ((self.0 & 0x0F00) >> 8) as usize
    }

    pub fn y(self) -> usize {
        ((self.0 & 0x00F0) >> 4) as usize
    }

    pub fn nn(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    pub fn nnn(self) -> u16 {
        self.0 & 0x0FFF
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_all_covered() {
        for operation in Operation::iter() {
            assert!(
                get_pattern(operation).is_some(),
                "Pattern not implemented for operation: {operation:?}"
            );
        }
    }

    #[test]
    fn test_patterns_are_disjoint() {
        for opcode in 0..=u16::MAX {
            let hits = PATTERNS.iter().filter(|p| p.matches(opcode)).count();
            assert!(hits <= 1, "{opcode:#06x} matches {hits} patterns");
        }
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode(0x6005).unwrap().operation, Operation::LoadValue);
        assert_eq!(decode(0x8014).unwrap().operation, Operation::Add);
        assert_eq!(decode(0x8AB7).unwrap().operation, Operation::SubReversed);
        assert_eq!(decode(0xF233).unwrap().operation, Operation::StoreBcd);
        assert_eq!(decode(0x1111).unwrap().operation, Operation::Jump);
    }

    #[test]
    fn test_unsupported_words() {
        for opcode in [0x0000, 0x00E0, 0x00EE, 0x2300, 0x3000, 0x8008, 0xD123, 0xE09E, 0xF007] {
            assert!(decode(opcode).is_none(), "{opcode:#06x} should not decode");
        }
    }

    #[test]
    fn test_fields() {
        let fields = Fields(0x8AB4);
        assert_eq!(fields.x(), 0xA);
        assert_eq!(fields.y(), 0xB);
        assert_eq!(fields.nn(), 0xB4);
        assert_eq!(fields.nnn(), 0xAB4);
    }
}
