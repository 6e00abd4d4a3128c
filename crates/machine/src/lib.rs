use strum::Display;
use thiserror::Error;

pub mod catalog;
pub mod format;
pub mod guard;
pub mod native;
pub mod state;
pub mod util;

pub use catalog::{decode, get_pattern, InstructionPattern, Operation, INSTRUCTION_PATTERNS};
pub use guard::{ReservedRegion, RESERVED_REGIONS};
pub use native::{Crisp8, RunStats};
pub use state::MachineState;

pub const MEMORY_SIZE: usize = 0x1000;
pub const ROM_OFFSET: u16 = 0x0200;
pub const REGISTER_COUNT: usize = 16;
pub const STACK_SIZE: usize = 16;
pub const FLAG_REGISTER: usize = 0xF;

/// Bytes per line of the memory dump.
pub const LINE_LENGTH: usize = 16;

/// Test ROMs jump here to signal that they are done.
pub const HALT_ADDRESS: u16 = 0x0111;
pub const CYCLE_LIMIT: usize = 10_000;

/// Failures caused by ROM content running into the machine rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unrecognized opcode {opcode:#06X} at address {address:#06X}")]
    UnrecognizedOpcode { opcode: u16, address: u16 },
    #[error("Cannot access address {0:#06X}: out of bounds")]
    OutOfBounds(u32),
    #[error("Cannot access address {address:#06X}: reserved: {reason}")]
    Reserved { address: u32, reason: &'static str },
}

/// Failures that point at a defect in the engine itself. No ROM should be
/// able to trigger these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InternalError {
    #[error("Value {value} does not fit in a byte")]
    InvalidByte { value: u32 },
    #[error("ROM of {length} bytes does not fit in {capacity} bytes of program memory")]
    RomTooLarge { length: usize, capacity: usize },
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Domain,
    Internal,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("Crisp8Error: {0}")]
    Domain(#[from] DomainError),
    #[error("Crisp8InternalError: {0}")]
    Internal(#[from] InternalError),
}

impl ExecutionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExecutionError::Domain(_) => ErrorKind::Domain,
            ExecutionError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn is_domain(&self) -> bool {
        self.kind() == ErrorKind::Domain
    }
}
