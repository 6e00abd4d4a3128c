use crate::{InternalError, MEMORY_SIZE, REGISTER_COUNT, ROM_OFFSET, STACK_SIZE};

/// Architectural state of one machine. Holds no validation logic; guarded
/// access lives in [`crate::guard`] and the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineState {
    pub(crate) memory: [u8; MEMORY_SIZE],
    pub(crate) registers: [u8; REGISTER_COUNT],
    pub(crate) index_register: u16,
    pub(crate) program_counter: u16,

    // No instruction in the supported set calls or returns yet.
    pub(crate) stack: [u8; STACK_SIZE],
    pub(crate) stack_index: i8,
}

impl Default for MachineState {
    fn default() -> Self {
        Self {
            memory: [0; MEMORY_SIZE],
            registers: [0; REGISTER_COUNT],
            index_register: 0,
            program_counter: ROM_OFFSET,
            stack: [0; STACK_SIZE],
            stack_index: -1,
        }
    }
}

impl MachineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Bulk copy of `rom` to [`ROM_OFFSET`]. Bypasses the address guard.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), InternalError> {
        let start = ROM_OFFSET as usize;
        let capacity = MEMORY_SIZE - start;
        if rom.len() > capacity {
            return Err(InternalError::RomTooLarge {
                length: rom.len(),
                capacity,
            });
        }
        self.memory[start..start + rom.len()].copy_from_slice(rom);
        Ok(())
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    pub fn registers(&self) -> &[u8] {
        &self.registers
    }

    pub fn index_register(&self) -> u16 {
        self.index_register
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn stack(&self) -> &[u8] {
        &self.stack
    }

    pub fn stack_index(&self) -> i8 {
        self.stack_index
    }
}
