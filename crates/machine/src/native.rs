use byteorder::{BigEndian, ByteOrder};
use log::{debug, trace};
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

use crate::{
    catalog::{decode, Fields, Operation},
    format,
    guard::validate,
    state::MachineState,
    util::{bcd_digits, narrow_byte},
    DomainError, ExecutionError, InternalError, FLAG_REGISTER, MEMORY_SIZE,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub cycles: usize,
    pub halted: bool,
}

/// The decode/execute engine. `R` feeds the `CXNN` instruction.
#[derive(Debug)]
pub struct Crisp8<R: RngCore = StdRng> {
    state: MachineState,
    rng: R,
}

impl Crisp8<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> Crisp8<R> {
    pub fn new(rng: R) -> Self {
        let mut machine = Self {
            state: MachineState::new(),
            rng,
        };
        machine.reset();
        machine
    }

    pub fn reset(&mut self) {
        debug!("reset");
        self.state.reset();
    }

    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), ExecutionError> {
        debug!("loading {} byte ROM", rom.len());
        Ok(self.state.load_rom(rom)?)
    }

    pub fn program_counter(&self) -> u16 {
        self.state.program_counter
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn debug_string(&self) -> String {
        format::debug_string(&self.state)
    }

    /// Steps until the program counter reaches `address` or `cycle_limit`
    /// instructions have run.
    pub fn run_until(
        &mut self,
        address: u16,
        cycle_limit: usize,
    ) -> Result<RunStats, ExecutionError> {
        let mut stats = RunStats::default();
        while stats.cycles < cycle_limit {
            self.step()?;
            stats.cycles += 1;
            if self.state.program_counter == address {
                stats.halted = true;
                break;
            }
        }
        Ok(stats)
    }

    fn fetch(&self, address: u16) -> Result<u16, DomainError> {
        let start = address as usize;
        match self.state.memory.get(start..start + 2) {
            Some(bytes) => Ok(BigEndian::read_u16(bytes)),
            None => Err(DomainError::OutOfBounds(start.max(MEMORY_SIZE) as u32)),
        }
    }

    fn register(&self, index: usize) -> u32 {
        self.state.registers[index] as u32
    }

    fn set_register(&mut self, index: usize, value: u32) -> Result<(), InternalError> {
        self.state.registers[index] = narrow_byte(value)?;
        Ok(())
    }

    fn set_flag(&mut self, set: bool) -> Result<(), InternalError> {
        self.set_register(FLAG_REGISTER, set as u32)
    }

    /// Addresses `I..I+length`, all checked before any of them is touched.
    fn guarded_span(&self, length: usize) -> Result<std::ops::Range<u32>, DomainError> {
        let start = self.state.index_register as u32;
        let span = start..start + length as u32;
        for address in span.clone() {
            validate(address)?;
        }
        Ok(span)
    }

    pub fn step(&mut self) -> Result<(), ExecutionError> {
        let address = self.state.program_counter;
        let opcode = self.fetch(address)?;
        let pattern =
            decode(opcode).ok_or(DomainError::UnrecognizedOpcode { opcode, address })?;

        trace!("{address:#06X}: {opcode:04X} {}", pattern.mnemonic);

        let fields = Fields(opcode);
        let (x, y) = (fields.x(), fields.y());

        match pattern.operation {
            Operation::Jump => {
                self.state.program_counter = fields.nnn();
                return Ok(());
            }
            Operation::LoadValue => {
                self.set_register(x, fields.nn() as u32)?;
            }
            Operation::AddValue => {
                let sum = self.register(x) + fields.nn() as u32;
                self.set_register(x, sum % 256)?;
            }
            Operation::Move => {
                self.set_register(x, self.register(y))?;
            }
            Operation::Or => {
                self.set_register(x, self.register(x) | self.register(y))?;
            }
            Operation::And => {
                self.set_register(x, self.register(x) & self.register(y))?;
            }
            Operation::Xor => {
                self.set_register(x, self.register(x) ^ self.register(y))?;
            }
            Operation::Add => {
                let sum = self.register(x) + self.register(y);
                self.set_register(x, sum % 256)?;
                self.set_flag(sum >= 256)?;
            }
            Operation::Sub | Operation::SubReversed => {
                let (minuend, subtrahend) = if pattern.operation == Operation::Sub {
                    (self.register(x), self.register(y))
                } else {
                    (self.register(y), self.register(x))
                };
                let borrow = minuend < subtrahend;
                let difference = if borrow {
                    minuend + 256 - subtrahend
                } else {
                    minuend - subtrahend
                };
                self.set_register(x, difference)?;
                self.set_flag(borrow)?;
            }
            Operation::ShiftRight => {
                self.set_register(x, self.register(y) >> 1)?;
            }
            Operation::ShiftLeft => {
                self.set_register(x, (self.register(y) << 1) & 0xFF)?;
            }
            Operation::Random => {
                let value = self.rng.gen::<u8>() & fields.nn();
                self.set_register(x, value as u32)?;
            }
            Operation::LoadIndex => {
                self.state.index_register = fields.nnn();
            }
            Operation::AddIndex => {
                let mut sum = self.state.index_register as u32 + self.register(x);
                let overflow = sum >= MEMORY_SIZE as u32;
                if overflow {
                    sum -= MEMORY_SIZE as u32;
                }
                self.state.index_register = sum as u16;
                self.set_flag(overflow)?;
            }
            Operation::StoreBcd => {
                let digits = bcd_digits(self.register(x), 3);
                let span = self.guarded_span(digits.len())?;
                for (address, digit) in span.zip(digits) {
                    self.state.write_memory(address, digit as u32)?;
                }
            }
            Operation::StoreRegisters => {
                let span = self.guarded_span(x + 1)?;
                for (index, address) in span.enumerate() {
                    let value = self.register(index);
                    self.state.write_memory(address, value)?;
                }
            }
            Operation::LoadRegisters => {
                let span = self.guarded_span(x + 1)?;
                for (index, address) in span.enumerate() {
                    let value = self.state.read_memory(address)?;
                    self.set_register(index, value as u32)?;
                }
            }
        }

        self.state.program_counter += 2;
        Ok(())
    }
}
