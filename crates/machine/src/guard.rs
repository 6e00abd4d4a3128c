use std::ops::RangeInclusive;

use once_cell::sync::Lazy;

use crate::{
    state::MachineState, util::narrow_byte, DomainError, ExecutionError, MEMORY_SIZE,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedRegion {
    pub start: u32,
    pub end: u32,
    pub reason: &'static str,
}

impl ReservedRegion {
    const fn new(start: u32, end: u32, reason: &'static str) -> Self {
        Self { start, end, reason }
    }

    pub fn range(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }

    pub fn contains(&self, address: u32) -> bool {
        self.range().contains(&address)
    }

    fn overlaps(&self, other: &ReservedRegion) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Address ranges no guarded access may touch, in diagnostic order.
pub static RESERVED_REGIONS: Lazy<Vec<ReservedRegion>> = Lazy::new(|| {
    static REGIONS: &[ReservedRegion] = &[
        ReservedRegion::new(0x000, 0x1FF, "interpreter"),
        ReservedRegion::new(0xEA0, 0xEFF, "call stack / runtime variables"),
        ReservedRegion::new(0xF00, 0xFFF, "display"),
    ];

    for (i, region) in REGIONS.iter().enumerate() {
        assert!(region.start <= region.end, "inverted region {region:?}");
        for other in &REGIONS[i + 1..] {
            assert!(
                !region.overlaps(other),
                "reserved regions {region:?} and {other:?} overlap"
            );
        }
    }

    REGIONS.to_vec()
});

pub fn reserved_region(address: u32) -> Option<&'static ReservedRegion> {
    RESERVED_REGIONS.iter().find(|region| region.contains(address))
}

pub fn validate(address: u32) -> Result<(), DomainError> {
    if address as usize >= MEMORY_SIZE {
        return Err(DomainError::OutOfBounds(address));
    }
    if let Some(region) = reserved_region(address) {
        return Err(DomainError::Reserved {
            address,
            reason: region.reason,
        });
    }
    Ok(())
}

impl MachineState {
    pub fn read_memory(&self, address: u32) -> Result<u8, ExecutionError> {
        validate(address)?;
        Ok(self.memory[address as usize])
    }

    /// The value is checked before the address: a malformed byte is an
    /// engine defect whatever the ROM asked for.
    pub fn write_memory(&mut self, address: u32, value: u32) -> Result<(), ExecutionError> {
        let byte = narrow_byte(value)?;
        validate(address)?;
        self.memory[address as usize] = byte;
        Ok(())
    }
}
