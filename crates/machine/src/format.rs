use byteorder::{BigEndian, ByteOrder};

use crate::{
    state::MachineState,
    util::{hex_address, is_zeroed},
    LINE_LENGTH,
};

const REGISTERS_PER_LINE: usize = 8;

/// The golden text output tests compare against. Changing the layout
/// invalidates every `.expected` file.
pub fn debug_string(state: &MachineState) -> String {
    format!("{}\n{}", registers_string(state), memory_string(state))
}

pub fn registers_string(state: &MachineState) -> String {
    let mut lines = vec![format!(
        "PC: {}  I: {}",
        hex_address(state.program_counter()),
        hex_address(state.index_register())
    )];

    for (line, chunk) in state.registers().chunks(REGISTERS_PER_LINE).enumerate() {
        let items: Vec<String> = chunk
            .iter()
            .enumerate()
            .map(|(i, value)| format!("V{:x}: {value:>3}", line * REGISTERS_PER_LINE + i))
            .collect();
        lines.push(items.join("  "));
    }

    lines.join("\n")
}

/// One line per non-zero 16 byte block: lowercase base address, then the
/// block as eight big-endian words.
pub fn memory_string(state: &MachineState) -> String {
    state
        .memory()
        .chunks(LINE_LENGTH)
        .enumerate()
        .filter(|(_, chunk)| !is_zeroed(chunk))
        .map(|(line, chunk)| {
            let words: Vec<String> = chunk
                .chunks(2)
                .map(|pair| format!("{:04x}", BigEndian::read_u16(pair)))
                .collect();
            format!("{:04x}: {}", line * LINE_LENGTH, words.join(" "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
