use miette::{miette, Report, Severity};

// Loader errors

pub fn load_capacity(addr: u16, len: usize) -> Report {
    miette!(
        severity = Severity::Error,
        code = "load::capacity",
        help = "code memory holds 65536 bytes; the image must end at or before 0xFFFF.",
        "Image of {len} bytes does not fit at address 0x{addr:04X}",
    )
}

// Execution errors

pub fn exec_unimplemented(opcode: u8, at: u16) -> Report {
    miette!(
        severity = Severity::Error,
        code = "exec::unimplemented",
        help = "only NOP, MOV A,#imm, ADD A,#imm and SJMP are implemented; the machine halted with its state intact.",
        "Encountered unimplemented opcode 0x{opcode:02X} at PC=0x{at:04X}",
    )
}
