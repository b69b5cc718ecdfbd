use miette::{Report, Result};

use crate::cpu::{Cpu, PSW_C};
use crate::error;
use crate::memory::Memory;

/// An instruction handler. Receives the opcode byte that selected it;
/// handlers with operands fetch them on their own, since operand length is
/// opcode-specific.
type Handler = fn(&mut RunState, u8);

/// Why the core stopped before its step budget ran out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HaltCause {
    /// Fetched an opcode with no registered handler. `at` is the address
    /// the opcode byte was fetched from.
    UnimplementedOpcode { opcode: u8, at: u16 },
}

impl HaltCause {
    /// Render as a diagnostic at the reporting boundary. The core itself
    /// never prints.
    pub fn to_report(self) -> Report {
        match self {
            Self::UnimplementedOpcode { opcode, at } => error::exec_unimplemented(opcode, at),
        }
    }
}

/// Represents complete machine state during runtime.
///
/// Owns the register file and both memory regions, so independent machines
/// never share state.
pub struct RunState {
    cpu: Cpu,
    mem: Memory,
    halt_cause: Option<HaltCause>,
}

impl RunState {
    pub fn new() -> RunState {
        RunState {
            cpu: Cpu::new(),
            mem: Memory::new(),
            halt_cause: None,
        }
    }

    /// Build a machine with a program image already loaded at address 0.
    pub fn from_raw(raw: &[u8]) -> Result<RunState> {
        let mut state = RunState::new();
        state.load(raw, 0x0000)?;
        Ok(state)
    }

    /// Install a program image into code memory. This is how a loader or
    /// assembler hands a program to the core before running it.
    pub fn load(&mut self, bytes: &[u8], addr: u16) -> Result<()> {
        self.mem.load(bytes, addr)
    }

    /// Power-on state: registers, memories and halt cause all cleared.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.mem.reset();
        self.halt_cause = None;
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn mem(&self) -> &Memory {
        &self.mem
    }

    pub fn running(&self) -> bool {
        self.cpu.running()
    }

    pub fn halt_cause(&self) -> Option<HaltCause> {
        self.halt_cause
    }

    /// Every one of the 256 opcode values maps to exactly one handler, so
    /// dispatch can never miss. Slots start out on `unimplemented` and
    /// implemented opcodes override theirs; a new instruction is one more
    /// assignment here.
    const OP_TABLE: [Handler; 256] = {
        let mut table = [RunState::unimplemented as Handler; 256];
        table[0x00] = RunState::nop;
        table[0x24] = RunState::add_a_imm;
        table[0x74] = RunState::mov_a_imm;
        table[0x80] = RunState::sjmp;
        table
    };

    /// Fetch one opcode byte and hand it to its handler. Meaningful only
    /// while the machine is running.
    pub fn step(&mut self) {
        let opcode = self.fetch();
        Self::OP_TABLE[opcode as usize](self, opcode);
    }

    /// Step until the budget is spent or a handler halts the machine.
    /// Returns the number of instructions executed.
    pub fn run(&mut self, max_steps: u32) -> u32 {
        let mut executed = 0;
        while executed < max_steps && self.cpu.running() {
            self.step();
            executed += 1;
        }
        executed
    }

    #[inline]
    fn fetch(&mut self) -> u8 {
        self.cpu.fetch_next_byte(&self.mem)
    }

    // 0x00 - NOP
    fn nop(&mut self, _opcode: u8) {}

    // 0x74 - MOV A,#data
    fn mov_a_imm(&mut self, _opcode: u8) {
        self.cpu.a = self.fetch();
    }

    // 0x24 - ADD A,#data
    fn add_a_imm(&mut self, _opcode: u8) {
        let data = self.fetch();
        let sum = self.cpu.a as u16 + data as u16;
        self.cpu.flag_set(PSW_C, sum > 0xFF);
        self.cpu.a = sum as u8;
    }

    // 0x80 - SJMP rel
    fn sjmp(&mut self, _opcode: u8) {
        // The offset is relative to the address after both instruction
        // bytes, which is exactly where PC sits once the operand is fetched
        let rel = self.fetch() as i8;
        self.cpu.pc = self.cpu.pc.wrapping_add(rel as u16);
    }

    // Default handler for every unassigned slot
    fn unimplemented(&mut self, opcode: u8) {
        // Fetch already advanced past the opcode byte
        let at = self.cpu.pc.wrapping_sub(1);
        self.halt_cause = Some(HaltCause::UnimplementedOpcode { opcode, at });
        self.cpu.halt();
    }
}
