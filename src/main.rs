use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use miette::{IntoDiagnostic, Result};

use braid::{env, RunState, PSW_C};

/// Braid is a compact & convenient emulator for the 8051 microcontroller core.
#[derive(Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Quickly provide a binary image to run
    path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a raw binary image and print the final machine state
    Run {
        /// Image to load at address 0 of code memory
        name: PathBuf,
        /// Instruction budget before execution gives up
        #[arg(short, long, default_value_t = DEFAULT_STEPS)]
        steps: u32,
        /// Produce minimal output, suited for blackbox tests
        #[arg(short, long)]
        minimal: bool,
    },
    /// Run the built-in sample program
    Demo {
        /// Instruction budget before execution gives up
        #[arg(short, long, default_value_t = DEFAULT_STEPS)]
        steps: u32,
        /// Produce minimal output, suited for blackbox tests
        #[arg(short, long)]
        minimal: bool,
    },
}

const DEFAULT_STEPS: u32 = 50;

// MOV A,#5 / ADD A,#3 / SJMP -2 (spins in place once the sum is done)
const DEMO_IMAGE: &[u8] = &[0x74, 0x05, 0x24, 0x03, 0x80, 0xFE];

fn main() -> miette::Result<()> {
    let args = Args::parse();
    env::init();

    if let Some(command) = args.command {
        match command {
            Command::Run {
                name,
                steps,
                minimal,
            } => run(&name, steps, minimal),
            Command::Demo { steps, minimal } => demo(steps, minimal),
        }
    } else if let Some(path) = args.path {
        run(&path, DEFAULT_STEPS, false)
    } else {
        println!("{}", LOGO.truecolor(205, 127, 50).bold());
        println!("\n~ braid v{VERSION} ~");
        println!("{SHORT_INFO}");
        Ok(())
    }
}

#[allow(unused)]
enum MsgColor {
    Green,
    Cyan,
    Red,
}

fn file_message(color: MsgColor, left: &str, right: &PathBuf) {
    let right = format!("target {}", right.to_str().unwrap());
    message(color, left, &right);
}

fn message<S>(color: MsgColor, left: S, right: S)
where
    S: Colorize + std::fmt::Display,
{
    let left = match color {
        MsgColor::Green => left.green(),
        MsgColor::Cyan => left.cyan(),
        MsgColor::Red => left.red(),
    };
    println!("{left:>12} {right}");
}

fn run(name: &PathBuf, steps: u32, minimal: bool) -> Result<()> {
    if !minimal {
        file_message(MsgColor::Green, "Loading", name);
    }
    let image = fs::read(name).into_diagnostic()?;
    let mut machine = RunState::from_raw(&image)?;
    drive(&mut machine, steps, minimal)
}

fn demo(steps: u32, minimal: bool) -> Result<()> {
    if !minimal {
        message(MsgColor::Green, "Loading", "built-in sample program");
    }
    let mut machine = RunState::from_raw(DEMO_IMAGE)?;
    drive(&mut machine, steps, minimal)
}

fn drive(machine: &mut RunState, steps: u32, minimal: bool) -> Result<()> {
    if !minimal {
        message(MsgColor::Green, "Running", &format!("budget of {steps} steps"));
    }

    let executed = if env::trace() {
        trace_run(machine, steps)
    } else {
        machine.run(steps)
    };

    print_state(machine, minimal);

    if let Some(cause) = machine.halt_cause() {
        if !minimal {
            message(MsgColor::Red, "Halted", "execution stopped early");
        }
        return Err(cause.to_report());
    }
    if !minimal {
        message(MsgColor::Green, "Completed", &format!("{executed} steps"));
    }
    Ok(())
}

// Single-step so each opcode can be reported before it executes
fn trace_run(machine: &mut RunState, max_steps: u32) -> u32 {
    let mut executed = 0;
    while executed < max_steps && machine.running() {
        let pc = machine.cpu().pc;
        let opcode = machine.mem().read_code(pc);
        eprintln!("{:>12} PC=0x{pc:04X} op=0x{opcode:02X}", "Trace".dimmed());
        machine.step();
        executed += 1;
    }
    executed
}

fn print_state(machine: &RunState, minimal: bool) {
    let cpu = machine.cpu();
    if minimal {
        println!("A 0x{:02X}", cpu.a);
        println!("B 0x{:02X}", cpu.b);
        println!("PSW 0x{:02X}", cpu.psw);
        println!("SP 0x{:02X}", cpu.sp);
        println!("PC 0x{:04X}", cpu.pc);
        println!("DPTR 0x{:04X}", cpu.dptr);
        return;
    }

    println!("\n----- Machine state -----");
    println!("A    = 0x{:02X}", cpu.a);
    println!("B    = 0x{:02X}", cpu.b);
    println!("PSW  = 0x{:02X} (C={})", cpu.psw, cpu.flag(PSW_C) as u8);
    println!("SP   = 0x{:02X}", cpu.sp);
    println!("PC   = 0x{:04X}", cpu.pc);
    println!("DPTR = 0x{:04X}", cpu.dptr);
    println!("-------------------------\n");
}

const LOGO: &str = r#"
 _                   _     _
| |__   _ __   __ _ (_) __| |
| '_ \ | '__| / _` || |/ _` |
| |_) || |   | (_| || | (_| |
|_.__/ |_|    \__,_||_|\__,_|"#;

const SHORT_INFO: &str = r"
Welcome to braid, a compact emulator for the 8051 microcontroller core.
Please use `-h` or `--help` to access the usage instructions and documentation.
";

const VERSION: &str = env!("CARGO_PKG_VERSION");
