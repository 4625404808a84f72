use std::process::ExitCode;

use annotate_snippets::Renderer;
use clap::Parser;
use tracing::{debug, info};

mod cmdline;
use cmdline::CommandLine;

mod isa;
use isa::{EncodeInstruction, Instruction, ParseInstruction};

mod lexer;

/// Encode a patsim COMPRESS/DECOMPRESS instruction into a 32-bit word
#[derive(Debug, Parser)]
#[command(about, disable_help_flag = true, disable_version_flag = true)]
struct Args {
    /// Log to stderr what the encoder is doing
    #[arg(short = 'v', long)]
    verbose: bool,

    /// compress or decompress, in any case
    mnemonic: String,
    /// Destination register, 0 to 31
    #[arg(allow_negative_numbers = true)]
    rd: String,
    /// First source register, 0 to 31
    #[arg(allow_negative_numbers = true)]
    rs1: String,
    /// Second source register, 0 to 31
    #[arg(allow_negative_numbers = true)]
    rs2: String,
}

fn usage() -> String {
    let name = env!("CARGO_BIN_NAME");
    let mut s = String::from("Usage:\n");
    for m in Instruction::MNEMONICS {
        s.push_str(&format!("    {name} {m} <rd> <rs1> <rs2>\n"));
    }
    s.push_str("Example:\n");
    s.push_str(&format!("    {name} compress 5 6 7\n"));
    s.push_str(&format!("    {name} decompress 8 9 10"));
    s
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    // `--` is an argument like any other, not an end-of-options marker
    let parsed = if std::env::args_os().skip(1).any(|a| a == "--") {
        Err(None)
    } else {
        Args::try_parse().map_err(Some)
    };
    let args = match parsed {
        Ok(args) => args,
        Err(e) => {
            init_logging(false);
            debug!(kind = ?e.map(|e| e.kind()), "rejected command line");
            println!("{}", usage());
            return ExitCode::FAILURE;
        },
    };
    init_logging(args.verbose);
    debug!(?args, "parsed arguments");

    let operands = [args.rd.as_str(), args.rs1.as_str(), args.rs2.as_str()];
    let inst = match Instruction::parse(&args.mnemonic, &operands) {
        Ok(inst) => inst,
        Err(e) => {
            debug!(%e, argument = e.argument(), "rejected instruction");
            let line = CommandLine::new([args.mnemonic.as_str()].into_iter().chain(operands));
            anstream::println!("{}", line.render(&Renderer::styled(), &e));
            return ExitCode::FAILURE;
        },
    };
    debug!(?inst, "recognised instruction");

    let word = inst.encode();
    debug!(
        raw = u32::from(word),
        pred = word.pred(),
        opcode = word.opcode(),
        rd = word.rd(),
        rs1 = word.rs1(),
        rs2 = word.rs2(),
        opc = word.opc(),
        func = word.func(),
        "packed fields"
    );
    info!(%word, mnemonic = inst.mnemonic(), "encoded");
    println!("{} Instruction Encoded: {word}", inst.mnemonic().to_uppercase());

    ExitCode::SUCCESS
}
