use clap::Parser;
use simd_lisp::repl::{eval_all, print_ir, Repl};
use simd_lisp::{JitSettings, OptLevel, Session};

/// JIT-compiling REPL for four-lane float expressions
#[derive(Parser)]
#[command(name = "simd-lisp", version)]
struct Args {
    /// Print the generated Cranelift IR after each input
    #[arg(long)]
    emit: bool,

    #[arg(long, value_enum, default_value_t = OptLevel::Speed)]
    opt_level: OptLevel,

    /// Evaluate the forms in EXPR and exit instead of starting the REPL
    #[arg(short = 'e', long = "eval", value_name = "EXPR")]
    exprs: Vec<String>,
}

fn main() {
    env_logger::builder().format_timestamp(None).init();

    let args = Args::parse();
    let settings = JitSettings::default()
        .with_opt_level(args.opt_level)
        .with_capture_ir(args.emit);

    let mut session = match Session::with_settings(settings) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if !args.exprs.is_empty() {
        for source in &args.exprs {
            let emitted = session.ir_listing().len();
            for output in eval_all(&mut session, source) {
                println!("{output}");
            }
            if args.emit {
                print_ir(&session, emitted);
            }
        }
        return;
    }

    let result = Repl::new(args.emit).and_then(|mut repl| repl.run(&mut session));
    if let Err(err) = result {
        eprintln!("line editor error: {err}");
        std::process::exit(1);
    }
}
