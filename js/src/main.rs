use js_bridge::*;

#[derive(clap::Parser)]
#[command(name = "bridge", version, about = "Feed script call arguments through the host method bridge")]
struct Cli {
    /// Entry-point name the bridge answers to
    #[arg(short, long)]
    entry_point: Option<String>,

    /// JSON file with bridge configuration
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Name to call the bridge under (defaults to the entry point)
    #[arg(long)]
    call: Option<String>,

    /// Pretty-print dispatched messages
    #[arg(short, long)]
    pretty: bool,

    /// JSON array of call arguments, e.g. '["doThing", 1, {"a": 3}]'
    args: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    // Initialize logger (controlled by RUST_LOG)
    env_logger::init();

    let cli = <Cli as clap::Parser>::parse();

    let mut config = match cli.config {
        Some(ref path) => BridgeConfig::from_path(path)?,
        None => BridgeConfig::default(),
    };
    if let Some(entry_point) = cli.entry_point.clone() {
        config = config.with_entry_point(entry_point);
    }
    config.validate()?;

    let pretty = cli.pretty;
    let sender = move |message: InvocationMessage| -> Result<(), BridgeError> {
        let text = if pretty { message.to_json_pretty()? } else { message.to_json()? };
        println!("{text}");
        Ok(())
    };
    let handler = MethodHandler::with_config(config, sender);
    let call_name = cli.call.clone().unwrap_or_else(|| handler.entry_point().to_string());

    match cli.args {
        Some(ref json) => {
            if !run_call(&handler, &call_name, json) {
                std::process::exit(1);
            }
        }
        None => run_persistent_repl(&handler, &call_name)?,
    }
    Ok(())
}

// Returns false when the call was not handled or failed.
fn run_call<S: MessageSender>(handler: &MethodHandler<S>, call_name: &str, json: &str) -> bool {
    let arguments = match ScriptValue::from_json(json) {
        Ok(ScriptValue::Array(items)) => items,
        Ok(other) => vec![other],
        Err(err) => {
            eprintln!("Invalid arguments: {err}");
            return false;
        }
    };
    log::debug!("calling {call_name} with {} argument(s)", arguments.len());

    match handler.handle_call(call_name, &arguments) {
        CallOutcome::NotHandled => {
            eprintln!("NotHandled");
            false
        }
        CallOutcome::Handled(Ok(())) => true,
        CallOutcome::Handled(Err(exception)) => {
            eprintln!("{exception}");
            false
        }
    }
}

// Each line is one call's argument array.
#[allow(clippy::println_empty_string)]
fn run_persistent_repl<S: MessageSender>(
    handler: &MethodHandler<S>,
    call_name: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    use rustyline::Editor;
    use rustyline::error::ReadlineError;
    use std::path::PathBuf;

    let ver = clap::crate_version!();
    println!("Host method bridge REPL v{ver}. Enter a JSON argument array per line; 'exit' or Ctrl-D to quit.");

    let mut rl = match Editor::<(), rustyline::history::FileHistory>::new() {
        Ok(e) => e,
        Err(err) => {
            eprintln!("Failed to initialize line editor: {err}");
            std::process::exit(1);
        }
    };

    // Simple history file in the user's home directory
    let history_path: Option<PathBuf> = std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".js_bridge_history"));
    if let Some(ref p) = history_path {
        let _ = rl.load_history(p);
    }

    loop {
        match rl.readline("bridge> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "exit" || trimmed == ".exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed)?;
                if run_call(handler, call_name, trimmed) {
                    println!("true");
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye");
                break;
            }
            Err(err) => {
                eprintln!("Readline error: {err}");
                break;
            }
        }
    }

    if let Some(ref p) = history_path {
        rl.save_history(p)?;
    }
    Ok(())
}
