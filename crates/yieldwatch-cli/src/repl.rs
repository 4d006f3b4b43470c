//! Interactive REPL over one simulated herd.
//!
//! Launch with `yieldwatch repl`. Type `/help` for available commands,
//! Tab for completion.

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, Helper,
    KeyEvent, RepeatCount,
};

use yieldwatch::{OperationsEngine, SubjectReadings};

use crate::config::{parse_pattern, SimulationConfig};
use crate::pipeline::{execute, Operation};
use crate::report::ConsoleReport;
use crate::sensor::{build_herd, SensorSimulator};

/// Available REPL commands.
const COMMANDS: &[(&str, &str)] = &[
    ("/generate", "Generate a new herd (optional seed)"),
    ("/show", "Show subjects and their readings"),
    ("/sort", "Sort every subject's readings"),
    ("/pattern", "Search a pattern, e.g. /pattern 18,20"),
    ("/classify", "Classify by mean, e.g. /classify 20"),
    ("/run", "Run every analysis"),
    ("/config", "Show the active configuration"),
    ("/clear", "Clear the screen"),
    ("/help", "Show available commands"),
    ("/exit", "Quit the REPL"),
];

/// REPL helper for tab completion.
#[derive(Default)]
struct HerdHelper;

impl Completer for HerdHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];

        if !input.contains(' ') {
            let matches: Vec<Pair> = COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(input))
                .map(|(cmd, desc)| Pair {
                    display: format!("{cmd:<16} {desc}"),
                    replacement: format!("{cmd} "),
                })
                .collect();
            return Ok((0, matches));
        }

        Ok((pos, Vec::new()))
    }
}

impl Hinter for HerdHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || line.is_empty() {
            return None;
        }
        if line.starts_with('/') && !line.contains(' ') {
            for (cmd, _) in COMMANDS {
                if cmd.starts_with(line) && *cmd != line {
                    return Some(cmd[line.len()..].to_string());
                }
            }
        }
        None
    }
}

impl Highlighter for HerdHelper {}
impl Validator for HerdHelper {}
impl Helper for HerdHelper {}

struct TabCompleteOrAcceptHint;

impl ConditionalEventHandler for TabCompleteOrAcceptHint {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        if ctx.has_hint() {
            Some(Cmd::CompleteHint)
        } else {
            Some(Cmd::Complete)
        }
    }
}

/// Session state: the configuration and the herd it produced.
pub struct ReplState {
    config: SimulationConfig,
    herd: SubjectReadings,
}

impl ReplState {
    pub fn new(config: SimulationConfig) -> Self {
        let mut sensor = SensorSimulator::from_config(&config);
        let herd = build_herd(&config, &mut sensor);
        Self { config, herd }
    }

    pub fn herd(&self) -> &SubjectReadings {
        &self.herd
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Replace the herd; a seed argument makes it reproducible.
    pub fn regenerate(&mut self, seed: Option<u64>) {
        if seed.is_some() {
            self.config.seed = seed;
        }
        let mut sensor = SensorSimulator::from_config(&self.config);
        self.herd = build_herd(&self.config, &mut sensor);
    }
}

/// Run the interactive REPL.
pub fn run(config: SimulationConfig) -> anyhow::Result<()> {
    eprintln!();
    eprintln!(
        "  \x1b[32m\u{25c9}\x1b[0m \x1b[1myieldwatch v{}\x1b[0m \x1b[90m\u{2014} Herd Yield Analysis\x1b[0m",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!();
    eprintln!(
        "    Press \x1b[36m/\x1b[0m to browse commands, \x1b[90mTab\x1b[0m to complete, \x1b[90m/exit\x1b[0m to quit."
    );
    eprintln!();

    let rl_config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .completion_prompt_limit(20)
        .build();

    let mut rl: Editor<HerdHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(rl_config)?;
    rl.set_helper(Some(HerdHelper));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    let hist_path = std::path::PathBuf::from(&home).join(".yieldwatch_history");
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    let mut state = ReplState::new(config);
    let prompt = " \x1b[36myield>\x1b[0m ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let input = line.strip_prefix('/').unwrap_or(line);
                if input.is_empty() {
                    cmd_help();
                    continue;
                }

                let mut parts = input.splitn(2, ' ');
                let cmd = parts.next().unwrap_or("");
                let args = parts.next().unwrap_or("").trim();

                match cmd {
                    "exit" | "quit" => {
                        eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                        break;
                    }
                    "help" | "h" | "?" => cmd_help(),
                    "clear" | "cls" => eprint!("\x1b[2J\x1b[H"),
                    "generate" | "gen" => cmd_generate(args, &mut state),
                    "show" => cmd_show(&state),
                    "sort" => cmd_operation(&state, Operation::Sort),
                    "pattern" => match pattern_arg(args, &state) {
                        Ok(pattern) => cmd_operation(&state, Operation::Pattern(pattern)),
                        Err(e) => eprintln!("  {e}"),
                    },
                    "classify" => match threshold_arg(args, &state) {
                        Ok(threshold) => cmd_operation(&state, Operation::Classify(threshold)),
                        Err(e) => eprintln!("  {e}"),
                    },
                    "run" => cmd_operation(&state, Operation::All),
                    "config" => cmd_config(&state),
                    _ => {
                        eprintln!("  Unknown command '/{cmd}'. Type /help for commands.");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => {
                eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    let _ = rl.save_history(&hist_path);

    Ok(())
}

/// Pattern from the argument, or the configured one.
pub fn pattern_arg(args: &str, state: &ReplState) -> anyhow::Result<Vec<i64>> {
    if args.is_empty() {
        return Ok(state.config.pattern.clone());
    }
    Ok(parse_pattern(args)?)
}

/// Threshold from the argument, or the configured one.
pub fn threshold_arg(args: &str, state: &ReplState) -> anyhow::Result<f64> {
    if args.is_empty() {
        return Ok(state.config.threshold);
    }
    let threshold: f64 = args
        .parse()
        .map_err(|e| anyhow::anyhow!("bad threshold '{args}': {e}"))?;
    Ok(threshold)
}

fn cmd_help() {
    eprintln!();
    eprintln!("  Commands:");
    eprintln!();
    for (cmd, desc) in COMMANDS {
        eprintln!("    {cmd:<18} {desc}");
    }
    eprintln!();
    eprintln!("  Tip: without arguments, /pattern and /classify use the configured values.");
    eprintln!();
}

fn cmd_generate(args: &str, state: &mut ReplState) {
    let seed = if args.is_empty() {
        None
    } else {
        match args.parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(e) => {
                eprintln!("  Bad seed '{args}': {e}");
                return;
            }
        }
    };
    state.regenerate(seed);
    eprintln!(
        "  Generated {} subjects with {} readings each.",
        state.herd.len(),
        state.config.readings_per_subject
    );
}

fn cmd_show(state: &ReplState) {
    let engine = OperationsEngine::with_sink(ConsoleReport::new(std::io::stderr()));
    engine.report_subjects(&state.herd);
    engine.report_readings("Readings", &state.herd);
}

fn cmd_operation(state: &ReplState, operation: Operation) {
    let engine = OperationsEngine::with_sink(ConsoleReport::new(std::io::stderr()));
    if let Err(e) = execute(&engine, &state.herd, &state.config, &operation) {
        eprintln!("  Error: {e}");
    }
}

fn cmd_config(state: &ReplState) {
    match serde_json::to_string_pretty(&state.config) {
        Ok(text) => {
            for line in text.lines() {
                eprintln!("  {line}");
            }
        }
        Err(e) => eprintln!("  Cannot render config: {e}"),
    }
}
