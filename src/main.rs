use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::mpsc::{self, RecvTimeoutError},
    thread,
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colored::Colorize;
use prettytable::{color, format, Attr, Cell, Row, Table};

use cronometro::config::Config;
use cronometro::session::{Session, MSG_COMPLETED};
use cronometro::time::SecondsExt;
use cronometro::{Event, Notifier, PresetStore};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
    /// Config file to use. [default: ${XDG_CONFIG_DIR}/cronometro/config.toml]
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Print events as JSON lines instead of rendering them
    #[arg(long, default_value_t = false)]
    json: bool,
    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the interactive countdown session
    Run,
    /// Run a single countdown to completion and exit
    Start {
        /// Length of the countdown, in seconds
        duration: String,
    },
}

/// Renders session events on the terminal, or as JSON lines with `--json`.
struct ConsoleRenderer {
    json: bool,
}

impl ConsoleRenderer {
    fn new(json: bool) -> Self {
        Self { json }
    }

    fn print_progress_bar(elapsed: u32, total: u32, fraction: f64) {
        let bar_width = 40.0;

        let filled_count = (bar_width * fraction).round() as usize;
        let unfilled_count = (bar_width * (1.0 - fraction)).round() as usize;

        let filled_bar = vec!["█"; filled_count].join("");
        let unfilled_bar = vec!["░"; unfilled_count].join("");

        print!(
            "\rTiempo: {} {}{} {}",
            elapsed.to_clock().bold(),
            filled_bar,
            unfilled_bar,
            total.to_clock().dimmed()
        );

        let _ = io::stdout().flush();
    }
}

impl Notifier for ConsoleRenderer {
    fn notify(&mut self, event: &Event) {
        if self.json {
            match serde_json::to_string(event) {
                Ok(line) => println!("{}", line),
                Err(err) => eprintln!("{}", err),
            }

            return;
        }

        match event {
            Event::Progress {
                elapsed,
                total,
                fraction,
            } => {
                Self::print_progress_bar(*elapsed, *total, *fraction);
            }
            Event::Completed { summary } => {
                println!();
                println!("{}", MSG_COMPLETED.green().bold());
                println!(
                    "Duración: {}  Inicio: {}  Fin: {}",
                    summary.total_seconds.to_human().cyan(),
                    summary.started_at.format("%H:%M:%S").to_string().cyan(),
                    summary.finished_at.format("%H:%M:%S").to_string().cyan()
                );
            }
            Event::Reset => {
                println!();
                println!("Tiempo: {}", 0u32.to_clock());
            }
            Event::Error { message, .. } => {
                eprintln!("{}", message.red());
            }
        }
    }
}

fn main() -> Result<()> {
    human_panic::setup_panic!();

    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbosity.log_level_filter())
        .init();

    let config = if let Some(path) = &args.config {
        Config::init(path)?
    } else {
        Config::init_default()?
    };

    let session = Session::new(config);
    let renderer = ConsoleRenderer::new(args.json);

    match &args.command {
        Command::Run => run_interactive(session, renderer),
        Command::Start { duration } => run_single(session, renderer, duration),
    }
}

/// Start one countdown and tick it until it resolves.
fn run_single(mut session: Session, mut renderer: ConsoleRenderer, duration: &str) -> Result<()> {
    if !session.start(duration, &mut renderer)? {
        std::process::exit(1);
    }

    while session.is_running() {
        thread::sleep(session.tick_interval());
        session.tick(&mut renderer)?;
    }

    Ok(())
}

/// The interactive session: commands come in on stdin, and the countdown
/// ticks whenever the configured interval passes without input.
fn run_interactive(mut session: Session, mut renderer: ConsoleRenderer) -> Result<()> {
    if !renderer.json {
        println!("{}", "Cronómetro con tiempos predefinidos".bold());
        println!(
            "Introduce el tiempo en segundos con {}; {} muestra todas las órdenes.",
            "iniciar <segundos>".cyan(),
            "ayuda".cyan()
        );
        println!();
    }

    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let stdin = io::stdin();

        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };

            if tx.send(line).is_err() {
                break;
            }
        }
    });

    // The window's input field: filled by `elegir`, consumed by a bare
    // `iniciar`.
    let mut input_field: Option<u32> = None;

    loop {
        match rx.recv_timeout(session.tick_interval()) {
            Ok(line) => {
                if !dispatch(&line, &mut session, &mut renderer, &mut input_field)? {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                session.tick(&mut renderer)?;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    session.cancel(&mut renderer)?;

    Ok(())
}

/// Handle one line of user input. Returns `false` when the session is over.
fn dispatch(
    line: &str,
    session: &mut Session,
    renderer: &mut ConsoleRenderer,
    input_field: &mut Option<u32>,
) -> Result<bool> {
    let trimmed = line.trim();

    let (command, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (trimmed, ""),
    };

    if command.is_empty() {
        return Ok(true);
    }

    match command {
        "iniciar" | "i" => {
            let raw = if !rest.is_empty() {
                rest.to_string()
            } else if let Some(seconds) = input_field.take() {
                seconds.to_string()
            } else {
                session.default_duration().as_secs().to_string()
            };

            if session.start(&raw, renderer)? && !renderer.json {
                println!(
                    "Cuenta atrás de {} en marcha",
                    session.total_seconds().to_human().cyan()
                );
            }
        }
        "cancelar" | "c" => {
            session.cancel(renderer)?;
        }
        "guardar" | "g" => {
            if rest.is_empty() {
                eprintln!("{}", "Uso: guardar <segundos>".red());
            } else if let Some((_, label)) = session.add_preset(rest, renderer) {
                if !renderer.json {
                    println!("Guardado: {}", label.cyan());
                }
            }
        }
        "tiempos" | "t" => {
            print_presets(session.presets());
        }
        "elegir" | "e" => {
            select_preset(rest, session, input_field);
        }
        "ayuda" | "?" => {
            print_help();
        }
        "salir" | "q" => {
            return Ok(false);
        }
        _ => {
            eprintln!(
                "Orden desconocida: {} (escribe {})",
                command.red(),
                "ayuda".cyan()
            );
        }
    }

    Ok(true)
}

/// Fill the input field from a saved preset, chosen by list position or by
/// its rendered label.
fn select_preset(rest: &str, session: &Session, input_field: &mut Option<u32>) {
    if rest.is_empty() {
        eprintln!("{}", "Uso: elegir <número|etiqueta>".red());

        return;
    }

    let selected = rest
        .parse::<usize>()
        .ok()
        .and_then(|position| session.presets().get(position.checked_sub(1)?))
        .or_else(|| session.select_preset(rest));

    match selected {
        Some(seconds) => {
            *input_field = Some(seconds);

            println!("Seleccionado: {}", PresetStore::label(seconds).cyan());
        }
        None => {
            eprintln!("{}", "No hay ningún tiempo guardado con esa etiqueta.".red());
        }
    }
}

fn print_presets(presets: &PresetStore) {
    if presets.is_empty() {
        println!("No hay tiempos guardados");
        println!();
        println!("{}", "(usa \"guardar <segundos>\" para añadir uno)".dimmed());

        return;
    }

    let mut table = Table::new();

    table.set_titles(Row::new(vec![
        Cell::new("#").with_style(Attr::Underline(true)),
        Cell::new("Duración").with_style(Attr::Underline(true)),
        Cell::new("Etiqueta").with_style(Attr::Underline(true)),
    ]));

    for (index, seconds) in presets.iter().enumerate() {
        table.add_row(Row::new(vec![
            Cell::new(&(index + 1).to_string()),
            Cell::new(&seconds.to_human())
                .style_spec("r")
                .with_style(Attr::ForegroundColor(color::CYAN)),
            Cell::new(&PresetStore::label(seconds)),
        ]));
    }

    table.set_format(*format::consts::FORMAT_CLEAN);
    table.printstd();
}

fn print_help() {
    println!("Órdenes disponibles:");
    println!(
        "  {}        inicia una cuenta atrás",
        "iniciar [segundos]".cyan()
    );
    println!(
        "  {}                  cancela la cuenta atrás actual",
        "cancelar".cyan()
    );
    println!(
        "  {}        guarda un tiempo para reutilizarlo",
        "guardar <segundos>".cyan()
    );
    println!(
        "  {}                   muestra los tiempos guardados",
        "tiempos".cyan()
    );
    println!(
        "  {}  rellena el tiempo a iniciar",
        "elegir <número|etiqueta>".cyan()
    );
    println!(
        "  {}                     termina la sesión",
        "salir".cyan()
    );
}
