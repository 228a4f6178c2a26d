mod display;
mod game;
mod logger;
mod parse_args;
mod physics;
mod traced;

use display::Frame;
use game::{Command, Game};
use ir_link::{
    Event, FaultConfig, Link, LinkError, LossyTransport, SerialTransport, SocketAddr,
    SocketListener, SocketTransport, Transport,
};
use logger::Logger;
use parse_args::{parse_args, AppArgs, Verbosity};
use traced::TracedTransport;

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::{Duration, Instant};

fn main() {
    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error parsing arguments: {}", e);
            std::process::exit(1);
        }
    };

    // Set up logger
    let logger = match &args.log_file {
        Some(path) => match Logger::file(path, args.verbosity) {
            Ok(l) => {
                eprintln!("Logging to: {}", path);
                l
            }
            Err(e) => {
                eprintln!("Failed to open log file '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        None => Logger::stderr(args.verbosity),
    };

    if args.list_ports {
        match ir_link::serial::available_ports() {
            Ok(ports) if ports.is_empty() => println!("No serial ports found"),
            Ok(ports) => {
                for port in ports {
                    println!("{}", port);
                }
            }
            Err(e) => {
                eprintln!("Failed to list serial ports: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let transport = match open_transport(&args, &logger) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Failed to open IR link: {}", e);
            std::process::exit(1);
        }
    };
    let transport: Box<dyn Transport> = if args.loss > 0.0 || args.dup > 0.0 {
        logger.verbose(&format!(
            "[LINK] Fault injection: loss={} dup={} seed={}",
            args.loss, args.dup, args.seed
        ));
        Box::new(LossyTransport::new(
            transport,
            FaultConfig {
                loss_rate: args.loss,
                duplicate_rate: args.dup,
                seed: args.seed,
            },
        ))
    } else {
        transport
    };
    let transport = TracedTransport::new(transport, logger.clone());

    if let Err(e) = run_game(transport, &args, &logger) {
        eprintln!("Link error: {}", e);
        std::process::exit(1);
    }
}

/// Print to stderr in quiet mode, log otherwise
fn announce(logger: &Logger, msg: &str) {
    logger.verbose(&format!("[LINK] {}", msg));
    if logger.verbosity() < Verbosity::Verbose {
        eprintln!("{}", msg);
    }
}

fn socket_addr(args: &AppArgs) -> SocketAddr {
    if let Some(tcp) = &args.tcp_addr {
        return SocketAddr::tcp(tcp.clone());
    }
    let path = args
        .socket_path
        .clone()
        .unwrap_or_else(|| ir_link::socket::DEFAULT_SOCKET_PATH.to_string());
    #[cfg(unix)]
    {
        SocketAddr::unix(&path)
    }
    #[cfg(not(unix))]
    {
        let _ = path;
        eprintln!("Unix sockets not supported on this platform, use --tcp");
        std::process::exit(1);
    }
}

fn open_transport(args: &AppArgs, logger: &Logger) -> Result<Box<dyn Transport>, LinkError> {
    if let Some(device) = &args.serial {
        let port = SerialTransport::open(device, args.baud)?;
        announce(
            logger,
            &format!(
                "Opened {} at {} baud",
                port.name().unwrap_or_else(|| device.clone()),
                args.baud
            ),
        );
        return Ok(Box::new(port));
    }

    let addr = socket_addr(args);
    if args.listen {
        let listener = SocketListener::bind(&addr)?;
        announce(logger, &format!("Waiting for the other player on {}...", listener.addr()));
        let transport = listener.accept()?;
        announce(logger, "Other player connected");
        return Ok(Box::new(transport));
    }

    // Keep trying until the listening side is up
    loop {
        announce(logger, &format!("Connecting to {}...", addr));
        match SocketTransport::connect(&addr) {
            Ok(transport) => {
                announce(logger, "Connected!");
                return Ok(Box::new(transport));
            }
            Err(e) => {
                eprintln!("Failed to connect: {} (retrying in 1s)", e);
            }
        }
        std::thread::sleep(Duration::from_secs(1));
    }
}

fn spawn_stdin_reader() -> Receiver<Command> {
    let (tx, rx): (Sender<Command>, Receiver<Command>) = mpsc::channel();
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match Command::parse(&line) {
                Some(command) => {
                    if tx.send(command).is_err() {
                        break;
                    }
                }
                None => eprintln!("Unknown command '{}' (p, n, s, w or q)", line.trim()),
            }
        }
        // EOF ends the game
        let _ = tx.send(Command::Quit);
    });
    rx
}

fn log_event(logger: &Logger, event: &Event) {
    match event {
        Event::None => {}
        Event::GameStarted { has_ball } => logger.verbose(&format!(
            "[GAME] Round started, {}",
            if *has_ball { "serving" } else { "receiving" }
        )),
        Event::RoundEnded => logger.verbose("[GAME] Round won"),
        Event::GameEnded => logger.verbose("[GAME] Game over"),
        Event::BallHandoff(handoff) => logger.trace(&format!(
            "[GAME] Ball received: row={} dir={} speed={}",
            handoff.row_pos,
            if handoff.row_dir_positive { "+" } else { "-" },
            handoff.col_speed_mag
        )),
    }
}

fn draw(frame: &Frame, game: &Game) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let _ = write!(
        out,
        "{}you {} - {} opponent\n\n",
        frame.render(),
        game.score(),
        game.opponent_score()
    );
    let _ = out.flush();
}

fn run_game<T: Transport>(mut transport: T, args: &AppArgs, logger: &Logger) -> Result<(), LinkError> {
    let commands = spawn_stdin_reader();
    let mut link = Link::new();
    let mut game = Game::new(args.winning_score);
    let mut last_frame: Option<Frame> = None;

    eprintln!("Press Enter to start a round (n/s move, w pushes, q quits)");

    let tick = Duration::from_millis(args.tick_ms.max(1));
    let mut next_tick = Instant::now();
    loop {
        // One command per tick, like a button sampled by the game loop
        let command = match commands.try_recv() {
            Ok(command) => Some(command),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Command::Quit),
        };
        if command == Some(Command::Quit) {
            logger.verbose("[GAME] Quit");
            return Ok(());
        }
        let input = command.map(Command::input).unwrap_or_default();
        if input.push {
            link.request_start();
        }

        let phase = link.phase();
        let event = link.update(&mut transport);
        if let Some(e) = transport.take_error() {
            return Err(e);
        }
        log_event(logger, &event);

        let frame = game.advance(event, &mut link, input);
        if link.phase() != phase {
            logger.trace(&format!("[LINK] {} -> {} (seq {})", phase, link.phase(), link.sequence()));
        }
        if last_frame != Some(frame) {
            draw(&frame, &game);
            last_frame = Some(frame);
        }

        next_tick += tick;
        match next_tick.checked_duration_since(Instant::now()) {
            Some(wait) => std::thread::sleep(wait),
            // Fell behind; don't try to catch up
            None => next_tick = Instant::now(),
        }
    }
}
