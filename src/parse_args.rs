const HELP: &str = "\
IR Pong - two-player pong over an IR link

Each player runs one instance. The two instances talk the single-byte IR
link protocol over a socket or a serial IR adapter.

USAGE:
  ir-pong [OPTIONS]

OPTIONS:
  -h, --help            Prints help information
  --socket <path>       Unix socket path (default: /tmp/ir-pong.sock)
  --tcp <host:port>     Use TCP instead of Unix socket
  -l, --listen          Wait for the other player instead of connecting
  --serial <device>     Use a serial IR adapter instead of a socket
  --baud <rate>         Serial baud rate (default: 2400)
  --list-ports          List serial ports and exit
  --tick-ms <n>         Game tick length in milliseconds (default: 20)
  --score <n>           Points needed to win, 1-4 (default: 3)
  --loss <rate>         Drop this fraction of sent bytes (default: 0)
  --dup <rate>          Send this fraction of bytes twice (default: 0)
  --seed <n>            Seed for --loss/--dup (default: 0)
  -v, --verbose         Show connection, round and game events
  -vv, --trace          Also show every link event and phase change
  -vvv, --trace-ir      Show individual IR bytes (very verbose)
  --log <file>          Write trace output to file instead of stderr

CONTROLS (type a line, then Enter; one command per tick):
  p or empty line       Push: start a round
  n / s                 Move paddle north / south
  w                     Push paddle forward
  q                     Quit
";

/// Verbosity level for debug output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// No debug output
    #[default]
    Quiet = 0,
    /// Connection events, rounds, game over
    Verbose = 1,
    /// Every link event and phase change
    Trace = 2,
    /// Individual IR bytes
    TraceIr = 3,
}

#[derive(Debug)]
pub struct AppArgs {
    pub socket_path: Option<String>,
    pub tcp_addr: Option<String>,
    pub listen: bool,
    pub serial: Option<String>,
    pub baud: u32,
    pub list_ports: bool,
    pub tick_ms: u64,
    pub winning_score: u8,
    pub loss: f64,
    pub dup: f64,
    pub seed: u64,
    pub verbosity: Verbosity,
    pub log_file: Option<String>,
}

fn parse_score(s: &str) -> Result<u8, String> {
    match s.parse::<u8>() {
        Ok(n) if (1..=4).contains(&n) => Ok(n),
        _ => Err(format!("score must be 1-4, got '{}'", s)),
    }
}

fn parse_rate(s: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(r) if (0.0..=1.0).contains(&r) => Ok(r),
        _ => Err(format!("rate must be between 0 and 1, got '{}'", s)),
    }
}

pub fn parse_args() -> Result<AppArgs, pico_args::Error> {
    let mut pargs = pico_args::Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{}", HELP);
        std::process::exit(0);
    }

    // Count -v flags for verbosity level
    let verbosity = if pargs.contains("--trace-ir") || pargs.contains("-vvv") {
        Verbosity::TraceIr
    } else if pargs.contains("--trace") || pargs.contains("-vv") {
        Verbosity::Trace
    } else if pargs.contains(["-v", "--verbose"]) {
        Verbosity::Verbose
    } else {
        Verbosity::Quiet
    };

    let args = AppArgs {
        socket_path: pargs.opt_value_from_str("--socket")?,
        tcp_addr: pargs.opt_value_from_str("--tcp")?,
        listen: pargs.contains(["-l", "--listen"]),
        serial: pargs.opt_value_from_str("--serial")?,
        baud: pargs
            .opt_value_from_str("--baud")?
            .unwrap_or(ir_link::serial::DEFAULT_BAUD_RATE),
        list_ports: pargs.contains("--list-ports"),
        tick_ms: pargs.opt_value_from_str("--tick-ms")?.unwrap_or(20),
        winning_score: pargs.opt_value_from_fn("--score", parse_score)?.unwrap_or(3),
        loss: pargs.opt_value_from_fn("--loss", parse_rate)?.unwrap_or(0.0),
        dup: pargs.opt_value_from_fn("--dup", parse_rate)?.unwrap_or(0.0),
        seed: pargs.opt_value_from_str("--seed")?.unwrap_or(0),
        verbosity,
        log_file: pargs.opt_value_from_str("--log")?,
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        eprintln!("Warning: unused arguments left: {:?}.", remaining);
    }

    Ok(args)
}
