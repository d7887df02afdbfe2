//! SerialMonitor - Main entry point
//!
//! Feeds stdin to the console one byte at a time and writes everything to
//! stdout. On ESP-IDF targets stdin/stdout are the UART console. Putting a
//! host terminal into raw mode is left to the caller (`stty raw -echo`).

use std::io::{self, Read, Write as _};

use argh::FromArgs;
use serial_monitor::{Capabilities, Console, LineOutcome, LogLevel, MonitorConfig};

/// Line-oriented command monitor.
#[derive(FromArgs)]
struct Args {
    /// use the MCU line convention (CR ends a line, BS erases)
    #[argh(switch)]
    embedded: bool,

    /// disable registers and the set/get commands
    #[argh(switch)]
    no_registers: bool,

    /// disable add/sub/mul
    #[argh(switch)]
    no_math: bool,

    /// disable the exit keyword
    #[argh(switch)]
    no_exit: bool,

    /// copy the debug log to stderr
    #[argh(switch, short = 'v')]
    verbose: bool,

    /// print the token pool report on exit
    #[argh(switch)]
    report: bool,
}

impl Args {
    fn config(&self) -> MonitorConfig {
        let defaults = Capabilities::from_features();
        let caps = Capabilities {
            registers: defaults.registers && !self.no_registers,
            math: defaults.math && !self.no_math,
            exit: defaults.exit && !self.no_exit,
            hosted: defaults.hosted && !self.embedded,
        };
        let level = if self.verbose { LogLevel::Trace } else { LogLevel::Warn };
        MonitorConfig::new(caps).with_log_level(level)
    }
}

/// `core::fmt::Write` sink over stdout.
struct Transmit<W: io::Write>(W);

impl<W: io::Write> core::fmt::Write for Transmit<W> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.0.write_all(s.as_bytes()).map_err(|_| core::fmt::Error)
    }
}

fn drain_log(console: &mut Console) {
    let log = &mut console.session_mut().log;
    while let Some(entry) = log.drain() {
        eprintln!("{}", entry);
    }
    if log.dropped() > 0 {
        eprintln!("[log] {} messages dropped", log.dropped());
        log.reset_dropped();
    }
}

fn main() -> io::Result<()> {
    #[cfg(target_os = "espidf")]
    esp_idf_svc::sys::link_patches();

    let args: Args = argh::from_env();
    let mut console = Console::new(&args.config());
    let mut out = Transmit(io::stdout().lock());

    console.print_banner(&mut out);
    out.0.flush()?;

    for byte in io::stdin().lock().bytes() {
        let outcome = console.process_byte(byte?, &mut out);
        out.0.flush()?;
        drain_log(&mut console);

        if outcome == Some(LineOutcome::Exit) {
            break;
        }
    }

    let eol = console.session().eol();
    let _ = core::fmt::Write::write_str(&mut out, eol);
    if args.report {
        let _ = console.session().pool().report(&mut out, eol);
    }
    out.0.flush()
}
