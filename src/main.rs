use std::io::{BufRead, Write};

use shoal::errors::print_diag;
use shoal::shell::{options, Opts, Shell};
use shoal::sys;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let Some(argv0) = args.first().cloned() else {
        std::process::exit(1);
    };
    let mut shell = Shell::new(argv0);

    // Interactive only when both stdout and stderr face a terminal.
    if sys::isatty(libc::STDOUT_FILENO) && sys::isatty(libc::STDERR_FILENO) {
        if let Err(err) = shell.make_interactive() {
            print_diag(&shell.argv0, &err);
            std::process::exit(1);
        }
    }

    let mut cmdline = None;
    let argv0 = shell.argv0.clone();
    if !options::optparse(&mut shell.opts, false, &argv0, &args[1..], &mut cmdline) {
        std::process::exit(1);
    }

    if let Some(line) = cmdline {
        shell.take_line(&line);
        return;
    }

    repl(&mut shell);
}

fn repl(shell: &mut Shell) {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut buf = Vec::new();
    loop {
        if shell.interactive() {
            print!("{}", shell.prompt);
            let _ = std::io::stdout().flush();
        }
        buf.clear();
        match input.read_until(b'\n', &mut buf) {
            Ok(0) => {
                if shell.interactive() && shell.opts.contains(Opts::IGNOREEOF) {
                    eprintln!("use 'exit' to exit the shell.");
                    continue;
                }
                break;
            }
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                shell.take_line(&line);
            }
            Err(_) => break,
        }
    }
}
