//! Shell option state and the option parser shared by startup argv and
//! the `set` builtin.
//!
//! The grammar is the classic `set` one: `-X` enables a short option,
//! `+X` disables it (with the legacy inversions noted per flag), short
//! options cluster, and `-o name` / `+o name` / `-o noname` address
//! options by name. Because `set` re-runs this parser at runtime, a few
//! options are guarded so they can only change at startup.

use bitflags::bitflags;

use crate::errors::diag;

bitflags! {
    /// Process-wide shell option toggles.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Opts: u32 {
        const CLOBBER   = 1;
        const CMDLINE   = 1 << 1;
        const GLOB      = 1 << 2;
        const IGNOREEOF = 1 << 3;
        const PIPEFAIL  = 1 << 4;
        const STDIN     = 1 << 5;
        const VERBOSE   = 1 << 6;
    }
}

impl Default for Opts {
    fn default() -> Self {
        Opts::GLOB | Opts::STDIN
    }
}

impl Opts {
    fn set_enabled(&mut self, enable: bool, opt: Opts) {
        if enable {
            self.insert(opt);
        } else {
            self.remove(opt);
        }
    }
}

/// Named options addressable through `-o` / `+o`, in listing order.
const NAMED_OPTS: &[(&str, Opts)] = &[
    ("clobber", Opts::CLOBBER),
    ("cmdline", Opts::CMDLINE),
    ("glob", Opts::GLOB),
    ("ignoreeof", Opts::IGNOREEOF),
    ("pipefail", Opts::PIPEFAIL),
    ("stdin", Opts::STDIN),
    ("verbose", Opts::VERBOSE),
];

/// Parse option words into `opts`. `initialized` distinguishes startup
/// argv (false) from the `set` builtin (true): listing only works once
/// initialized, and the stdin/cmdline options only before. A `-c`
/// command line lands in `cmdline`. Returns false after an error that
/// should fail the whole invocation; lesser complaints are printed and
/// parsing continues, like any getopt-style loop.
pub fn optparse(
    opts: &mut Opts,
    initialized: bool,
    argv0: &str,
    args: &[String],
    cmdline: &mut Option<String>,
) -> bool {
    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        let plus = match arg.bytes().next() {
            Some(b'-') => false,
            Some(b'+') => true,
            _ => {
                diag(argv0, format_args!("unrecognized option '{arg}'"));
                i += 1;
                continue;
            }
        };
        let letters = &arg[1..];
        if letters.is_empty() {
            eprintln!("usage: {argv0} [+-Cfsv] [+-c cmdline] [+-o option]");
            return false;
        }
        let mut chars = letters.char_indices();
        while let Some((pos, c)) = chars.next() {
            let is_last = pos + c.len_utf8() == letters.len();
            match c {
                'o' => {
                    if is_last && i + 1 < args.len() {
                        i += 1;
                        let consumed =
                            named_opt(opts, initialized, argv0, &args[i..], !plus, cmdline);
                        i += consumed;
                    } else if initialized {
                        optlist(*opts, plus);
                    } else {
                        diag(argv0, "missing argument for -o option");
                        return false;
                    }
                }
                'c' => {
                    if !plus {
                        set_cmdline(opts, initialized, argv0, args.get(i + 1), cmdline);
                        i += 1;
                    }
                }
                'C' => opts.set_enabled(plus, Opts::CLOBBER),
                'f' => opts.set_enabled(plus, Opts::GLOB),
                's' => {
                    if initialized {
                        diag(
                            argv0,
                            "the stdin option cannot be changed after the shell has been initialized",
                        );
                    } else if !plus && opts.contains(Opts::CMDLINE) {
                        diag(argv0, "the stdin option cannot be used with the cmdline option");
                    } else {
                        opts.set_enabled(!plus, Opts::STDIN);
                    }
                }
                'v' => opts.set_enabled(!plus, Opts::VERBOSE),
                _ => {
                    eprintln!("usage: {argv0} [+-Cfsv] [+-c cmdline] [+-o option]");
                    return false;
                }
            }
        }
        i += 1;
    }
    true
}

/// Handle the word after `-o` / `+o`. Returns how many extra argv words
/// beyond the name itself were consumed (the cmdline option takes one).
fn named_opt(
    opts: &mut Opts,
    initialized: bool,
    argv0: &str,
    words: &[String],
    mut enable: bool,
    cmdline: &mut Option<String>,
) -> usize {
    let mut name = words[0].as_str();
    if let Some(stripped) = name.strip_prefix("no") {
        enable = !enable;
        name = stripped;
    }
    if name == "cmdline" && enable {
        set_cmdline(opts, initialized, argv0, words.get(1), cmdline);
        return 1;
    }
    match NAMED_OPTS.iter().find(|(n, _)| *n == name) {
        Some((_, flag)) if *flag == Opts::STDIN || *flag == Opts::CMDLINE => {
            if initialized {
                diag(
                    argv0,
                    format_args!(
                        "the {name} option cannot be changed after the shell has been initialized"
                    ),
                );
            } else {
                opts.set_enabled(enable, *flag);
            }
        }
        Some((_, flag)) => opts.set_enabled(enable, *flag),
        None => diag(argv0, format_args!("unrecognized option '{}'", words[0])),
    }
    0
}

fn set_cmdline(
    opts: &mut Opts,
    initialized: bool,
    argv0: &str,
    line: Option<&String>,
    cmdline: &mut Option<String>,
) {
    if initialized {
        diag(
            argv0,
            "the cmdline option cannot be changed after the shell has been initialized",
        );
    } else if let Some(line) = line {
        opts.remove(Opts::STDIN);
        opts.insert(Opts::CMDLINE);
        *cmdline = Some(line.clone());
    } else {
        diag(argv0, "the cmdline option was specified but no command was given");
    }
}

/// Print every option's state: `set ±o name` lines for `+o`, an
/// `name on|off` table for `-o`.
fn optlist(opts: Opts, plus: bool) {
    for (name, flag) in NAMED_OPTS {
        if plus {
            let sign = if opts.contains(*flag) { '-' } else { '+' };
            println!("set {sign}o {name}");
        } else {
            let state = if opts.contains(*flag) { "on" } else { "off" };
            println!("{name:<10} {state}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(opts: &mut Opts, initialized: bool, words: &[&str]) -> (bool, Option<String>) {
        let args: Vec<String> = words.iter().map(|s| s.to_string()).collect();
        let mut cmdline = None;
        let ok = optparse(opts, initialized, "sh", &args, &mut cmdline);
        (ok, cmdline)
    }

    #[test]
    fn test_defaults() {
        let opts = Opts::default();
        assert!(opts.contains(Opts::GLOB));
        assert!(opts.contains(Opts::STDIN));
        assert!(!opts.contains(Opts::CLOBBER));
        assert!(!opts.contains(Opts::PIPEFAIL));
    }

    #[test]
    fn test_short_toggles() {
        let mut opts = Opts::default();
        // -C turns clobbering off (it is off by default), +C turns it on.
        assert!(parse(&mut opts, false, &["+C"]).0);
        assert!(opts.contains(Opts::CLOBBER));
        assert!(parse(&mut opts, false, &["-C"]).0);
        assert!(!opts.contains(Opts::CLOBBER));

        // Legacy sense: -f disables globbing.
        assert!(parse(&mut opts, false, &["-f"]).0);
        assert!(!opts.contains(Opts::GLOB));
        assert!(parse(&mut opts, false, &["+f"]).0);
        assert!(opts.contains(Opts::GLOB));

        assert!(parse(&mut opts, false, &["-v"]).0);
        assert!(opts.contains(Opts::VERBOSE));
        assert!(parse(&mut opts, false, &["+v"]).0);
        assert!(!opts.contains(Opts::VERBOSE));
    }

    #[test]
    fn test_clustered_flags() {
        let mut opts = Opts::default();
        assert!(parse(&mut opts, false, &["-vC"]).0);
        assert!(opts.contains(Opts::VERBOSE));
        assert!(!opts.contains(Opts::CLOBBER));
    }

    #[test]
    fn test_named_options() {
        let mut opts = Opts::default();
        assert!(parse(&mut opts, true, &["-o", "pipefail"]).0);
        assert!(opts.contains(Opts::PIPEFAIL));
        assert!(parse(&mut opts, true, &["+o", "pipefail"]).0);
        assert!(!opts.contains(Opts::PIPEFAIL));
    }

    #[test]
    fn test_no_prefix_inverts() {
        let mut opts = Opts::default();
        assert!(parse(&mut opts, true, &["-o", "noglob"]).0);
        assert!(!opts.contains(Opts::GLOB));
        // Double inversion: +o noglob enables glob again.
        assert!(parse(&mut opts, true, &["+o", "noglob"]).0);
        assert!(opts.contains(Opts::GLOB));
    }

    #[test]
    fn test_cmdline_capture() {
        let mut opts = Opts::default();
        let (ok, cmdline) = parse(&mut opts, false, &["-c", "echo hi"]);
        assert!(ok);
        assert_eq!(cmdline.as_deref(), Some("echo hi"));
        assert!(opts.contains(Opts::CMDLINE));
        assert!(!opts.contains(Opts::STDIN));
    }

    #[test]
    fn test_cmdline_locked_after_startup() {
        let mut opts = Opts::default();
        let (ok, cmdline) = parse(&mut opts, true, &["-c", "echo hi"]);
        // The complaint is printed, parsing itself still succeeds.
        assert!(ok);
        assert!(cmdline.is_none());
        assert!(!opts.contains(Opts::CMDLINE));
    }

    #[test]
    fn test_stdin_locked_after_startup() {
        let mut opts = Opts::default();
        assert!(parse(&mut opts, true, &["-o", "nostdin"]).0);
        assert!(opts.contains(Opts::STDIN));
        assert!(parse(&mut opts, true, &["+s"]).0);
        assert!(opts.contains(Opts::STDIN));
    }

    #[test]
    fn test_unknown_letter_fails() {
        let mut opts = Opts::default();
        assert!(!parse(&mut opts, false, &["-Z"]).0);
    }

    #[test]
    fn test_unknown_name_continues() {
        let mut opts = Opts::default();
        assert!(parse(&mut opts, true, &["-o", "bogus", "-o", "pipefail"]).0);
        assert!(opts.contains(Opts::PIPEFAIL));
    }

    #[test]
    fn test_bare_o_at_startup_fails() {
        let mut opts = Opts::default();
        assert!(!parse(&mut opts, false, &["-o"]).0);
    }

    #[test]
    fn test_non_dash_word_is_skipped() {
        let mut opts = Opts::default();
        assert!(parse(&mut opts, true, &["word", "-o", "verbose"]).0);
        assert!(opts.contains(Opts::VERBOSE));
    }
}
