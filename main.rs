use std::{env, process::exit, sync::Arc};
use sysrandom::{GrndFlags, LibcVersion, SeededSource, source};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_COUNT: usize = 32;

/// Upper bound on the byte count accepted on the command line (1 MiB).
const MAX_COUNT: usize = 1 << 20;

struct Opts {
    /// Flags passed to getrandom.
    flags: GrndFlags,

    /// Use getentropy semantics instead of getrandom.
    entropy: bool,

    /// Seed for the deterministic source, if any.
    seed: Option<u64>,

    /// Report the host C library version and exit.
    check_libc: bool,

    /// Number of bytes to print.
    count: usize,
}

fn main() {
    setup_logging();

    let args: Vec<String> = env::args().collect();
    let opts = match parse_opts(&args) {
        Ok(opts) => opts,
        Err(msg) => {
            eprintln!("error: {}", msg);
            eprintln!(
                "usage: sysrandom [--nonblock] [--random] [--insecure] [--entropy] [--seed <n>] [--check-libc] [count]"
            );
            exit(1);
        }
    };

    if opts.check_libc {
        check_libc();
        return;
    }

    if let Some(seed) = opts.seed {
        match SeededSource::new(seed) {
            Ok(seeded) => source::install(Arc::new(seeded)),
            Err(e) => {
                eprintln!("error: {}", e);
                exit(1);
            }
        }
    }

    let source = source::active();
    debug!(
        "reading {} bytes from {} source, flags={}",
        opts.count,
        source.name(),
        opts.flags.describe()
    );

    let mut buf = vec![0u8; opts.count];
    let result = if opts.entropy {
        source::getentropy(source.as_ref(), &mut buf)
    } else {
        sysrandom::fill_exact(source.as_ref(), &mut buf, opts.flags)
    };
    if let Err(e) = result {
        eprintln!("error: {}", e);
        exit(1);
    }

    println!("{}", to_hex(&buf));
}

fn check_libc() {
    match LibcVersion::host() {
        Some(version) if version.declares_getrandom() => {
            println!("glibc {}: getrandom and getentropy declared", version);
        }
        Some(version) => {
            println!(
                "glibc {}: getrandom and getentropy require glibc {} or later",
                version,
                LibcVersion::GETRANDOM
            );
        }
        None => println!("not linked against glibc"),
    }
}

fn parse_opts(args: &[String]) -> Result<Opts, String> {
    let mut opts = Opts {
        flags: GrndFlags::empty(),
        entropy: false,
        seed: None,
        check_libc: false,
        count: DEFAULT_COUNT,
    };
    let mut count: Option<usize> = None;
    let mut i = 1; // Skip program name
    while i < args.len() {
        match args[i].as_str() {
            "--nonblock" => opts.flags |= GrndFlags::NONBLOCK,
            "--random" => opts.flags |= GrndFlags::RANDOM,
            "--insecure" => opts.flags |= GrndFlags::INSECURE,
            "--entropy" => opts.entropy = true,
            "--check-libc" => opts.check_libc = true,
            "--seed" => {
                i += 1;
                let value = args.get(i).ok_or("--seed requires a value")?;
                opts.seed = Some(parse_seed(value)?);
            }
            arg if arg.starts_with("--") => return Err(format!("unknown option: {}", arg)),
            arg if count.is_none() => {
                count = Some(
                    arg.parse()
                        .map_err(|_| format!("invalid byte count: {}", arg))?,
                );
            }
            arg => return Err(format!("unexpected argument: {}", arg)),
        }
        i += 1;
    }
    if let Some(count) = count {
        if count > MAX_COUNT {
            return Err(format!("byte count {} exceeds maximum of {}", count, MAX_COUNT));
        }
        opts.count = count;
    }
    GrndFlags::validate(opts.flags.bits()).map_err(|e| e.to_string())?;
    if opts.entropy && !opts.flags.is_empty() {
        return Err("--entropy does not take getrandom flags".to_string());
    }
    Ok(opts)
}

/// Accepts decimal or `0x`-prefixed hexadecimal.
fn parse_seed(value: &str) -> Result<u64, String> {
    let parsed = match value.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|_| format!("invalid seed: {}", value))
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}
