//! Multi-threaded stress tester for the global logger
//!
//! Every thread logs random messages at random priorities through the
//! global logger, which writes to two identical files, an errors-only file,
//! stdout, and stderr (Warning and above). At shutdown the verification
//! hook checks that both full logs match line for line and that the errors
//! file holds exactly the requested number of error messages.
//!
//! Run with: cargo run --example stress_tester -- [threads] [runs-per-thread]

use multi_logger::prelude::*;
use multi_logger::log_global;
use rand::Rng;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

const ALL_LOGS_1: &str = "all_logs1.txt";
const ALL_LOGS_2: &str = "all_logs2.txt";
const ERROR_LOGS: &str = "errors.txt";

struct Person {
    first_name: String,
    last_name: String,
    age: u32,
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}:{}]", self.first_name, self.last_name, self.age)
    }
}

fn random_text(rng: &mut impl Rng, min: usize, max: usize) -> String {
    let len = rng.gen_range(min..=max);
    (0..len).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .map_err(|e| LoggerError::io_operation("reading log file", path.display().to_string(), e))?;
    Ok(content.lines().map(str::to_owned).collect())
}

fn verify(total: usize, requested_errors: u64, dir: PathBuf) -> Result<()> {
    println!("total requests: {}", total);

    let all1 = read_lines(&dir.join(ALL_LOGS_1))?;
    let all2 = read_lines(&dir.join(ALL_LOGS_2))?;
    let matched = all1.iter().zip(&all2).filter(|(a, b)| a == b).count();
    println!(
        "comparing the contents of {} and {}: logged: {} matched: {}",
        ALL_LOGS_1,
        ALL_LOGS_2,
        all1.len(),
        matched
    );

    let errors = read_lines(&dir.join(ERROR_LOGS))?;
    println!(
        "verifying error threshold log file {}: requested: {} logged: {}",
        ERROR_LOGS,
        requested_errors,
        errors.len()
    );

    if all1.len() != all2.len() || matched != all1.len() {
        return Err(LoggerError::verification(format!(
            "{} and {} differ",
            ALL_LOGS_1, ALL_LOGS_2
        )));
    }
    if errors.len() as u64 != requested_errors {
        return Err(LoggerError::verification(format!(
            "{} requested errors but {} logged",
            requested_errors,
            errors.len()
        )));
    }
    Ok(())
}

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let threads: usize = args.next().and_then(|a| a.parse().ok()).unwrap_or(8);
    let runs: usize = args.next().and_then(|a| a.parse().ok()).unwrap_or(10);
    let dir = env::current_dir()?;

    let logger = global_logger();
    logger.set_category("tester");
    logger.set_global_threshold(Priority::Debug);

    let verify_dir = dir.clone();
    logger.set_verification_callback(move |requested| verify(threads * runs, requested, verify_dir));

    logger.add_file_destination(ALL_LOGS_1, dir.join(ALL_LOGS_1))?;
    logger.add_file_destination(ALL_LOGS_2, dir.join(ALL_LOGS_2))?;
    logger.add_destination_with_threshold(
        ERROR_LOGS,
        logger.error_threshold(),
        FileDestination::create(dir.join(ERROR_LOGS))?,
    );
    logger.add_destination("stdout", StdoutDestination::new());
    logger.add_destination_with_threshold("stderr", Priority::Warning, StderrDestination::new());

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            thread::spawn(move || {
                let mut rng = rand::thread_rng();
                for i in 0..runs {
                    // Simulated work between log calls
                    thread::sleep(Duration::from_millis(rng.gen_range(10..=50)));

                    let person = Person {
                        first_name: random_text(&mut rng, 4, 8),
                        last_name: random_text(&mut rng, 8, 16),
                        age: rng.gen_range(1..=100),
                    };
                    let priority = Priority::ALL[rng.gen_range(0..Priority::ALL.len())];
                    log_global!(
                        priority,
                        "{}: Let's log some random text: {} then a random number {} then another random number {} then a user class instantiated with random values {}",
                        i,
                        random_text(&mut rng, 1, 20),
                        rng.gen_range(10_000..=1_000_000_000),
                        rng.gen_range(1.0..10.0),
                        person
                    );
                }
            })
        })
        .collect();

    for handle in handles {
        if handle.join().is_err() {
            eprintln!("a tester thread panicked");
        }
    }

    shutdown_global()
}
