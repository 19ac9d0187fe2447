//! Synthetic log generator for stress testing chainsaw.
//!
//! Usage: cargo run --features gen-test --bin gen_test -- [lines] [output] [days]
//! Example: cargo run --features gen-test --bin gen_test -- 1000000 heavy_test.log 7

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::Rng;
use rand::seq::SliceRandom;
use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};

const LEVELS: &[&str] = &["TRACE", "DEBUG", " INFO", " WARN", "ERROR"];

const THREADS: &[&str] = &["main", "http-nio-8080-exec-1", "scheduling-1", "pool-2-thread-7"];

const LOGGERS: &[&str] = &[
    "o.s.b.w.embedded.tomcat.TomcatWebServer",
    "c.example.billing.InvoiceService",
    "c.example.auth.TokenFilter",
    "o.h.engine.jdbc.spi.SqlExceptionHelper",
];

const MESSAGES: &[&str] = &[
    "Request completed in 12 ms",
    "Cache miss for key user:42",
    "Scheduled job finished",
    "Connection pool exhausted, waiting",
    "Привет, мир - unicode survives",
    "",
];

const BANNER: &[&str] = &[
    "  .   ____          _            __ _ _",
    " /\\\\ / ___'_ __ _ _(_)_ __  __ _ \\ \\ \\ \\",
    "( ( )\\___ | '_ | '_| | '_ \\/ _` | \\ \\ \\ \\",
    " :: Startup banner without a date ::",
];

fn main() {
    let args: Vec<String> = env::args().collect();

    let count: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(1_000_000);

    let output = args.get(2).map(|s| s.as_str()).unwrap_or("heavy_test.log");

    let days: i64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(7).max(1);

    println!("🪚 Log Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Lines:  {}", count);
    println!("   Output: {}", output);
    println!("   Days:   {}", days);
    println!();

    let file = File::create(output).expect("Failed to create output file");
    let mut writer = BufWriter::with_capacity(1024 * 1024, file); // 1MB buffer
    let mut rng = rand::thread_rng();

    let start_time = std::time::Instant::now();
    let start = NaiveDate::from_ymd_opt(2023, 9, 8)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid start date");
    // Spread lines evenly across the requested days, in chronological order.
    let step_ms = (days * 86_400_000) / count.max(1) as i64;

    let mut written = 0usize;
    for line in BANNER {
        writeln!(writer, "{}", line).unwrap();
        written += 1;
    }

    let mut i = 0usize;
    while written < count {
        let at = start + Duration::milliseconds(step_ms * i as i64);
        written += write_entry(&mut writer, &mut rng, at);
        i += 1;

        if i % 100_000 == 0 {
            print!("\r   Progress: {:.1}%", written as f64 / count as f64 * 100.0);
            std::io::stdout().flush().unwrap();
        }
    }

    writer.flush().unwrap();
    println!("\r   Progress: 100.0%");
    println!();
    println!(
        "✅ Wrote {} lines in {:.2}s",
        written,
        start_time.elapsed().as_secs_f64()
    );
}

/// Writes one entry, sometimes followed by a stack trace. Returns lines written.
fn write_entry<W: Write, R: Rng>(writer: &mut W, rng: &mut R, at: NaiveDateTime) -> usize {
    let level = LEVELS.choose(rng).unwrap();
    writeln!(
        writer,
        "{} {} {} --- [{}] {} : {}",
        at.format("%Y-%m-%d %H:%M:%S%.3f"),
        level,
        rng.gen_range(1000..99999),
        THREADS.choose(rng).unwrap(),
        LOGGERS.choose(rng).unwrap(),
        MESSAGES.choose(rng).unwrap(),
    )
    .unwrap();

    if *level != "ERROR" {
        return 1;
    }

    let depth = rng.gen_range(2..12);
    writeln!(writer, "java.lang.IllegalStateException: generated failure").unwrap();
    for frame in 0..depth {
        writeln!(
            writer,
            "\tat com.example.service.Layer{}.call(Layer{}.java:{})",
            frame,
            frame,
            rng.gen_range(10..500)
        )
        .unwrap();
    }
    2 + depth
}
