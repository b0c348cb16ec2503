// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `herd bench` - Measure how many executions concurrent callers collapse into

use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::{Args, ValueEnum};
use herd_core::{AsyncCoalescer, Coalescer, CoalescerConfig, StatsSnapshot};
use serde::Serialize;
use std::convert::Infallible;
use std::fmt;
use std::sync::{Arc, Barrier};
use std::time::{Duration, Instant};

#[derive(Args)]
pub struct BenchArgs {
    /// Number of concurrent callers
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    pub callers: u32,

    /// Number of distinct keys the callers are spread across
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..))]
    pub keys: u32,

    /// Duration of each operation in milliseconds
    #[arg(long, default_value_t = 50)]
    pub delay_ms: u64,

    /// Run callers as OS threads or as tokio tasks
    #[arg(long, value_enum, default_value = "threads")]
    pub mode: BenchMode,
}

#[derive(Debug, Clone, Copy, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BenchMode {
    Threads,
    Tasks,
}

impl fmt::Display for BenchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchMode::Threads => write!(f, "threads"),
            BenchMode::Tasks => write!(f, "tasks"),
        }
    }
}

#[derive(Serialize)]
struct BenchReport {
    mode: BenchMode,
    callers: u32,
    keys: u32,
    delay_ms: u64,
    elapsed_ms: u64,
    stats: StatsSnapshot,
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mode: {}", self.mode)?;
        writeln!(f, "callers: {} across {} keys", self.callers, self.keys)?;
        writeln!(f, "operation: {}ms", self.delay_ms)?;
        writeln!(f, "elapsed: {}ms", self.elapsed_ms)?;
        writeln!(f, "{}", self.stats)
    }
}

fn bench_key(caller: u32, keys: u32) -> String {
    format!("bench/{}", caller % keys)
}

pub fn bench(args: BenchArgs, config: &CoalescerConfig, format: OutputFormat) -> Result<()> {
    let delay = Duration::from_millis(args.delay_ms);
    let start = Instant::now();

    let stats = match args.mode {
        BenchMode::Threads => bench_threads(&args, config, delay)?,
        BenchMode::Tasks => bench_tasks(&args, config, delay)?,
    };

    let report = BenchReport {
        mode: args.mode,
        callers: args.callers,
        keys: args.keys,
        delay_ms: args.delay_ms,
        elapsed_ms: start.elapsed().as_millis() as u64,
        stats,
    };
    tracing::info!(mode = %report.mode, elapsed_ms = report.elapsed_ms, "bench finished");
    output::print(&report, format);
    Ok(())
}

fn bench_threads(
    args: &BenchArgs,
    config: &CoalescerConfig,
    delay: Duration,
) -> Result<StatsSnapshot> {
    let coalescer: Coalescer<Vec<u8>, Infallible> = Coalescer::with_config(config)?;
    let barrier = Barrier::new(args.callers as usize);

    std::thread::scope(|s| {
        for caller in 0..args.callers {
            let coalescer = &coalescer;
            let barrier = &barrier;
            let key = bench_key(caller, args.keys);
            s.spawn(move || {
                barrier.wait();
                let _ = coalescer.run(&key, || {
                    std::thread::sleep(delay);
                    Ok(key.clone().into_bytes())
                });
            });
        }
    });

    Ok(coalescer.stats())
}

fn bench_tasks(args: &BenchArgs, config: &CoalescerConfig, delay: Duration) -> Result<StatsSnapshot> {
    let coalescer: Arc<AsyncCoalescer<Vec<u8>, Infallible>> =
        Arc::new(AsyncCoalescer::with_config(config)?);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let barrier = Arc::new(tokio::sync::Barrier::new(args.callers as usize));
        let handles: Vec<_> = (0..args.callers)
            .map(|caller| {
                let coalescer = Arc::clone(&coalescer);
                let barrier = Arc::clone(&barrier);
                let key = bench_key(caller, args.keys);
                tokio::spawn(async move {
                    barrier.wait().await;
                    let _ = coalescer
                        .run(&key, || async {
                            tokio::time::sleep(delay).await;
                            Ok(key.clone().into_bytes())
                        })
                        .await;
                })
            })
            .collect();

        for handle in handles {
            handle.await?;
        }
        Ok::<_, anyhow::Error>(())
    })?;

    Ok(coalescer.stats())
}
