mod foreach;
mod matmul;

use clap::Parser;
use ndspan::{Array, Dimension, NdError};
use rand::{distributions::Uniform, rngs::SmallRng, Rng, SeedableRng};
use std::hint::black_box;

/// Extents of benchmarked arrays, capped by `--max-size`
const SIZES: [usize; 4] = [8, 64, 512, 1024];

/// Timing of element access through ndspan arrays and views
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Largest extent of benchmarked arrays
    #[arg(long, default_value_t = 1024)]
    max_size: usize,
    /// Largest number of elements of one benchmarked array, bigger ones are skipped
    #[arg(long, default_value_t = 1 << 24)]
    max_numel: usize,
    /// Repetitions of each benchmark
    #[arg(long, default_value_t = 5)]
    iters: usize,
    /// Seed for random inputs
    #[arg(long, default_value_t = 420_694_206_942_069)]
    seed: u64,
    /// Run only benchmarks whose name contains this string
    filter: Option<String>,
}

pub struct Bench {
    iters: usize,
    max_numel: usize,
    filter: Option<String>,
    sizes: Vec<usize>,
    rng: SmallRng,
}

impl Bench {
    fn new(args: Args) -> Self {
        Self {
            iters: args.iters.max(1),
            max_numel: args.max_numel,
            filter: args.filter,
            sizes: SIZES.into_iter().filter(|&n| n <= args.max_size).collect(),
            rng: SmallRng::seed_from_u64(args.seed),
        }
    }

    pub fn sizes(&self) -> Vec<usize> {
        self.sizes.clone()
    }

    /// True if at least one of `names` passes the filter and
    /// arrays of `numel` elements are not too big
    pub fn wants(&self, names: &[&str], numel: usize) -> bool {
        numel <= self.max_numel && names.iter().any(|name| self.enabled(name))
    }

    fn enabled(&self, name: &str) -> bool {
        self.filter.as_deref().map_or(true, |filter| name.contains(filter))
    }

    /// Array filled with uniform random numbers from [-1, 1)
    pub fn random<D: Dimension>(&mut self, shape: D) -> Result<Array<f32, D>, NdError> {
        let range = Uniform::new(-1f32, 1.);
        let rng = &mut self.rng;
        Array::from_shape_iter(shape, (0..shape.size()).map(|_| rng.sample(&range)))
    }

    pub fn run(&self, name: &str, n: usize, mut bench_fn: impl FnMut() -> f32) {
        if !self.enabled(name) {
            return;
        }
        print!("Running {name} with n = {n} ... ");
        let begin = std::time::Instant::now();
        let mut checksum = 0f32;
        for _ in 0..self.iters {
            checksum += black_box(bench_fn());
        }
        let elapsed = begin.elapsed().as_nanos();
        println!(
            "checksum {checksum:.3}, time per iteration: {:.3} ms",
            elapsed as f32 / self.iters as f32 / 1000000.
        );
    }
}

fn main() -> Result<(), NdError> {
    let mut bench = Bench::new(Args::parse());
    println!("\nBenchmarking element access");
    foreach::run(&mut bench)?;
    println!("\nBenchmarking naive matrix multiplication");
    matmul::run(&mut bench)?;
    Ok(())
}
