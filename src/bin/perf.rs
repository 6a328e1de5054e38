use log::{error, info};
use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use structopt::StructOpt;

use std::{
    fs,
    io::{self, BufRead},
    path, process, time,
};

use rbtree::RbTree;

/// Command line options.
#[derive(Clone, StructOpt)]
pub struct Opt {
    /// Word list, one value per line. When missing random numbers
    /// are loaded instead.
    #[structopt(long = "file", parse(from_os_str))]
    file: Option<path::PathBuf>,

    #[structopt(long = "seed")]
    seed: Option<u64>,

    #[structopt(long = "loads", default_value = "1000000")] // default 1M
    loads: usize,

    #[structopt(long = "gets", default_value = "1000000")] // default 1M
    gets: usize,

    #[structopt(long = "log-level", default_value = "info")]
    log_level: LevelFilter,
}

fn main() {
    let opts = Opt::from_args();

    let mode = TerminalMode::Mixed;
    if let Err(err) = TermLogger::init(opts.log_level, Config::default(), mode, ColorChoice::Auto) {
        eprintln!("logger: {}", err);
    }

    let seed = opts.seed.unwrap_or_else(random);
    info!("perf seed {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let res = match opts.file.as_ref() {
        Some(file) => do_words(file, &mut rng),
        None => {
            do_numbers(&opts, &mut rng);
            Ok(())
        }
    };

    if let Err(err) = res {
        error!("perf failed: {}", err);
        process::exit(1);
    }
}

fn do_words(file: &path::Path, rng: &mut SmallRng) -> io::Result<()> {
    let reader = io::BufReader::new(fs::File::open(file)?);
    let words = reader.lines().collect::<io::Result<Vec<String>>>()?;

    let mut index: RbTree<String> = RbTree::new();

    let start = time::Instant::now();
    for word in words.iter() {
        if let Err(err) = index.insert(word.clone()) {
            error!("insert {:?}: {}", word, err);
        }
    }
    println!(
        "loaded {} words from {:?} in {:?}",
        index.len(),
        file,
        start.elapsed()
    );

    if words.is_empty() {
        return Ok(());
    }

    let word = &words[rng.gen_range(0..words.len())];
    let start = time::Instant::now();
    let found = index.search(word.as_str());
    let elapsed = start.elapsed();
    match found {
        Some(nref) => println!("search {:?} found {:?} in {:?}", word, nref.as_value(), elapsed),
        None => println!("search {:?} missing, took {:?}", word, elapsed),
    }

    if let (Some(min), Some(max)) = (index.minimum(), index.maximum()) {
        println!("minimum {:?} maximum {:?}", min.as_value(), max.as_value());
    }
    report(&index);

    Ok(())
}

fn do_numbers(opts: &Opt, rng: &mut SmallRng) {
    let mut index: RbTree<u64> = RbTree::new();

    let start = time::Instant::now();
    for _i in 0..opts.loads {
        let value: u64 = rng.gen();
        if let Err(err) = index.insert(value) {
            error!("insert {}: {}", value, err);
        }
    }
    println!("loaded {} items in {:?}", index.len(), start.elapsed());

    let start = time::Instant::now();
    let mut n_found = 0;
    for _i in 0..opts.gets {
        let key: u64 = rng.gen();
        if index.search(&key).is_some() {
            n_found += 1;
        }
    }
    println!(
        "searched {} keys, found {}, took {:?}",
        opts.gets,
        n_found,
        start.elapsed()
    );

    let start = time::Instant::now();
    let n = index.iter().count();
    println!("iter for iterating {}, took {:?}", n, start.elapsed());

    report(&index);
}

fn report<T>(index: &RbTree<T>)
where
    T: Ord + std::fmt::Debug,
{
    let start = time::Instant::now();
    match index.validate() {
        Ok(()) => info!("validated {} nodes in {:?}", index.len(), start.elapsed()),
        Err(err) => error!("validate: {}", err),
    }
    println!("height {} for {} nodes", index.height(), index.len());
}
