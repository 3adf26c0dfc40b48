use std::collections::hash_map::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;

use bucket_hash::HashTable;
use bucket_hash::LoadFactors;
use bucket_hash::hash_table::Entry;
use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    /// Number of values to insert
    #[arg(short = 'n', long = "count", default_value_t = 1000)]
    count: u64,

    /// Lower load factor bound
    #[arg(long = "lower", default_value_t = LoadFactors::DEFAULT_LOWER)]
    lower: f64,

    /// Upper load factor bound
    #[arg(long = "upper", default_value_t = LoadFactors::DEFAULT_UPPER)]
    upper: f64,
}

fn hash_u64(value: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn main() {
    let args = Args::parse();

    let load_factors = match LoadFactors::new(args.lower, args.upper) {
        Ok(load_factors) => load_factors,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let mut table: HashTable<u64> = HashTable::with_capacity_and_load_factors(16, load_factors);
    println!(
        "Filling table with {} u64 values (load factors {} to {})...",
        args.count,
        load_factors.lower(),
        load_factors.upper()
    );

    let mut resizes = 0;
    for value in 0..args.count {
        let capacity = table.capacity();
        match table.entry(hash_u64(value), |&v| v == value) {
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
            Entry::Occupied(_) => {
                panic!("Value already exists in table: {}", value);
            }
        }
        if table.capacity() != capacity {
            resizes += 1;
        }
    }

    println!("Inserted {} values into table", table.len());
    println!(
        "Final capacity {} after {} resizes, load factor {:.2}%",
        table.capacity(),
        resizes,
        table.load_factor() * 100.0
    );

    table.print_chain_histogram();
    table.debug_stats().print();

    println!("Removing every other value...");
    for value in (0..args.count).step_by(2) {
        table.remove(hash_u64(value), |&v| v == value);
    }
    println!(
        "{} values left in {} buckets",
        table.len(),
        table.capacity()
    );
    table.debug_stats().print();
}
