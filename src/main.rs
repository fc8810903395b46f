//! Card Forge CLI - synthetic card records, BIN selection and Luhn checks.
//!
//! ```bash
//! card-forge generate --bin 451710 --count 10
//! card-forge generate --bin 371234 --count 5 --format json --seed 42
//! card-forge select-bins --csv binlist-data.csv --count 40
//! card-forge validate "4517 1095 1234 5674"
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use card_forge::{
    country_distribution, luhn, save_json, save_report, save_selection, AddressBook, BinSelector,
    BrandRegistry, GeneratorConfig, OutputFormat, RecordAssembler,
};

/// Synthetic payment-card and identity generator for test data
#[derive(Parser)]
#[command(name = "card-forge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate card + person records for a BIN
    Generate {
        /// BIN (leading digits of the card number)
        #[arg(short, long)]
        bin: Option<String>,

        /// Number of records
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// BIN database JSON
        #[arg(long)]
        bin_db: Option<PathBuf>,

        /// Address database JSON
        #[arg(long)]
        address_db: Option<PathBuf>,

        /// JSON config file (flags override it)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Pick debit BINs from a binlist CSV into BIN database format
    SelectBins {
        /// binlist CSV file
        #[arg(long, default_value = "binlist-data.csv")]
        csv: PathBuf,

        /// Number of BINs to select
        #[arg(short = 'n', long, default_value = "40")]
        count: usize,

        /// Plain random sample instead of one-per-country first
        #[arg(long)]
        no_diversity: bool,

        /// Output JSON file
        #[arg(short, long, default_value = "selected-debit-cards.json")]
        output: PathBuf,

        /// RNG seed for reproducible selection
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Check a card number against the Luhn checksum
    Validate {
        /// Card number (spaces allowed)
        number: String,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            debug!(seed, "Using seeded RNG");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Generate {
            bin,
            count,
            output,
            format,
            seed,
            bin_db,
            address_db,
            config,
        } => {
            let mut cfg = match config {
                Some(path) => GeneratorConfig::from_file(path)?,
                None => GeneratorConfig::default(),
            };
            cfg.apply_env()?;

            if let Some(bin) = bin {
                cfg.bin = bin;
            }
            if let Some(count) = count {
                cfg.quantity = count;
            }
            if let Some(format) = format {
                cfg.output_format = format.into();
            }
            if let Some(output) = output {
                cfg.output_path = output;
            } else if cfg.output_format == OutputFormat::Json {
                cfg.output_path = cfg.output_path.with_extension("json");
            }
            if seed.is_some() {
                cfg.seed = seed;
            }
            if let Some(path) = bin_db {
                cfg.bin_db_path = path;
            }
            if let Some(path) = address_db {
                cfg.address_db_path = path;
            }

            run_generate(&cfg, cli.quiet)
        }
        Commands::SelectBins {
            csv,
            count,
            no_diversity,
            output,
            seed,
        } => run_select(&csv, count, !no_diversity, &output, seed, cli.quiet),
        Commands::Validate { number } => run_validate(&number),
    }
}

fn run_generate(cfg: &GeneratorConfig, quiet: bool) -> Result<()> {
    cfg.validate()?;

    if !quiet {
        println!("🚀 Card Forge v{} - Card and Person Information Generator", card_forge::VERSION);
        println!("{}", "=".repeat(80));
        println!("📋 Configuration:");
        println!("   BIN: {}", cfg.bin);
        println!("   Quantity: {}", cfg.quantity);
        println!();
    }

    let registry = BrandRegistry::load_or_empty(&cfg.bin_db_path);
    let addresses = AddressBook::load_or_empty(&cfg.address_db_path);
    let assembler = RecordAssembler::new(&registry, &addresses);
    let mut rng = make_rng(cfg.seed);

    if !quiet {
        println!("🔄 Generating...");
    }
    let records = assembler.assemble(&cfg.bin, cfg.quantity, &mut rng)?;

    if !quiet {
        println!("💾 Saving to {}...", cfg.output_path.display());
    }
    match cfg.output_format {
        OutputFormat::Text => save_report(&cfg.output_path, &records)?,
        OutputFormat::Json => save_json(&cfg.output_path, &records)?,
    }

    if quiet {
        return Ok(());
    }

    println!();
    println!("✅ Generation complete!");
    println!("📄 File saved: {}", cfg.output_path.display());
    println!("📊 Generated {} records", records.len());
    println!();

    if let Some(first) = records.first() {
        println!("📝 Example (first record):");
        println!("   Name: {}", first.name);
        println!("   Card: {}", first.card.card_number);
        println!("   Expiry: {}", first.card.expiry);
        println!("   CVV: {}", first.card.cvv);
        println!(
            "   Address: {}, {}, {}",
            first.address.street, first.address.city, first.address.state
        );
    }

    Ok(())
}

fn run_select(
    csv: &Path,
    count: usize,
    diversity: bool,
    output: &Path,
    seed: Option<u64>,
    quiet: bool,
) -> Result<()> {
    if !quiet {
        println!("🃏 Random Debit Card Selector");
        println!("{}", "=".repeat(80));
        println!("\n📖 Reading {}...", csv.display());
    }

    let selector = BinSelector::from_csv(csv)
        .with_context(|| format!("Failed to load BIN list: {}", csv.display()))?;

    if !quiet {
        println!("✓ Processed {} total rows", selector.processed());
        println!("✓ Found {} valid debit cards", selector.candidate_count());
        println!("✓ From {} different countries", selector.country_count());
    }

    let mut rng = make_rng(seed);
    let selected = selector.select(count, diversity, &mut rng);

    save_selection(output, &selected)
        .with_context(|| format!("Failed to save selection: {}", output.display()))?;

    if quiet {
        return Ok(());
    }

    println!("\n{}", "=".repeat(80));
    println!("SELECTED DEBIT CARDS ({} cards)", selected.len());
    println!("{}\n", "=".repeat(80));

    for (i, card) in selected.iter().enumerate() {
        let p = &card.profile;
        println!("{}. BIN: {}", i + 1, card.bin);
        println!("   Brand: {} ({})", p.brand, p.scheme.as_deref().unwrap_or("unknown"));
        println!("   Country: {} ({})", p.country_name, p.country);
        println!("   Bank: {}", p.bank);
        println!("   Length: {} digits, CVV: {} digits", p.length, p.cvv_length);
        println!();
    }

    println!("{}", "=".repeat(80));
    println!("COUNTRY DISTRIBUTION IN SELECTION");
    println!("{}", "=".repeat(80));
    let distribution = country_distribution(&selected);
    for (country, (name, n)) in &distribution {
        println!("  {} ({}): {} card(s)", country, name, n);
    }

    println!("\n✓ Saved {} cards to {}", selected.len(), output.display());
    println!(
        "\n✅ Done! Selected {} debit cards from {} countries",
        selected.len(),
        distribution.len()
    );

    Ok(())
}

fn run_validate(number: &str) -> Result<()> {
    let digits: String = number.chars().filter(|c| !c.is_whitespace()).collect();

    if luhn::is_valid(&digits) {
        println!("✅ {} passes the Luhn check", digits);
        Ok(())
    } else {
        eprintln!("❌ {} fails the Luhn check", digits);
        std::process::exit(1);
    }
}
