use anyhow::Context;
use clap::Parser;
use dfa_minimize::{
    automaton::dfa::{equivalence::EquivalenceTable, minimization::Minimizable, DFA},
    config::{OutputFormat, RunConfig},
    logger::{LogLevel, Logger},
    validation::same_language::distinguishing_word,
};
use itertools::Itertools;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

#[derive(Parser, Debug)]
#[command(name = "DFA Minimizer")]
#[command(version = "0.1")]
#[command(about = "Find equivalent states of a DFA and build its minimal automaton", long_about = None)]
struct Args {
    /// Automaton in the json structural form.
    file: String,

    #[arg(short, long)]
    config: Option<String>,

    /// Overrides the output format of the config. `pairs` and `table` always
    /// describe the input automaton as loaded, before any pruning.
    #[arg(short, long)]
    output: Option<OutputFormat>,

    /// Remove states that are unreachable from the initial state before
    /// minimizing. Only affects `json` and `dot` output.
    #[arg(short, long)]
    prune_unreachable: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = RunConfig::from_optional_file(args.config.as_ref())?;
    let mut minimize_config = config.get_minimize().clone();
    if let Some(output) = args.output {
        minimize_config.set_output(output);
    }
    if args.prune_unreachable {
        minimize_config.set_prune_unreachable(true);
    }
    config.set_minimize(minimize_config);

    let level = if *config.get_logger().get_enabled() {
        config.get_logger().get_log_level().to_level_filter()
    } else {
        LogLevel::Error.to_level_filter()
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(level),
        )
        .init();

    let logger = Logger::from_config(config.get_logger(), "minimize".into())
        .context("failed to create logger")?;

    let res = run(&args.file, &config, logger.as_ref());
    if let (Err(e), Some(logger)) = (&res, &logger) {
        logger.error(&format!("{:#}", e));
    }

    res
}

fn run(file: &str, config: &RunConfig, logger: Option<&Logger>) -> anyhow::Result<()> {
    let dfa = DFA::<String>::from_json_file(file)
        .with_context(|| format!("failed to load automaton from {}", file))?;

    if let Some(logger) = logger {
        logger.info(&format!(
            "Loaded automaton with {} states and {} transitions from {}",
            dfa.state_count(),
            dfa.transition_count(),
            file
        ));
        logger.debug(&format!("{:?}", dfa));
    }

    let minimize_config = config.get_minimize();
    let table = dfa
        .equivalence_table()
        .context("failed to compute equivalent states")?;
    let minimized = if *minimize_config.get_prune_unreachable() {
        dfa.minimize_with(minimize_config)
    } else {
        dfa.minimize_by(&table)
    }
    .context("failed to minimize automaton")?;

    let verify_word_length = *minimize_config.get_verify_word_length();
    if verify_word_length > 0 {
        if let Some(word) = distinguishing_word(&dfa, &*minimized, verify_word_length)? {
            anyhow::bail!(
                "minimized automaton differs from the original on {:?}",
                word.iter().join(" ")
            );
        }
    }

    if let Some(logger) = logger {
        logger
            .object("Minimization")
            .add_field("states", dfa.state_count())
            .add_field("equivalent pairs", table.equivalent_pairs().len())
            .add_field("minimal states", minimized.state_count())
            .add_field("verified up to length", verify_word_length)
            .log(LogLevel::Info);
    }

    print!(
        "{}",
        render(&dfa, &table, &minimized, *minimize_config.get_output())?
    );

    Ok(())
}

/// Renders the requested output. `pairs` and `table` describe `dfa` through
/// `table`, `json` and `dot` describe `minimized`.
fn render(
    dfa: &DFA<String>,
    table: &EquivalenceTable,
    minimized: &DFA<String>,
    output: OutputFormat,
) -> anyhow::Result<String> {
    Ok(match output {
        OutputFormat::Json => format!("{}\n", minimized.to_json()?),
        OutputFormat::Dot => format!("{}\n", minimized.to_graphviz()),
        OutputFormat::Pairs => {
            let states = dfa.states().collect_vec();
            let mut pairs = String::new();
            for (i, j) in table.equivalent_pairs() {
                pairs.push_str(&format!(
                    "{} {}\n",
                    dfa.label(states[i])?,
                    dfa.label(states[j])?
                ));
            }
            pairs
        }
        OutputFormat::Table => table.to_string(),
    })
}
