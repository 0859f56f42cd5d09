use clap::{value_parser, Arg, ArgAction, Command, ValueHint};
use pepmap_cli::input::Input;
use pepmap_cli::runner::Runner;
use pepmap_core::localize::Localization;

fn parse_localization(s: &str) -> Result<Localization, String> {
    s.parse()
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::default()
        .filter_level(log::LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("PEPMAP_LOG", "error,pepmap=info"))
        .init();

    let matches = Command::new("pepmap")
        .version(clap::crate_version!())
        .about("Map peptides and their modifications onto reference protein sequences")
        .arg(
            Arg::new("species")
                .short('s')
                .long("sp")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help("Species name as it appears in the database accessions (case sensitive)"),
        )
        .arg(
            Arg::new("ifile")
                .short('i')
                .long("ifile")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help("Tab-delimited search results to map")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("ofile")
                .short('o')
                .long("ofile")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help("Path where mapped results will be written")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("pep")
                .short('p')
                .long("pep")
                .value_parser(value_parser!(usize))
                .help("Column index of the plain peptide in the input file"),
        )
        .arg(
            Arg::new("mod")
                .short('m')
                .long("mod")
                .value_parser(value_parser!(usize))
                .help("Column index of the modified peptide in the input file"),
        )
        .arg(
            Arg::new("acc")
                .short('a')
                .long("acc")
                .value_parser(value_parser!(usize))
                .help("Column index of the protein accession in the input file"),
        )
        .arg(
            Arg::new("conf")
                .short('c')
                .long("conf")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help("Modification configuration used for searching")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("fasta")
                .short('f')
                .long("fasta")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help("Path to FASTA database (default = uniprot_sprot.fasta)")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("parameters")
                .long("parameters")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help(
                    "Path to a JSON parameter file. Command line arguments override \
                     values set in the file.",
                )
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("decoy")
                .long("decoy")
                .action(ArgAction::Append)
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help("Accession marker of entries to exclude (default = _crap, Random_)"),
        )
        .arg(
            Arg::new("localization")
                .long("localization")
                .value_parser(parse_localization)
                .help(
                    "How modification positions are computed: `reference` offset arithmetic \
                     on the annotated peptide, or `residue` alignment (default = reference)",
                ),
        )
        .arg(
            Arg::new("match-label")
                .long("match-label")
                .help("Text written in the last column of every output row (default = No)"),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .value_parser(value_parser!(u16).range(1..))
                .help("Number of threads used to map rows (default = # of CPUs)")
                .value_hint(ValueHint::Other),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    if let Some(threads) = matches.get_one::<u16>("threads").copied() {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads as usize)
            .build_global()?;
    }

    let settings = Input::from_arguments(matches)?.build()?;
    log::debug!("{}", serde_json::to_string_pretty(&settings)?);

    let runner = Runner::new(settings)?;
    runner.run()?;

    Ok(())
}
