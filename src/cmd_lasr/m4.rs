use clap::*;

use lasr::libs::filter::{select, Dovetail, FilterOpts, SEED_MIN_DEFAULT};
use lasr::libs::las::{LasReader, Overlap};
use lasr::libs::ranges::RangeSet;
use lasr::libs::report::write_m4;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("m4")
        .about("Tabular M4-style summary of selected overlap records")
        .after_help(
            r###"
One line per selected record:

  aId bId score identity 0 aStart aEnd aLen comp bStart bEnd bLen label

* read ids are 0-based and zero-padded to 9 digits
* score is the signed overlap-length estimate `bStart - bEnd`
* identity is `100 - 200*diffs / combined span` (0.00 for degenerate
  zero-span alignments)
* b coordinates are flipped to the forward strand when comp is 1
* label is one of `overlap`, `contains`, `contained`

Examples:
1. Summarize everything:
   lasr m4 align.las

2. Full-length-to-full-length evidence for reads 1-1000:
   lasr m4 --fl align.las 1-1000

"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .index(1)
                .help("Input .las file"),
        )
        .arg(
            Arg::new("ranges")
                .index(2)
                .num_args(0..)
                .help("Read ranges: `n`, `b-e` or `b-#`"),
        )
        .arg(
            Arg::new("overlap")
                .long("overlap")
                .action(ArgAction::SetTrue)
                .help("Only alignments touching sequence boundaries on both ends"),
        )
        .arg(
            Arg::new("falcon")
                .long("falcon")
                .action(ArgAction::SetTrue)
                .requires("overlap")
                .help("FALCON dovetail thresholds instead of exact boundary contact"),
        )
        .arg(
            Arg::new("seed_min")
                .long("seed-min")
                .short('H')
                .num_args(1)
                .value_parser(value_parser!(i32))
                .default_value("8000")
                .help("Minimum a-read length under --falcon"),
        )
        .arg(
            Arg::new("fl")
                .long("fl")
                .action(ArgAction::SetTrue)
                .help("Only full-length-to-full-length alignments"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let infile = args.get_one::<String>("infile").unwrap();
    let tokens: Vec<String> = args
        .get_many::<String>("ranges")
        .unwrap_or_default()
        .cloned()
        .collect();
    let mut writer = intspan::writer(args.get_one::<String>("outfile").unwrap());

    let opts = FilterOpts {
        dovetail: if args.get_flag("overlap") {
            if args.get_flag("falcon") {
                Some(Dovetail::Falcon {
                    seed_min: *args.get_one::<i32>("seed_min").unwrap_or(&SEED_MIN_DEFAULT),
                })
            } else {
                Some(Dovetail::Strict)
            }
        } else {
            None
        },
        full_length: args.get_flag("fl"),
    };

    //----------------------------
    // Process
    //----------------------------
    let ranges = RangeSet::build(&tokens)?;
    let mut reader = LasReader::open(infile)?;

    let mut ovl = Overlap::default();
    let mut cursor = ranges.cursor();
    while reader.read_into(&mut ovl)? {
        if !select(&ovl, &ranges, &mut cursor, &opts) {
            continue;
        }
        write_m4(&mut *writer, &ovl)?;
    }

    Ok(())
}
