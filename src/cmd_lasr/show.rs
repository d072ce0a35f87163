use anyhow::anyhow;
use clap::*;
use std::io::Write;
use std::path::Path;

use lasr::libs::align::{AlignService, BaseAligner, Schematic};
use lasr::libs::fadb::FaDb;
use lasr::libs::filter::{select, Dovetail, FilterOpts, SEED_MIN_DEFAULT};
use lasr::libs::las::{LasReader, Overlap};
use lasr::libs::ranges::RangeSet;
use lasr::libs::report::{
    compact_coords, compact_trailer, group_digits, write_banner, write_compact, DisplayParams,
    ReportMode,
};

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("show")
        .about("Lists selected overlap records, as intervals, cartoons or alignments")
        .after_help(
            r###"
Streams the records of a .las overlap file in increasing a-read order,
keeps the ones selected by read ranges and geometry filters, and prints
one line (or block) per record.

Read ranges are 1-based and inclusive: a single index `5`, a bounded
range `3-10`, or an open range `3-#`. Overlapping or adjacent ranges
are merged. Without ranges, every record is selected.

Notes:
* `.las.gz` input is decompressed transparently
* `--falcon` switches `--overlap` to the 1000bp FALCON thresholds and
  additionally drops records whose a read is shorter than --seed-min
* `--align` needs the reads as FASTA; indices follow record order

Examples:
1. Compact listing of reads 1-3:
   lasr show align.las 1-3

2. Dovetail overlaps only, as cartoons:
   lasr show --overlap --cartoon align.las

3. Base-level alignments:
   lasr show --align --db reads.fa align.las 5-#

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
            Arg::new("cartoon")
                .long("cartoon")
                .short('c')
                .action(ArgAction::SetTrue)
                .conflicts_with("align")
                .help("Draw an overlap cartoon per record"),
        )
        .arg(
            Arg::new("align")
                .long("align")
                .short('a')
                .action(ArgAction::SetTrue)
                .requires("db")
                .help("Print the reconstructed base-level alignment per record"),
        )
        .arg(
            Arg::new("db")
                .long("db")
                .num_args(1)
                .help("FASTA file with the reads, in aligner order"),
        )
        .arg(
            Arg::new("db2")
                .long("db2")
                .num_args(1)
                .requires("db")
                .help("Separate FASTA file for the b reads"),
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
            Arg::new("indent")
                .long("indent")
                .short('i')
                .num_args(1)
                .value_parser(value_parser!(usize))
                .default_value("4")
                .help("Indent of cartoons and alignments"),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .short('w')
                .num_args(1)
                .value_parser(value_parser!(usize))
                .default_value("100")
                .help("Column width of cartoons and alignments"),
        )
        .arg(
            Arg::new("border")
                .long("border")
                .short('b')
                .num_args(1)
                .value_parser(value_parser!(usize))
                .default_value("10")
                .help("Bases of flanking context around alignments"),
        )
        .arg(
            Arg::new("upper")
                .long("upper")
                .short('U')
                .action(ArgAction::SetTrue)
                .help("Show alignments in uppercase"),
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

    let par = DisplayParams {
        indent: *args.get_one::<usize>("indent").unwrap(),
        width: *args.get_one::<usize>("width").unwrap(),
        border: *args.get_one::<usize>("border").unwrap(),
        upper: args.get_flag("upper"),
    };

    let mode = if args.get_flag("align") {
        ReportMode::Align
    } else if args.get_flag("cartoon") {
        ReportMode::Cartoon
    } else {
        ReportMode::Compact
    };

    //----------------------------
    // Init
    //----------------------------
    let ranges = RangeSet::build(&tokens)?;
    let mut reader = LasReader::open(infile)?;
    let tspace = reader.header.tspace;

    let mut service: Box<dyn AlignService> = match mode {
        ReportMode::Align => {
            let db = args
                .get_one::<String>("db")
                .ok_or_else(|| anyhow!("--align requires --db"))?;
            let adb = FaDb::open(db)?;
            let bdb = match args.get_one::<String>("db2") {
                Some(path) => Some(FaDb::open(path)?),
                None => None,
            };
            Box::new(BaseAligner::new(adb, bdb))
        }
        _ => Box::new(Schematic),
    };

    let stem = Path::new(infile)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| infile.clone());
    write_banner(&mut *writer, &stem, reader.header.novl)?;

    //----------------------------
    // Process
    //----------------------------
    let mut ovl = Overlap::default();
    let mut cursor = ranges.cursor();
    while reader.read_into(&mut ovl)? {
        if !select(&ovl, &ranges, &mut cursor, &opts) {
            continue;
        }

        match mode {
            ReportMode::Compact => {
                write_compact(&mut *writer, &ovl, tspace)?;
            }
            ReportMode::Cartoon => {
                writeln!(writer)?;
                writeln!(
                    writer,
                    "{}  ({} trace pts)",
                    compact_coords(&ovl),
                    group_digits(ovl.trace_point_count(tspace))
                )?;
                writeln!(writer)?;
                service.print_cartoon(&mut *writer, &ovl, &par)?;
            }
            ReportMode::Align => {
                writeln!(writer)?;
                writeln!(
                    writer,
                    "{}{}",
                    compact_coords(&ovl),
                    compact_trailer(&ovl, tspace)
                )?;
                writeln!(writer)?;
                service.print_alignment(&mut *writer, &ovl, tspace, &par)?;
            }
            ReportMode::M4 => unreachable!(),
        }
    }

    Ok(())
}
