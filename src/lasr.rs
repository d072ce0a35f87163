extern crate clap;
use clap::*;

mod cmd_lasr;

fn main() -> anyhow::Result<()> {
    let app = Command::new("lasr")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`lasr` - Local Alignments Show & Report")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .subcommand(cmd_lasr::show::make_subcommand())
        .subcommand(cmd_lasr::m4::make_subcommand())
        .after_help(
            r###"Subcommands:

* show - Compact listing, overlap cartoons, or full alignments
* m4   - Tabular M4-style summary with containment labels

Both take a .las overlap file plus optional 1-based read ranges
(`5`, `3-10`, `3-#`), and share the geometry filters `--overlap`,
`--falcon` and `--fl`.

"###,
        );

    // Check which subcomamnd the user ran...
    match app.get_matches().subcommand() {
        Some(("show", sub_matches)) => cmd_lasr::show::execute(sub_matches),
        Some(("m4", sub_matches)) => cmd_lasr::m4::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
