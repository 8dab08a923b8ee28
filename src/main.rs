use clap::Parser;
use log::LevelFilter;
use miette::IntoDiagnostic;

use plynk::error::Result;
use plynk::{Plink, PlinkArgs, RunSpec, VersionLine};

/// Run a plink command through the wrapper and print the tool's captured
/// stdout.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Directory in which plink should run; output names resolve against it.
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    workdir: Option<String>,

    /// Plink release line to invoke.
    #[arg(long, default_value = "2", value_parser = ["1", "1.9", "2", "2.0"])]
    plink_version: String,

    /// Input file-set prefix (emitted as --bfile).
    #[arg(short, long)]
    bfile: Option<String>,

    /// Output name (emitted as --out).
    #[arg(short, long)]
    out: Option<String>,

    /// Free-form plink options: `name` for a switch, `name=value` for a
    /// scalar, `name=a,b,c` for a list. Underscores become hyphens.
    #[arg(trailing_var_arg = true)]
    options: Vec<String>,

    /// Suppress command tracing.
    #[arg(short, long)]
    quiet: bool,
}

fn parse_options(raw: &[String]) -> PlinkArgs {
    let mut options = PlinkArgs::new();
    for opt in raw {
        options = match opt.split_once('=') {
            None => options.switch(opt),
            Some((name, value)) if value.contains(',') => options.list(name, value.split(',')),
            Some((name, value)) => options.set(name, value),
        };
    }
    options
}

fn try_main(args: &Args) -> Result<()> {
    let plink = Plink::new(args.workdir.as_deref())?;
    let line = VersionLine::from_token(&args.plink_version).unwrap_or_default();

    let mut spec = RunSpec::new()
        .version(line)
        .options(parse_options(&args.options));
    if let Some(bfile) = &args.bfile {
        spec = spec.bfile(bfile);
    }
    if let Some(out) = &args.out {
        spec = spec.out(out);
    }

    let view = plink.run(spec)?;
    print!("{}", view.stdout_text());
    Ok(())
}

fn main() -> miette::Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.quiet {
            LevelFilter::Error
        } else {
            LevelFilter::Info
        })
        .format_target(false)
        .init();

    try_main(&args).into_diagnostic()
}

#[cfg(test)]
mod tests {
    use super::*;
    use plynk::OptValue;

    #[test]
    fn bare_name_is_a_switch() {
        let options = parse_options(&["freq".to_string()]);
        assert_eq!(options.get("freq"), Some(&OptValue::Switch(true)));
    }

    #[test]
    fn name_value_is_a_scalar() {
        let options = parse_options(&["maf=0.01".to_string()]);
        assert_eq!(
            options.get("maf"),
            Some(&OptValue::Scalar("0.01".to_string()))
        );
    }

    #[test]
    fn comma_values_are_a_list() {
        let options = parse_options(&["chr=1,2,X".to_string()]);
        assert_eq!(
            options.get("chr"),
            Some(&OptValue::List(vec![
                "1".to_string(),
                "2".to_string(),
                "X".to_string()
            ]))
        );
    }
}
