use anyhow::{Context, Result};
use jsontree::{stringify, Formatter, ParseOptions};
use std::fs::File;
use std::io::{stdin, Read, Write};

#[macro_use]
extern crate clap;
use clap::{App, ArgMatches};

fn main() -> Result<()> {
    env_logger::init();
    let yaml = load_yaml!("main.yml");
    let matches = App::from_yaml(yaml).get_matches();
    if let Some(path) = matches.value_of_os("json_file") {
        let mut text = String::new();
        File::open(path)?.read_to_string(&mut text)?;
        let result = format(&text, &matches)?;
        if matches.is_present("in_place") {
            let mut f = File::create(path)?;
            writeln!(f, "{}", result)?;
        } else {
            println!("{}", result);
        }
    } else {
        let mut text = String::new();
        stdin().lock().read_to_string(&mut text)?;
        let result = format(&text, &matches)?;
        println!("{}", result);
    }
    Ok(())
}

fn options(matches: &ArgMatches) -> Result<ParseOptions> {
    let mut options = ParseOptions::default();
    if let Some(depth) = matches.value_of("max_depth") {
        options.max_depth = depth
            .parse()
            .with_context(|| format!("invalid --max-depth `{}`", depth))?;
    }
    Ok(options)
}

fn format(text: &str, matches: &ArgMatches) -> Result<String> {
    let mut node = jsontree::parse_with_options(text, options(matches)?)?;
    if matches.is_present("sanitize") {
        node.sanitize();
    }
    log::debug!("writing {} with {} children", node.type_name(), node.children().len());
    if matches.is_present("pretty") {
        Ok(Formatter::new().format(&node)?)
    } else {
        Ok(stringify(&node)?)
    }
}
