//! Command-line parsing.
//!
//! ```text
//! drively [--config <PATH>] <COMMAND> [OPTIONS]
//! ```

use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;
use drively_core::requests::StatusFilter;
use drively_core::search::{CarQuery, CarSort};
use drively_core::{parse_calendar_date, MembershipTier, Money};
use std::collections::HashMap;
use std::path::PathBuf;

pub const USAGE: &str = "\
Drively command-line tool

Usage: drively [--config <PATH>] <COMMAND> [OPTIONS]

Offline commands:
  quote         --price <BAHT> --from <DATE> --to <DATE> [--tier basic|silver|gold]
  conflicts     --file <RESERVATIONS.json> --target <ID>
  review-check  --file <RESERVATIONS.json> --ratings <RATINGS.json> --reservation <ID>
  tiers         [--remote]

Backend commands:
  cars          [--make M] [--model M] [--min-price B] [--max-price B] [--sort S] [--all]
  received      [--status all|pending|accepted] [--dashboard]
  accept        --id <ID>
  membership

Options:
  -c, --config <PATH>   Client config file (default: platform config dir)
  -h, --help            Show this help message

Environment:
  DRIVELY_API_URL, DRIVELY_API_TOKEN, DRIVELY_TIMEOUT_SECS, RUST_LOG
";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Quote {
        price: Money,
        tier: Option<MembershipTier>,
        from: NaiveDate,
        to: NaiveDate,
    },
    Conflicts {
        file: PathBuf,
        target: String,
    },
    ReviewCheck {
        file: PathBuf,
        ratings: PathBuf,
        reservation: String,
    },
    Tiers {
        remote: bool,
    },
    Cars {
        query: CarQuery,
    },
    Received {
        filter: StatusFilter,
        dashboard: bool,
    },
    Accept {
        id: String,
    },
    Membership,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cli {
    pub config: Option<PathBuf>,
    pub command: Command,
}

/// `--name value` pairs and bare `--switch`es following the command.
struct Flags(HashMap<String, Option<String>>);

impl Flags {
    fn parse(args: &[String]) -> Result<Self> {
        let mut flags = HashMap::new();
        let mut i = 0;
        while i < args.len() {
            let name = args[i]
                .strip_prefix("--")
                .ok_or_else(|| anyhow!("unexpected argument '{}'", args[i]))?;
            match args.get(i + 1) {
                Some(value) if !value.starts_with("--") => {
                    flags.insert(name.to_string(), Some(value.clone()));
                    i += 2;
                }
                _ => {
                    flags.insert(name.to_string(), None);
                    i += 1;
                }
            }
        }
        Ok(Flags(flags))
    }

    fn value(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(|v| v.as_deref())
    }

    fn required(&self, name: &str) -> Result<&str> {
        self.value(name)
            .ok_or_else(|| anyhow!("missing required option --{}", name))
    }

    fn switch(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    fn date(&self, name: &str) -> Result<NaiveDate> {
        Ok(parse_calendar_date(self.required(name)?)?)
    }
}

/// Parses the arguments after the program name.
pub fn parse(args: &[String]) -> Result<Cli> {
    let mut config = None;
    let mut rest = args;

    while let Some(first) = rest.first() {
        match first.as_str() {
            "--config" | "-c" => {
                let path = rest
                    .get(1)
                    .ok_or_else(|| anyhow!("--config needs a path"))?;
                config = Some(PathBuf::from(path));
                rest = &rest[2..];
            }
            "--help" | "-h" => {
                return Ok(Cli {
                    config,
                    command: Command::Help,
                })
            }
            _ => break,
        }
    }

    let Some((name, rest)) = rest.split_first() else {
        return Ok(Cli {
            config,
            command: Command::Help,
        });
    };
    let flags = Flags::parse(rest)?;
    if flags.switch("help") {
        return Ok(Cli {
            config,
            command: Command::Help,
        });
    }

    let command = match name.as_str() {
        "quote" => Command::Quote {
            price: flags.required("price")?.parse()?,
            tier: flags.value("tier").map(str::parse).transpose()?,
            from: flags.date("from")?,
            to: flags.date("to")?,
        },
        "conflicts" => Command::Conflicts {
            file: PathBuf::from(flags.required("file")?),
            target: flags.required("target")?.to_string(),
        },
        "review-check" => Command::ReviewCheck {
            file: PathBuf::from(flags.required("file")?),
            ratings: PathBuf::from(flags.required("ratings")?),
            reservation: flags.required("reservation")?.to_string(),
        },
        "tiers" => Command::Tiers {
            remote: flags.switch("remote"),
        },
        "cars" => Command::Cars {
            query: car_query(&flags)?,
        },
        "received" => Command::Received {
            filter: flags
                .value("status")
                .map(str::parse)
                .transpose()?
                .unwrap_or_default(),
            dashboard: flags.switch("dashboard"),
        },
        "accept" => Command::Accept {
            id: flags.required("id")?.to_string(),
        },
        "membership" => Command::Membership,
        "help" => Command::Help,
        other => bail!("unknown command '{}'. Run with --help for usage.", other),
    };

    Ok(Cli { config, command })
}

fn car_query(flags: &Flags) -> Result<CarQuery> {
    let mut query = if flags.switch("all") {
        CarQuery::default()
    } else {
        CarQuery::available_only()
    };
    query.make = flags.value("make").map(str::to_string);
    query.model = flags.value("model").map(str::to_string);
    query.min_price = flags.value("min-price").map(str::parse).transpose()?;
    query.max_price = flags.value("max-price").map(str::parse).transpose()?;
    if let Some(sort) = flags.value("sort") {
        query.sort = sort.parse::<CarSort>()?;
    }
    Ok(query)
}
