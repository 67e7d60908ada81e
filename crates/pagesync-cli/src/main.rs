mod adapter;

use adapter::JsonFieldAdapter;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use pagesync_core::{
    coverage, project, CollectionSync, FilterState, RetryPolicy, SortDirection, SyncConfig,
    SyncError,
};
use pagesync_http::{EnvTokenProvider, HttpPageFetcher};
use std::time::Duration;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Command::new("pagesync")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Cursor-paginated collection sync for the admin console")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("fetch")
                .about("Sync a collection and print the projected items as JSON lines")
                .arg(
                    Arg::new("endpoint")
                        .long("endpoint")
                        .required(true)
                        .help("Collection URL (bearer token read from PAGESYNC_TOKEN)"),
                )
                .arg(
                    Arg::new("page-size")
                        .long("page-size")
                        .default_value("100")
                        .value_parser(value_parser!(usize))
                        .help("Items requested per page"),
                )
                .arg(
                    Arg::new("pages")
                        .long("pages")
                        .default_value("0")
                        .value_parser(value_parser!(usize))
                        .help("Additional pages to load after the first"),
                )
                .arg(
                    Arg::new("all")
                        .long("all")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("pages")
                        .help("Drain every page; may issue many sequential requests"),
                )
                .arg(
                    Arg::new("search")
                        .long("search")
                        .help("Filter term matched against the search fields"),
                )
                .arg(
                    Arg::new("search-field")
                        .long("search-field")
                        .action(ArgAction::Append)
                        .help("Field matched by --search (repeatable; default: name)"),
                )
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .help("Sort key, as KEY, KEY:asc or KEY:desc"),
                )
                .arg(
                    Arg::new("timestamp-field")
                        .long("timestamp-field")
                        .default_value("created_at")
                        .help("Field driving the default (descending) ordering"),
                )
                .arg(
                    Arg::new("max-retries")
                        .long("max-retries")
                        .default_value("3")
                        .value_parser(value_parser!(u32))
                        .help("Retries per page after the initial attempt"),
                )
                .arg(
                    Arg::new("base-delay-ms")
                        .long("base-delay-ms")
                        .default_value("1000")
                        .value_parser(value_parser!(u64))
                        .help("Backoff base delay; doubles per retry"),
                ),
        );

    let matches = cli.get_matches();

    match matches.subcommand() {
        Some(("fetch", args)) => {
            if let Err(e) = run_fetch(args).await {
                eprintln!("error: {e:#}");
                std::process::exit(1);
            }
        }
        _ => unreachable!("subcommand is required"),
    }
}

async fn run_fetch(args: &ArgMatches) -> anyhow::Result<()> {
    let endpoint = args.get_one::<String>("endpoint").unwrap();
    let page_size = *args.get_one::<usize>("page-size").unwrap();
    let pages = *args.get_one::<usize>("pages").unwrap();
    let max_retries = *args.get_one::<u32>("max-retries").unwrap();
    let base_delay = Duration::from_millis(*args.get_one::<u64>("base-delay-ms").unwrap());

    let config = SyncConfig::new().with_page_size(page_size).with_retry(
        RetryPolicy::new()
            .with_max_retries(max_retries)
            .with_base_delay(base_delay),
    );
    let fetcher: HttpPageFetcher<serde_json::Value, _> =
        HttpPageFetcher::new(endpoint.clone(), EnvTokenProvider::default());
    let sync = CollectionSync::new(fetcher, config).with_retry_hook(|attempt, delay| {
        eprintln!(
            "transient fetch failure; retry {attempt} in {}ms",
            delay.as_millis()
        );
    });

    sync.load_first_page().await?;

    // A later-page failure must not discard what already loaded; hold the
    // error until the items have been printed.
    let mut late_error: Option<SyncError> = None;
    if args.get_flag("all") {
        if let Err(e) = sync.materialize_all().await {
            late_error = Some(e);
        }
    } else {
        for _ in 0..pages {
            if !sync.snapshot().has_more {
                break;
            }
            if let Err(e) = sync.load_next_page().await {
                late_error = Some(e);
                break;
            }
        }
    }

    let mut filter = FilterState::new();
    if let Some(term) = args.get_one::<String>("search") {
        filter.set_search_term(term.clone());
    }
    if let Some(spec) = args.get_one::<String>("sort") {
        let (key, direction) = parse_sort(spec)?;
        filter.set_sort(key, direction);
    }

    let search_fields: Vec<String> = args
        .get_many::<String>("search-field")
        .map(|fields| fields.cloned().collect())
        .unwrap_or_else(|| vec!["name".to_string()]);
    let adapter = JsonFieldAdapter::new(
        search_fields,
        args.get_one::<String>("timestamp-field").unwrap().clone(),
    );

    let snapshot = sync.snapshot();
    for item in project(&snapshot.items, &filter, &adapter) {
        println!("{item}");
    }

    if let Some(warning) = coverage(&snapshot, &filter).warning() {
        eprintln!("warning: {warning}");
    }
    tracing::info!(
        loaded = snapshot.loaded(),
        total = snapshot.total_count,
        has_more = snapshot.has_more,
        "sync finished"
    );

    match late_error {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn parse_sort(spec: &str) -> anyhow::Result<(String, SortDirection)> {
    match spec.split_once(':') {
        None => Ok((spec.to_string(), SortDirection::Asc)),
        Some((key, "asc")) => Ok((key.to_string(), SortDirection::Asc)),
        Some((key, "desc")) => Ok((key.to_string(), SortDirection::Desc)),
        Some((_, other)) => anyhow::bail!("unknown sort direction: {other} (use asc or desc)"),
    }
}
