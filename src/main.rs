use clap::{Parser, Subcommand};
use geoselect::config::{Settings, API_KEY_ENV, DEFAULT_DIRECTORY_URL, DEFAULT_GEOCODE_URL};
use geoselect::location::{
    CountriesNowClient, DirectoryCache, OpenCageClient, Selector, NOT_FOUND_MESSAGE,
};

/// geoselect: pick a country, pick a city, get its coordinates.
///
/// Countries and cities come from the CountriesNow directory; coordinates come
/// from the OpenCage geocoder (requires an API key).
///
/// Examples:
///   geoselect countries
///   geoselect cities US
///   geoselect locate --country US --city "New York"
///   geoselect serve --port 3000
#[derive(Parser)]
#[command(name = "geoselect", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory endpoint returning countries with their cities.
    #[arg(long, global = true, env = "GEOSELECT_DIRECTORY_URL", default_value = DEFAULT_DIRECTORY_URL)]
    directory_url: String,

    /// Geocoding endpoint (OpenCage-compatible).
    #[arg(long, global = true, env = "GEOSELECT_GEOCODE_URL", default_value = DEFAULT_GEOCODE_URL)]
    geocode_url: String,

    /// OpenCage API key.
    #[arg(long, global = true, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// Verbose logging (debug level).
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List countries sorted by name.
    Countries,

    /// List the cities of a country.
    Cities {
        /// ISO 3166-1 alpha-2 code, e.g. US.
        iso_code: String,
    },

    /// Resolve a city within a country to coordinates.
    Locate {
        /// ISO 3166-1 alpha-2 code, e.g. US.
        #[arg(long)]
        country: String,

        /// City name as listed by `geoselect cities`.
        #[arg(long)]
        city: String,

        /// Print the selector state as JSON instead of the results line.
        #[arg(long)]
        json: bool,
    },

    /// Serve the selector form over HTTP.
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, short = 'p', default_value_t = 3000)]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let settings = Settings {
        directory_url: cli.directory_url.clone(),
        geocode_url: cli.geocode_url.clone(),
        ..Settings::default()
    }
    .with_api_key(cli.api_key.clone());

    let ok = match cli.command {
        Command::Countries => list_countries(&settings),
        Command::Cities { ref iso_code } => list_cities(&settings, iso_code),
        Command::Locate { ref country, ref city, json } => locate(&settings, country, city, json),
        Command::Serve { ref host, port } => serve(&settings, host, port),
    };

    if !ok {
        std::process::exit(1);
    }
}

fn mounted_selector(settings: &Settings) -> Selector {
    let cache = DirectoryCache::new();
    let mut selector = Selector::new();
    selector.mount(&cache, &CountriesNowClient::new(settings));
    selector
}

fn list_countries(settings: &Settings) -> bool {
    let selector = mounted_selector(settings);
    let directory = selector.directory();
    if directory.is_empty() {
        eprintln!("Error: Country directory unavailable.");
        return false;
    }

    for country in directory.sorted() {
        println!("{:<4}{} ({} cities)", country.iso_code, country.name, country.cities.len());
    }
    true
}

fn list_cities(settings: &Settings, iso_code: &str) -> bool {
    let mut selector = mounted_selector(settings);
    selector.choose_country(iso_code);

    if !selector.city_selector_enabled() {
        eprintln!("Error: Unknown country code '{}'. Run `geoselect countries`.", iso_code);
        return false;
    }

    for city in selector.visible_cities() {
        println!("{}", city);
    }
    true
}

fn locate(settings: &Settings, iso_code: &str, city: &str, json: bool) -> bool {
    let mut selector = mounted_selector(settings);
    selector.choose_country(iso_code);
    selector.choose_city(city);

    if !selector.can_submit() {
        eprintln!("Error: Unknown country code '{}' or empty city.", iso_code);
        return false;
    }

    selector.submit(&OpenCageClient::new(settings));

    if json {
        match serde_json::to_string_pretty(&selector.view()) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error: {}", e);
                return false;
            }
        }
    } else {
        println!("{}", selector.status_line().unwrap_or_else(|| NOT_FOUND_MESSAGE.to_string()));
    }

    selector.location().is_some()
}

fn serve(settings: &Settings, host: &str, port: u16) -> bool {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: Cannot start runtime: {}", e);
            return false;
        }
    };

    match runtime.block_on(geoselect::server::start(settings, host, port)) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Error: Cannot serve on {}:{}: {}", host, port, e);
            false
        }
    }
}
