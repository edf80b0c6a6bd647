use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "movie-collection-api")]
#[command(about = "Movie collection backend: REST routes over GraphQL resolvers on MongoDB")]
#[command(version)]
pub struct Cli {
    #[arg(long, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Print the effective configuration as JSON and exit")]
    pub print_config: bool,
}

impl Cli {
    pub fn port(&self, configured: u16) -> u16 {
        self.port.unwrap_or(configured)
    }
}
