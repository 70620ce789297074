use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive 2D content-addressable network", long_about = None)]
pub struct CliArgs {
    /// Seed for random join points. Uses OS entropy when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Salt mixed into every key hash.
    #[arg(long, default_value = can_dht::DEFAULT_SALT)]
    pub salt: String,

    /// Random joins to perform before the menu starts.
    #[arg(long, default_value_t = 0)]
    pub nodes: usize,

    /// Columns in the ASCII map.
    #[arg(long, default_value_t = 40, value_parser = clap::value_parser!(u16).range(1..))]
    pub cols: u16,

    /// Rows in the ASCII map.
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u16).range(1..))]
    pub rows: u16,
}
